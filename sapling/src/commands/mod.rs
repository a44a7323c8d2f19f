mod build;
mod clean;
mod completions;
mod passes;

use build::BuildCommand;
use clap::{Parser, Subcommand};
use clean::CleanCommand;
use completions::CompletionsCommand;
use eyre::Result;
use passes::PassesCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for sapling_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "sapling")]
#[command(version)]
#[command(about = "Transform source files through configurable pass pipelines")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Build(cmd) => cmd.run(),
            Commands::Clean(cmd) => cmd.run(),
            Commands::Passes(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a source file according to sapling.toml
    Build(BuildCommand),

    /// Remove the on-disk build cache
    Clean(CleanCommand),

    /// List the built-in passes
    Passes(PassesCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
