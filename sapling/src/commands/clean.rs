use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use sapling_manifest::Manifest;

use super::{UnwrapOrExit, build::cache_dir};

#[derive(Args)]
pub struct CleanCommand {
    /// Path to sapling.toml (defaults to ./sapling.toml)
    #[arg(short, long, default_value = "sapling.toml")]
    pub config: PathBuf,
}

impl CleanCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let dir = cache_dir(&self.config, &manifest);

        match std::fs::remove_dir_all(&dir) {
            Ok(()) => println!("Removed {}", dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                println!("Nothing to clean at {}", dir.display());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("failed to remove {}", dir.display()));
            }
        }

        Ok(())
    }
}
