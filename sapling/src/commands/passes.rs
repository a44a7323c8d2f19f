use clap::Args;
use eyre::Result;
use sapling_transform::passes::KNOWN_PASSES;

#[derive(Args)]
pub struct PassesCommand {}

impl PassesCommand {
    pub fn run(&self) -> Result<()> {
        println!("Built-in passes:");
        for name in KNOWN_PASSES {
            println!("  {name}");
        }
        Ok(())
    }
}
