use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = lightsail_lockdown::Cli::parse();
    lightsail_lockdown::run(cli)
}
