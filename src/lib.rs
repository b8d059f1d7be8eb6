pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod reconcile;
pub mod types;

pub use cli::Cli;
pub use config::DesiredConfig;

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;

    let config = DesiredConfig::from_cli(&cli)?;
    log::debug!("resolved configuration: {config:?}");

    commands::apply::execute(&config)
}
