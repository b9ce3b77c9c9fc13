// Binary entry point - import modules directly
mod cli;
mod config;
mod core;
mod manager;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_tracing(cli.debug);

    // Ensure configuration exists and load it
    if cli.config.is_none() {
        Config::ensure_config_exists()?;
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let config = Config::load_custom(&config_path)?;
    debug!(path = %config_path.display(), "configuration loaded");

    if !config.general.color {
        colored::control::set_override(false);
    }

    // Execute command
    if let Err(e) = cli.command.execute(config, &config_path) {
        utils::report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
