// Configuration operations

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::utils;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::print_success;
use std::path::Path;

pub fn handle_config_command(config: &Config, path: &Path, command: Option<ConfigCommands>) -> AppResult<()> {
    match command {
        Some(ConfigCommands::Show) => handle_show_command(config, path),
        Some(ConfigCommands::Reset) => handle_reset_command(path),
        Some(ConfigCommands::Path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => handle_config_help(path),
    }
}

fn handle_show_command(config: &Config, path: &Path) -> AppResult<()> {
    println!("⚙️  studytrack Configuration");
    println!("==========================");
    println!("File: {}", path.display());

    println!("General:");
    println!("  Course file: {}", config.general.data_file.display());
    println!("  Preferences file: {}", config.general.prefs_file.display());
    println!("  Sort by: {:?}", config.general.sort_by);
    println!("  Color: {}", config.general.color);
    if let Some(format) = &config.general.format {
        println!("  Default format: {}", format);
    }
    println!("  Upcoming events on dashboard: {}", config.general.upcoming_limit);

    Ok(())
}

fn handle_config_help(path: &Path) -> AppResult<()> {
    println!("⚙️  Configuration Management");
    println!("==========================");
    println!("Available configuration commands:");
    println!("  studytrack config show    - Show current configuration");
    println!("  studytrack config reset   - Reset configuration to defaults");
    println!("  studytrack config path    - Print the configuration file location");
    println!();
    println!("Configuration file location: {}", path.display());
    Ok(())
}

fn handle_reset_command(path: &Path) -> AppResult<()> {
    if utils::prompt_yes_no(
        "Are you sure you want to reset configuration to defaults? This will overwrite your current settings.",
    )? {
        Config::default().save_to(path)?;
        print_success("Configuration reset to defaults!");
    } else {
        handle_flow(FlowResult::Cancelled("Reset cancelled".to_string()));
    }
    Ok(())
}
