// Preference operations - view modes and the saved semester filter

use crate::cli::{PrefsCommands, ViewModeTarget};
use crate::config::Config;
use crate::core::preferences::{
    FilePreferences, PreferencesStore, DASHBOARD_VIEW_KEY, SEMESTER_FILTER_KEY, VIEW_MODE_KEY,
};
use crate::core::semester::Semester;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::{print_success, OutputStyle};
use clap::ValueEnum;
use serde_json::Value;

pub fn handle_prefs_command(config: &Config, command: PrefsCommands) -> AppResult<()> {
    let mut prefs = FilePreferences::open(&config.general.prefs_file)?;

    match command {
        PrefsCommands::ViewMode { target } => match target {
            ViewModeTarget::Courses { mode } => {
                prefs.set(VIEW_MODE_KEY, &mode)?;
                print_success(&format!("Course list view set to {}", mode_name(mode)));
            }
            ViewModeTarget::Dashboard { mode } => {
                prefs.set(DASHBOARD_VIEW_KEY, &mode)?;
                print_success(&format!("Dashboard view set to {}", mode_name(mode)));
            }
        },
        PrefsCommands::Filter { semester, clear } => match semester {
            Some(label) if !clear => {
                let semester = Semester::parse(&label)?;
                prefs.set(SEMESTER_FILTER_KEY, &semester.label())?;
                print_success(&format!("Course list limited to {}", semester));
            }
            _ => {
                prefs.remove(SEMESTER_FILTER_KEY)?;
                print_success("Semester filter cleared");
            }
        },
        PrefsCommands::Show => print_preferences(&prefs),
    }

    Ok(())
}

fn mode_name(mode: impl ValueEnum) -> String {
    mode.to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

fn print_preferences(prefs: &FilePreferences) {
    let keys = prefs.keys();
    if keys.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: "saved preferences".to_string(),
        });
        return;
    }

    OutputStyle::print_header("⚙️  Preferences");
    OutputStyle::print_field_colored("File", &prefs.path().display().to_string(), OutputStyle::muted);
    for key in keys {
        let summary = match prefs.get_value(&key) {
            Some(Value::String(s)) => s,
            Some(Value::Array(items)) => format!("{} entries", items.len()),
            Some(Value::Object(map)) => format!("{} entries", map.len()),
            Some(other) => other.to_string(),
            None => continue,
        };
        println!("{:>24}: {}", OutputStyle::label(&key), summary);
    }
}
