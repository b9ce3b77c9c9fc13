// Personal deadline operations

use crate::cli::DeadlineCommands;
use crate::config::Config;
use crate::core::deadlines::{Deadline, DeadlineList};
use crate::core::preferences::FilePreferences;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::{print_success, DisplayFormatter};
use chrono::Utc;
use tracing::info;

pub fn handle_deadline_command(config: &Config, command: DeadlineCommands) -> AppResult<()> {
    let mut prefs = FilePreferences::open(&config.general.prefs_file)?;
    let mut deadlines = DeadlineList::load(&prefs);
    let today = Utc::now().date_naive();

    match command {
        DeadlineCommands::Add {
            title,
            kind,
            due,
            at,
        } => {
            let deadline = Deadline::new(&title, kind)?.due(due, at);
            let title = deadline.title.clone();
            deadlines.add(deadline);
            deadlines.save(&mut prefs)?;
            info!(title = %title, %kind, "deadline added");
            print_success(&format!("Added '{}' ({})", title, kind));
        }
        DeadlineCommands::List => {
            DisplayFormatter::print_deadlines(deadlines.items(), today);
        }
        DeadlineCommands::Toggle { item } => {
            let index = deadlines.resolve(&item)?;
            let done = deadlines.toggle(index)?;
            deadlines.save(&mut prefs)?;
            let title = &deadlines.items()[index].title;
            if done {
                print_success(&format!("'{}' done", title));
            } else {
                println!("'{}' reopened", title);
            }
        }
        DeadlineCommands::Remove { item } => {
            let index = deadlines.resolve(&item)?;
            let removed = deadlines.remove(index)?;
            deadlines.save(&mut prefs)?;
            print_success(&format!("Removed '{}'", removed.title));
        }
        DeadlineCommands::Move { item, to } => {
            let from = deadlines.resolve(&item)?;
            deadlines.move_item(from, to.saturating_sub(1))?;
            deadlines.save(&mut prefs)?;
            DisplayFormatter::print_deadlines(deadlines.items(), today);
        }
        DeadlineCommands::Purge => {
            let removed = deadlines.purge_completed();
            if removed == 0 {
                handle_flow(FlowResult::EmptyList {
                    item_type: "completed deadlines".to_string(),
                });
                return Ok(());
            }
            deadlines.save(&mut prefs)?;
            print_success(&format!("Removed {} completed deadlines", removed));
        }
    }

    Ok(())
}
