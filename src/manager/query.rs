// Query operations - list, semesters, events, dashboard

use crate::cli::{CoursesViewMode, DashboardViewMode, EventsCommands, ListArgs, ListFormat};
use crate::config::Config;
use crate::core::data::{CourseFilter, CourseStatus};
use crate::core::deadlines::{DeadlineKind, DeadlineList};
use crate::core::events::{self, DashboardStats};
use crate::core::operations::CourseOperations;
use crate::core::preferences::{
    FilePreferences, PreferencesStore, DASHBOARD_VIEW_KEY, SEMESTER_FILTER_KEY, VIEW_MODE_KEY,
};
use crate::core::semester::group_by_semester;
use crate::core::traits::CourseSearch;
use crate::utils::error::AppResult;
use crate::utils::{DisplayFormatter, OutputStyle};
use chrono::{Local, NaiveDate, Utc};
use tracing::debug;

/// Pick the list format: flag, then config, then the saved view mode
pub(crate) fn resolve_list_format(
    flag: Option<&ListFormat>,
    config: &Config,
    view_mode: CoursesViewMode,
) -> ListFormat {
    flag.cloned()
        .or_else(|| {
            config
                .general
                .format
                .as_deref()
                .and_then(ListFormat::from_name)
        })
        .unwrap_or(match view_mode {
            CoursesViewMode::Grid => ListFormat::Detailed,
            CoursesViewMode::List => ListFormat::Simple,
        })
}

/// Semester filter from the flag or, unless `--all`, the saved preference
fn resolve_semester_filter(args: &ListArgs, prefs: &impl PreferencesStore) -> Option<String> {
    if args.semester.is_some() {
        return args.semester.clone();
    }
    if args.all {
        return None;
    }
    prefs
        .get::<String>(SEMESTER_FILTER_KEY)
        .filter(|s| !s.trim().is_empty())
}

pub fn handle_list_command(config: &Config, args: &ListArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    if args.stats {
        DisplayFormatter::print_course_stats(&manager.get_course_stats()?);
        return Ok(());
    }

    let prefs = FilePreferences::open(&config.general.prefs_file)?;
    let filter = CourseFilter {
        semester: resolve_semester_filter(args, &prefs),
        query: args.query.clone(),
        status: args.status,
    };
    debug!(?filter, "listing courses");

    if let Some(semester) = &filter.semester
        && args.semester.is_none()
    {
        println!(
            "{}",
            OutputStyle::muted(&format!("Showing {} (saved filter, --all to show every semester)", semester))
        );
    }

    let courses = manager.list_courses(&filter)?;
    let view_mode = prefs.get::<CoursesViewMode>(VIEW_MODE_KEY).unwrap_or_default();
    let format = resolve_list_format(args.format.as_ref(), config, view_mode);

    DisplayFormatter::format_list(&courses, &format)
}

pub fn handle_semesters_command(config: &Config) -> AppResult<()> {
    let manager = CourseOperations::new(config);
    let courses = manager.list_courses(&CourseFilter::default())?;

    DisplayFormatter::print_semesters(&group_by_semester(&courses));
    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn handle_events_command(config: &Config, command: &EventsCommands) -> AppResult<()> {
    let manager = CourseOperations::new(config);
    let courses = manager.list_courses(&CourseFilter::default())?;

    match command {
        EventsCommands::Today { on } => {
            let day = on.unwrap_or_else(today);
            DisplayFormatter::print_events(
                &format!("📅 Events on {}", day.format("%a, %b %d %Y")),
                &events::events_on(&courses, day),
                "No events",
            );
        }
        EventsCommands::Week { on } => {
            let day = on.unwrap_or_else(today);
            let (start, end) = events::week_window(day);
            DisplayFormatter::print_events(
                &format!(
                    "⏰ Deadlines {} – {}",
                    start.format("%b %d"),
                    end.format("%b %d")
                ),
                &events::deadlines_this_week(&courses, day),
                "No deadlines this week",
            );
        }
    }
    Ok(())
}

pub fn handle_dashboard_command(config: &Config) -> AppResult<()> {
    let manager = CourseOperations::new(config);
    let prefs = FilePreferences::open(&config.general.prefs_file)?;
    let courses = manager.list_courses(&CourseFilter::default())?;
    let day = today();

    println!(
        "{}",
        OutputStyle::muted(&Local::now().format("%A, %B %d %Y").to_string())
    );
    DisplayFormatter::print_dashboard_stats(&DashboardStats::from_courses(&courses));

    let enrolled = courses
        .iter()
        .filter(|c| c.status == CourseStatus::Enrolled)
        .count();
    println!(
        "{:>12}: {}",
        OutputStyle::label("Enrolled"),
        OutputStyle::info(&enrolled.to_string())
    );

    DisplayFormatter::print_events("📅 Today", &events::events_on(&courses, day), "No events today");
    DisplayFormatter::print_events(
        "⏰ This week",
        &events::deadlines_this_week(&courses, day),
        "No deadlines this week",
    );
    DisplayFormatter::print_events(
        "🔜 Upcoming",
        &events::upcoming(&courses, Utc::now(), config.general.upcoming_limit),
        "Nothing coming up",
    );

    let deadlines = DeadlineList::load(&prefs);
    match prefs.get::<DashboardViewMode>(DASHBOARD_VIEW_KEY).unwrap_or_default() {
        DashboardViewMode::Grid => DisplayFormatter::print_deadlines(deadlines.items(), day),
        DashboardViewMode::Columns => {
            for kind in [DeadlineKind::Private, DeadlineKind::Administrative, DeadlineKind::Uni] {
                let items: Vec<_> = deadlines
                    .items()
                    .iter()
                    .filter(|d| d.kind == kind)
                    .cloned()
                    .collect();
                println!("\n{}", OutputStyle::header(&kind.to_string()));
                DisplayFormatter::print_deadlines(&items, day);
            }
        }
    }

    Ok(())
}
