use crate::config::Config;
use crate::core::data::{CourseStatus, DocumentType, ImportantDateType};
use crate::core::deadlines::DeadlineKind;
use crate::manager::{config, crud, deadlines, grades, prefs, query};
use crate::utils::error::AppResult;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Track courses, deadlines and grades across semesters")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Log store and command activity to stderr")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub fn execute(self, config: Config, config_path: &Path) -> AppResult<()> {
        match self {
            Commands::Course(args) => match args.command {
                CourseCommands::New(args) => crud::handle_new_command(&config, &args),
                CourseCommands::List(args) => query::handle_list_command(&config, &args),
                CourseCommands::Show(args) => crud::handle_show_command(&config, &args),
                CourseCommands::Edit(args) => crud::handle_edit_command(&config, &args),
                CourseCommands::Delete(args) => crud::handle_delete_command(&config, &args),
                CourseCommands::Move(args) => crud::handle_move_command(&config, &args),
                CourseCommands::Status(args) => crud::handle_status_command(&config, &args),
            },
            Commands::Doc(args) => crud::handle_doc_command(&config, args.command),
            Commands::Date(args) => crud::handle_date_command(&config, args.command),
            Commands::Grade(args) => grades::handle_grade_command(&config, args.command),
            Commands::Semesters => query::handle_semesters_command(&config),
            Commands::Events(args) => query::handle_events_command(&config, &args.command),
            Commands::Dashboard => query::handle_dashboard_command(&config),
            Commands::Deadline(args) => deadlines::handle_deadline_command(&config, args.command),
            Commands::Prefs(args) => prefs::handle_prefs_command(&config, args.command),
            Commands::Config(args) => config::handle_config_command(&config, config_path, args.command),
            Commands::Seed(args) => crud::handle_seed_command(&config, &args),
            Commands::Clear(args) => crud::handle_clear_command(&config, &args),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage courses
    Course(CourseArgs),

    /// Attach or remove course documents
    Doc(DocArgs),

    /// Attach or remove important dates
    Date(DateArgs),

    /// Record grades and compute the weighted average
    Grade(GradeArgs),

    /// List semesters in chronological order
    Semesters,

    /// Show important dates for today or this week
    Events(EventsArgs),

    /// Overview of courses, events and personal deadlines
    Dashboard,

    /// Personal to-do deadlines
    Deadline(DeadlineArgs),

    /// Saved view preferences
    Prefs(PrefsArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Load demo courses
    Seed(SeedArgs),

    /// Delete all courses
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct CourseArgs {
    #[command(subcommand)]
    pub command: CourseCommands,
}

#[derive(Subcommand)]
pub enum CourseCommands {
    /// Create a new course
    New(NewArgs),

    /// List courses grouped by semester
    List(ListArgs),

    /// Show course details
    Show(ShowArgs),

    /// Edit a course
    Edit(EditArgs),

    /// Delete a course with its documents and dates
    Delete(DeleteArgs),

    /// Move a course to another semester
    Move(MoveArgs),

    /// Set the course status
    Status(StatusArgs),
}

/// Course form fields; anything left out is asked for interactively
#[derive(Args, Default)]
pub struct CourseFields {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub abbreviation: Option<String>,

    #[arg(short, long, help = "ECTS credits")]
    pub credits: Option<String>,

    #[arg(short, long, help = "Semester label, e.g. WS24/25 or SS25")]
    pub semester: Option<String>,

    #[arg(short, long)]
    pub instructor: Option<String>,

    #[arg(long)]
    pub day: Option<String>,

    #[arg(long)]
    pub time: Option<String>,

    #[arg(long)]
    pub room: Option<String>,
}

impl CourseFields {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.abbreviation,
            &self.credits,
            &self.semester,
            &self.instructor,
            &self.day,
            &self.time,
            &self.room,
        ]
        .iter()
        .all(|f| f.is_none())
    }
}

#[derive(Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: CourseFields,
}

#[derive(Args, Default)]
pub struct ListArgs {
    #[arg(short, long, help = "Only this semester (overrides the saved filter)")]
    pub semester: Option<String>,

    #[arg(short, long, help = "Match name, abbreviation or instructor")]
    pub query: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<CourseStatus>,

    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,

    #[arg(long, help = "Ignore the saved semester filter")]
    pub all: bool,

    #[arg(long)]
    pub stats: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Course ID, abbreviation or name")]
    pub identifier: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Course ID, abbreviation or name")]
    pub identifier: Option<String>,

    #[command(flatten)]
    pub fields: CourseFields,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Course ID, abbreviation or name")]
    pub identifier: String,

    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    #[arg(help = "Course ID, abbreviation or name")]
    pub identifier: String,

    #[arg(help = "Target semester label")]
    pub semester: String,
}

#[derive(Args)]
pub struct StatusArgs {
    #[arg(help = "Course ID, abbreviation or name")]
    pub identifier: String,

    #[arg(value_enum)]
    pub status: CourseStatus,
}

#[derive(Args)]
pub struct DocArgs {
    #[command(subcommand)]
    pub command: DocCommands,
}

#[derive(Subcommand)]
pub enum DocCommands {
    /// Attach a document to a course
    Add {
        course: String,
        name: String,
        #[arg(short, long, value_enum, default_value = "other")]
        r#type: DocumentType,
        #[arg(short, long, default_value = "#")]
        url: String,
    },
    /// Remove a document from a course
    Remove { course: String, document_id: String },
}

#[derive(Args)]
pub struct DateArgs {
    #[command(subcommand)]
    pub command: DateCommands,
}

#[derive(Subcommand)]
pub enum DateCommands {
    /// Attach an important date to a course
    Add {
        course: String,
        title: String,
        #[arg(help = "YYYY-MM-DD or YYYY-MM-DD HH:MM (UTC)")]
        date: String,
        #[arg(short, long, value_enum, default_value = "other")]
        r#type: ImportantDateType,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove an important date from a course
    Remove { course: String, date_id: String },
}

#[derive(Args)]
pub struct GradeArgs {
    #[command(subcommand)]
    pub command: GradeCommands,
}

#[derive(Subcommand)]
pub enum GradeCommands {
    /// Record a grade between 1.0 and 5.0
    Set { course: String, grade: String },
    /// Remove the grade of a course
    Clear { course: String },
    /// All courses with their grades
    List {
        #[arg(long)]
        json: bool,
    },
    /// Weighted average and credit progress
    Average {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommands,
}

#[derive(Subcommand)]
pub enum EventsCommands {
    /// Important dates on a single day
    Today {
        #[arg(long, help = "Use this day instead of today (YYYY-MM-DD)")]
        on: Option<NaiveDate>,
    },
    /// Deadlines from the last Sunday through the following week
    Week {
        #[arg(long, help = "Use this day instead of today (YYYY-MM-DD)")]
        on: Option<NaiveDate>,
    },
}

#[derive(Args)]
pub struct DeadlineArgs {
    #[command(subcommand)]
    pub command: DeadlineCommands,
}

#[derive(Subcommand)]
pub enum DeadlineCommands {
    /// Add a personal deadline
    Add {
        title: String,
        #[arg(short, long, value_enum, default_value = "private")]
        kind: DeadlineKind,
        #[arg(long, help = "Due date (YYYY-MM-DD)")]
        due: Option<NaiveDate>,
        #[arg(long, value_parser = parse_time, help = "Due time (HH:MM)")]
        at: Option<NaiveTime>,
    },
    /// List personal deadlines
    List,
    /// Mark a deadline done or open again
    Toggle {
        #[arg(help = "Position in the list or ID")]
        item: String,
    },
    /// Remove a deadline
    Remove {
        #[arg(help = "Position in the list or ID")]
        item: String,
    },
    /// Move a deadline to another position
    Move {
        #[arg(help = "Position in the list or ID")]
        item: String,
        #[arg(help = "New 1-based position")]
        to: usize,
    },
    /// Remove completed deadlines
    Purge,
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}', expected HH:MM", value))
}

#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommands,
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Set the course list or dashboard layout
    ViewMode {
        #[command(subcommand)]
        target: ViewModeTarget,
    },
    /// Set or clear the saved semester filter
    Filter {
        semester: Option<String>,
        #[arg(long, conflicts_with = "semester")]
        clear: bool,
    },
    /// Show all saved preferences
    Show,
}

#[derive(Subcommand)]
pub enum ViewModeTarget {
    Courses {
        #[arg(value_enum)]
        mode: CoursesViewMode,
    },
    Dashboard {
        #[arg(value_enum)]
        mode: DashboardViewMode,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoursesViewMode {
    #[default]
    Grid,
    List,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardViewMode {
    #[default]
    Grid,
    Columns,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq)]
pub enum ListFormat {
    Simple,
    Detailed,
    Table,
    Json,
}

impl ListFormat {
    /// Format name as written in the config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(ListFormat::Simple),
            "detailed" => Some(ListFormat::Detailed),
            "table" => Some(ListFormat::Table),
            "json" => Some(ListFormat::Json),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

#[derive(Args)]
pub struct SeedArgs {
    #[arg(short, long, help = "Replace existing courses with the demo set")]
    pub force: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    #[arg(short, long)]
    pub force: bool,
}
