use colored::*;
use crate::cli::ListFormat;
use crate::core::data::{Course, CourseStats, CourseStatus};
use crate::core::deadlines::Deadline;
use crate::core::events::{DashboardStats, EventView};
use crate::core::grades::{GradeBook, GradeSummary};
use crate::core::semester::{group_by_semester, Semester, SemesterGroup};
use crate::utils::error::{handle_flow, AppError, AppResult, FlowResult};
use crate::utils::format::{format_average, format_credits, format_datetime, format_event_date, truncate_string};
use chrono::NaiveDate;

/// Course field types for unified display
enum CourseField {
    Id,
    Name,
    Abbreviation,
    Credits,
    Semester,
    Schedule,
    Status,
    Created,
    Updated,
}

pub struct OutputStyle;

impl OutputStyle {
    pub fn course_name(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn semester(text: &str) -> ColoredString {
        text.bright_magenta()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn status(status: CourseStatus) -> ColoredString {
        let text = status.to_string();
        match status {
            CourseStatus::Enrolled => text.blue(),
            CourseStatus::Passed => text.green(),
            CourseStatus::Failed => text.red(),
        }
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>12}: {}", Self::label(label), color_fn(value));
    }

    fn print_course_field(field: CourseField, course: &Course) {
        match field {
            CourseField::Id => Self::print_field_colored("ID", &course.id, Self::muted),
            CourseField::Name => Self::print_field_colored("Name", &course.name, Self::course_name),
            CourseField::Abbreviation => {
                if let Some(abbr) = &course.abbreviation {
                    Self::print_field_colored("Short", abbr, Self::content);
                }
            }
            CourseField::Credits => {
                Self::print_field_colored("Credits", &format_credits(course.credits), Self::info)
            }
            CourseField::Semester => {
                Self::print_field_colored("Semester", &course.semester, Self::semester)
            }
            CourseField::Schedule => {
                Self::print_field_colored("Instructor", &course.instructor, Self::content);
                Self::print_field_colored("When", &format!("{} {}", course.day, course.time), Self::content);
                Self::print_field_colored("Room", &course.room, Self::content);
            }
            CourseField::Status => {
                println!("{:>12}: {}", Self::label("Status"), Self::status(course.status));
            }
            CourseField::Created => {
                Self::print_field_colored("Created", &format_datetime(&course.created_at), Self::muted)
            }
            CourseField::Updated => {
                Self::print_field_colored("Updated", &format_datetime(&course.updated_at), Self::muted)
            }
        }
    }

    pub fn print_course_basic(course: &Course) {
        println!("  Name: {}", Self::course_name(&course.name));
        println!("  Semester: {}", Self::semester(&course.semester));
        println!(
            "  Attachments: {} documents, {} dates",
            course.documents.len(),
            course.important_dates.len()
        );
    }

    pub fn print_course_detailed(course: &Course) {
        println!("{}", Self::title("📚 Course Details"));

        for field in [
            CourseField::Id,
            CourseField::Name,
            CourseField::Abbreviation,
            CourseField::Credits,
            CourseField::Semester,
            CourseField::Schedule,
            CourseField::Status,
            CourseField::Created,
            CourseField::Updated,
        ] {
            Self::print_course_field(field, course);
        }

        println!("\n{}", Self::title(&format!("📄 Documents ({})", course.documents.len())));
        if course.documents.is_empty() {
            println!("  {}", Self::muted("No documents yet"));
        }
        for doc in &course.documents {
            println!(
                "  {} {} {} {}",
                Self::muted(&doc.id[..8.min(doc.id.len())]),
                Self::content(&doc.name),
                Self::label(&doc.doc_type.to_string()),
                Self::muted(&doc.file_url)
            );
        }

        println!("\n{}", Self::title(&format!("📅 Important Dates ({})", course.important_dates.len())));
        if course.important_dates.is_empty() {
            println!("  {}", Self::muted("No important dates yet"));
        }
        for date in &course.important_dates {
            println!(
                "  {} {} {} {}",
                Self::muted(&date.id[..8.min(date.id.len())]),
                Self::info(&format_event_date(&date.date)),
                Self::content(&date.title),
                Self::label(date.date_type.label())
            );
            if let Some(description) = &date.description {
                println!("      {}", Self::muted(description));
            }
        }
    }

    /// One line per course for the simple list
    pub fn format_course_line(course: &Course) -> String {
        let abbr = course
            .abbreviation
            .as_deref()
            .map(|a| format!(" ({})", a))
            .unwrap_or_default();
        format!(
            "{}{} {} {}",
            Self::course_name(&course.name),
            Self::muted(&abbr),
            Self::info(&format_credits(course.credits)),
            Self::status(course.status)
        )
    }

    /// Plain line used by the interactive selector
    pub fn format_course_for_selection(course: &Course) -> String {
        format!("[{}] {} ({})", course.semester, course.name, course.short_name())
    }

    pub fn print_event(event: &EventView) {
        println!(
            "  {} {} {} {}",
            Self::info(&format_event_date(&event.date)),
            Self::content(&event.title),
            Self::muted(&format!("· {}", event.course_name)),
            Self::label(event.date_type.label())
        );
    }
}

pub fn print_course_count(count: usize) {
    if count == 0 {
        println!("{}", OutputStyle::muted("No courses found."));
    } else {
        println!(
            "📚 {} ({} found)",
            OutputStyle::header("Courses"),
            OutputStyle::info(&count.to_string())
        );
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}

/// Display formatter for different output formats
pub struct DisplayFormatter;

impl DisplayFormatter {
    /// Print courses in the requested format.
    ///
    /// Simple and detailed output is grouped by semester; table and JSON
    /// keep the order of `courses`.
    pub fn format_list(courses: &[Course], format: &ListFormat) -> AppResult<()> {
        if courses.is_empty() {
            handle_flow(FlowResult::EmptyList {
                item_type: "courses matching your criteria".to_string(),
            });
            return Ok(());
        }

        match format {
            ListFormat::Simple => Self::print_simple_list(&group_by_semester(courses)),
            ListFormat::Detailed => Self::print_detailed_list(&group_by_semester(courses)),
            ListFormat::Table => Self::print_table_list(courses),
            ListFormat::Json => Self::print_json(courses)?,
        }

        Ok(())
    }

    fn print_group_header(group: &SemesterGroup) {
        let count = group.courses.len();
        println!(
            "\n{} {}",
            OutputStyle::semester(&group.label).bold(),
            OutputStyle::muted(&format!(
                "{} course{} · {}",
                count,
                if count == 1 { "" } else { "s" },
                format_credits(group.total_credits())
            ))
        );
    }

    fn print_simple_list(groups: &[SemesterGroup]) {
        print_course_count(groups.iter().map(|g| g.courses.len()).sum());
        println!("{}", OutputStyle::separator());

        for group in groups {
            Self::print_group_header(group);
            for course in &group.courses {
                println!("  {}", OutputStyle::format_course_line(course));
            }
        }
    }

    fn print_detailed_list(groups: &[SemesterGroup]) {
        OutputStyle::print_header("📚 Detailed Course List");

        for group in groups {
            Self::print_group_header(group);
            for (i, course) in group.courses.iter().enumerate() {
                println!();
                OutputStyle::print_course_field(CourseField::Name, course);
                OutputStyle::print_course_field(CourseField::Id, course);
                OutputStyle::print_course_field(CourseField::Abbreviation, course);
                OutputStyle::print_course_field(CourseField::Credits, course);
                OutputStyle::print_course_field(CourseField::Schedule, course);
                OutputStyle::print_course_field(CourseField::Status, course);
                if i < group.courses.len() - 1 {
                    println!("{}", OutputStyle::separator());
                }
            }
        }
    }

    fn print_table_list(courses: &[Course]) {
        print_course_count(courses.len());

        let name_width = courses
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(10, 45);

        println!("┌─{}─┬─{}─┬─{}─┬─{}─┐", "─".repeat(9), "─".repeat(name_width), "─".repeat(7), "─".repeat(8));
        println!(
            "│ {:<9} │ {:<name_width$} │ {:>7} │ {:<8} │",
            "Semester",
            "Course",
            "Credits",
            "Status",
            name_width = name_width
        );
        println!("├─{}─┼─{}─┼─{}─┼─{}─┤", "─".repeat(9), "─".repeat(name_width), "─".repeat(7), "─".repeat(8));

        for course in courses {
            println!(
                "│ {:<9} │ {:<name_width$} │ {:>7} │ {:<8} │",
                course.semester,
                truncate_string(&course.name, name_width),
                course.credits,
                course.status.to_string(),
                name_width = name_width
            );
        }

        println!("└─{}─┴─{}─┴─{}─┴─{}─┘", "─".repeat(9), "─".repeat(name_width), "─".repeat(7), "─".repeat(8));
    }

    pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Parse(format!("Failed to serialize to JSON: {}", e)))?;
        println!("{}", json);
        Ok(())
    }

    /// Semester overview with course counts and credits
    pub fn print_semesters(groups: &[SemesterGroup]) {
        if groups.is_empty() {
            handle_flow(FlowResult::EmptyList {
                item_type: "semesters".to_string(),
            });
            return;
        }

        OutputStyle::print_header(&format!("🗓️  Semesters ({})", groups.len()));
        for group in groups {
            let season = match Semester::parse(&group.label) {
                Ok(s) if s.is_winter() => "❄️ ",
                Ok(_) => "☀️ ",
                Err(_) => "  ",
            };
            println!(
                "  {}{:<9} {:>3} courses {:>8}",
                season,
                OutputStyle::semester(&group.label),
                group.courses.len(),
                format_credits(group.total_credits())
            );
        }
    }

    /// Grade table grouped by semester followed by the summary
    pub fn print_grades(groups: &[SemesterGroup], book: &GradeBook, summary: &GradeSummary) {
        OutputStyle::print_header("🎓 Grades");

        for group in groups {
            Self::print_group_header(group);
            for course in &group.courses {
                let grade = book
                    .get(&course.id)
                    .map(|e| e.grade.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .unwrap_or_else(|| "–".to_string());
                let grade = match book.get(&course.id).and_then(|e| e.value()) {
                    Some(_) => OutputStyle::info(&grade),
                    None if grade != "–" => OutputStyle::warning(&format!("{} (ignored)", grade)),
                    None => OutputStyle::muted(&grade),
                };
                println!(
                    "  {:<45} {:>3} ECTS  {}",
                    truncate_string(&course.name, 45),
                    course.credits,
                    grade
                );
            }
        }

        println!();
        Self::print_grade_summary(summary);
    }

    pub fn print_grade_summary(summary: &GradeSummary) {
        OutputStyle::print_field_colored(
            "Average",
            &format_average(summary.average, summary.graded_count),
            |s| OutputStyle::success(s).bold(),
        );
        OutputStyle::print_field_colored(
            "Progress",
            &format!("{} / {} ECTS", summary.graded_credits, summary.total_credits),
            OutputStyle::info,
        );
        OutputStyle::print_field_colored("Graded", &summary.graded_count.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Open", &format_credits(summary.open_credits()), OutputStyle::muted);
    }

    pub fn print_course_stats(stats: &CourseStats) {
        OutputStyle::print_header("📊 Course Statistics");
        OutputStyle::print_field_colored("Courses", &stats.total_courses.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Semesters", &stats.semesters.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Credits", &format_credits(stats.total_credits), OutputStyle::info);
        OutputStyle::print_field_colored("Documents", &stats.total_documents.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Dates", &stats.total_dates.to_string(), OutputStyle::info);
    }

    pub fn print_events(title: &str, events: &[EventView], empty_label: &str) {
        println!("\n{}", OutputStyle::title(title));
        if events.is_empty() {
            println!("  {}", OutputStyle::muted(empty_label));
            return;
        }
        for event in events {
            OutputStyle::print_event(event);
        }
    }

    pub fn print_dashboard_stats(stats: &DashboardStats) {
        OutputStyle::print_header("🏠 Dashboard");
        OutputStyle::print_field_colored("Courses", &stats.total_courses.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Documents", &stats.total_documents.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Events", &stats.upcoming_events.to_string(), OutputStyle::info);
    }

    pub fn print_deadlines(deadlines: &[Deadline], today: NaiveDate) {
        println!("\n{}", OutputStyle::title(&format!("✅ Deadlines ({})", deadlines.len())));
        if deadlines.is_empty() {
            println!("  {}", OutputStyle::muted("Nothing to do"));
            return;
        }

        for (i, deadline) in deadlines.iter().enumerate() {
            let check = if deadline.completed { "[x]" } else { "[ ]" };
            let title = if deadline.completed {
                OutputStyle::muted(&deadline.title).strikethrough()
            } else if deadline.is_overdue(today) {
                OutputStyle::error(&deadline.title)
            } else {
                OutputStyle::content(&deadline.title)
            };
            let due = match (deadline.due_date, deadline.due_time) {
                (Some(date), Some(time)) => format!(" due {} {}", date, time.format("%H:%M")),
                (Some(date), None) => format!(" due {}", date),
                (None, Some(time)) => format!(" due {}", time.format("%H:%M")),
                (None, None) => String::new(),
            };
            println!(
                "  {:>2}. {} {} {}{}",
                i + 1,
                check,
                OutputStyle::label(&deadline.kind.to_string()),
                title,
                OutputStyle::muted(&due)
            );
        }
    }
}
