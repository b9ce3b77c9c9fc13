// CRUD operations - courses and their attachments, seeding and clearing

use crate::cli::{
    ClearArgs, CourseFields, DateCommands, DeleteArgs, DocCommands, EditArgs, MoveArgs, NewArgs,
    SeedArgs, ShowArgs, StatusArgs,
};
use crate::config::Config;
use crate::core::data::{Course, CourseCollection, CourseFilter, CourseInput, Document, ImportantDate};
use crate::core::operations::CourseOperations;
use crate::core::seed::demo_courses;
use crate::core::semester::compare_labels;
use crate::core::traits::{CourseCrud, CourseSearch, CourseStorage};
use crate::manager::find_or_report;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::format::{format_event_date, parse_date_input};
use crate::utils::{self, print_success, print_warning, OutputStyle};
use chrono::Utc;
use tracing::info;

// Create operations
pub fn handle_new_command(config: &Config, args: &NewArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    let input = fill_course_form(&args.fields, &CourseInput::default(), false)?;
    let course = manager.add_course(input.validate()?)?;

    print_success(&format!(
        "Course '{}' created in {}",
        course.name, course.semester
    ));
    Ok(())
}

/// Complete the course form from flags, prompting for whatever is missing.
///
/// With `keep_current` an empty answer keeps the value from `base`.
fn fill_course_form(fields: &CourseFields, base: &CourseInput, keep_current: bool) -> AppResult<CourseInput> {
    let ask = |label: &str, given: &Option<String>, current: &str| -> AppResult<String> {
        match given {
            Some(value) => Ok(value.clone()),
            None if keep_current => {
                utils::prompt_with_default(&OutputStyle::label(label).to_string(), current)
            }
            None => utils::prompt_input(&format!("{}: ", OutputStyle::label(label))),
        }
    };

    let abbreviation = ask(
        "Abbreviation (optional)",
        &fields.abbreviation,
        base.abbreviation.as_deref().unwrap_or_default(),
    )?;

    Ok(CourseInput {
        name: ask("Name", &fields.name, &base.name)?,
        abbreviation: Some(abbreviation).filter(|a| !a.trim().is_empty()),
        credits: ask("Credits (ECTS)", &fields.credits, &base.credits)?,
        semester: ask("Semester (e.g. WS24/25, SS25)", &fields.semester, &base.semester)?,
        instructor: ask("Instructor", &fields.instructor, &base.instructor)?,
        day: ask("Day", &fields.day, &base.day)?,
        time: ask("Time", &fields.time, &base.time)?,
        room: ask("Room", &fields.room, &base.room)?,
    })
}

/// Merge flag values over the current course without prompting
fn merge_course_form(fields: &CourseFields, base: CourseInput) -> CourseInput {
    let pick = |given: &Option<String>, current: String| given.clone().unwrap_or(current);
    CourseInput {
        name: pick(&fields.name, base.name),
        abbreviation: match &fields.abbreviation {
            Some(a) if a.trim().is_empty() => None,
            Some(a) => Some(a.clone()),
            None => base.abbreviation,
        },
        credits: pick(&fields.credits, base.credits),
        semester: pick(&fields.semester, base.semester),
        instructor: pick(&fields.instructor, base.instructor),
        day: pick(&fields.day, base.day),
        time: pick(&fields.time, base.time),
        room: pick(&fields.room, base.room),
    }
}

/// Pick a course from the interactive list
fn select_course(manager: &CourseOperations) -> AppResult<Option<Course>> {
    let mut courses = manager.list_courses(&CourseFilter::default())?;
    if courses.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: "courses".to_string(),
        });
        return Ok(None);
    }
    courses.sort_by(|a, b| compare_labels(&a.semester, &b.semester).then_with(|| a.name.cmp(&b.name)));

    let lines: Vec<String> = courses.iter().map(OutputStyle::format_course_for_selection).collect();
    match utils::select_from_list(&lines)? {
        Some(index) => Ok(courses.into_iter().nth(index)),
        None => {
            handle_flow(FlowResult::Cancelled("Course selection cancelled".to_string()));
            Ok(None)
        }
    }
}

fn resolve_or_select(manager: &CourseOperations, identifier: Option<&str>) -> AppResult<Option<Course>> {
    match identifier {
        Some(identifier) => find_or_report(manager, identifier),
        None => select_course(manager),
    }
}

// Read operations
pub fn handle_show_command(config: &Config, args: &ShowArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    if let Some(course) = resolve_or_select(&manager, args.identifier.as_deref())? {
        OutputStyle::print_course_detailed(&course);
    }

    Ok(())
}

// Update operations
pub fn handle_edit_command(config: &Config, args: &EditArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    let Some(course) = resolve_or_select(&manager, args.identifier.as_deref())? else {
        return Ok(());
    };

    let current = CourseInput::from_course(&course);
    let input = if args.fields.is_empty() {
        fill_course_form(&args.fields, &current, true)?
    } else {
        merge_course_form(&args.fields, current)
    };

    let updated = manager.update_course(&course.id, input.validate()?)?;
    print_success(&format!("Course '{}' updated", updated.name));
    Ok(())
}

pub fn handle_move_command(config: &Config, args: &MoveArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    if let Some(course) = find_or_report(&manager, &args.identifier)? {
        let moved = manager.move_course(&course.id, &args.semester)?;
        print_success(&format!(
            "Moved '{}' from {} to {}",
            moved.name, course.semester, moved.semester
        ));
    }
    Ok(())
}

pub fn handle_status_command(config: &Config, args: &StatusArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    if let Some(course) = find_or_report(&manager, &args.identifier)? {
        let updated = manager.set_status(&course.id, args.status)?;
        println!(
            "{} is now {}",
            OutputStyle::course_name(&updated.name),
            OutputStyle::status(updated.status)
        );
    }
    Ok(())
}

// Delete operations
pub fn handle_delete_command(config: &Config, args: &DeleteArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    let Some(course) = find_or_report(&manager, &args.identifier)? else {
        return Ok(());
    };

    println!("Course to delete:");
    OutputStyle::print_course_basic(&course);

    if !args.force && !utils::prompt_yes_no("\nAre you sure you want to delete this course?")? {
        handle_flow(FlowResult::Cancelled("Course not deleted".to_string()));
        return Ok(());
    }

    manager.delete_course(&course.id)?;
    print_success(&format!("Course '{}' deleted", course.name));
    Ok(())
}

/// Full ID for an exact ID or a unique ID prefix
fn resolve_attachment_id<'a>(ids: impl Iterator<Item = &'a str>, given: &str) -> Option<String> {
    let matches: Vec<&str> = ids.filter(|id| id.starts_with(given)).collect();
    match matches.as_slice() {
        [only] => Some(only.to_string()),
        many => many.iter().copied().find(|id| *id == given).map(str::to_string),
    }
}

pub fn handle_doc_command(config: &Config, command: DocCommands) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    match command {
        DocCommands::Add {
            course,
            name,
            r#type,
            url,
        } => {
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            let document = Document::new(name.trim().to_string(), r#type, url);
            let id = document.id.clone();
            manager.add_document(&course.id, document)?;
            print_success(&format!("Document '{}' added to {} ({})", name.trim(), course.name, &id[..8]));
        }
        DocCommands::Remove { course, document_id } => {
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            let Some(id) = resolve_attachment_id(course.documents.iter().map(|d| d.id.as_str()), &document_id) else {
                handle_flow(FlowResult::NotFound {
                    item_type: "Document".to_string(),
                    search_term: document_id,
                });
                return Ok(());
            };
            manager.remove_document(&course.id, &id)?;
            print_success(&format!("Document removed from {}", course.name));
        }
    }
    Ok(())
}

pub fn handle_date_command(config: &Config, command: DateCommands) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    match command {
        DateCommands::Add {
            course,
            title,
            date,
            r#type,
            description,
        } => {
            let when = parse_date_input(&date)?;
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            let mut important = ImportantDate::new(title.trim().to_string(), when, r#type);
            important.description = description.filter(|d| !d.trim().is_empty());
            manager.add_important_date(&course.id, important)?;
            print_success(&format!(
                "{} '{}' on {} added to {}",
                r#type.label(),
                title.trim(),
                format_event_date(&when),
                course.name
            ));
        }
        DateCommands::Remove { course, date_id } => {
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            let Some(id) = resolve_attachment_id(course.important_dates.iter().map(|d| d.id.as_str()), &date_id) else {
                handle_flow(FlowResult::NotFound {
                    item_type: "Important date".to_string(),
                    search_term: date_id,
                });
                return Ok(());
            };
            manager.remove_important_date(&course.id, &id)?;
            print_success(&format!("Important date removed from {}", course.name));
        }
    }
    Ok(())
}

pub fn handle_seed_command(config: &Config, args: &SeedArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);
    manager.ensure_storage_exists()?;

    let existing = manager.load_courses()?.courses.len();
    if existing > 0 && !args.force {
        print_warning(&format!(
            "The store already holds {} courses; use --force to replace them with the demo courses",
            existing
        ));
        return Ok(());
    }

    let mut collection = CourseCollection::default();
    for course in demo_courses(Utc::now()) {
        collection.add_course(course);
    }
    let count = collection.courses.len();
    manager.save_courses(&collection)?;
    info!(count, replaced = existing, "seeded demo courses");

    print_success(&format!("Store replaced with {} demo courses", count));
    Ok(())
}

pub fn handle_clear_command(config: &Config, args: &ClearArgs) -> AppResult<()> {
    let manager = CourseOperations::new(config);

    if !args.force && !utils::prompt_yes_no("Delete ALL courses with their documents and dates?")? {
        handle_flow(FlowResult::Cancelled("Nothing deleted".to_string()));
        return Ok(());
    }

    let removed = manager.clear_all()?;
    print_success(&format!("Deleted {} courses", removed));
    Ok(())
}
