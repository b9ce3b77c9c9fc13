// Grade operations - record grades and report the weighted average

use crate::cli::GradeCommands;
use crate::config::Config;
use crate::core::data::{Course, CourseFilter};
use crate::core::grades::{parse_grade, status_for_grade, GradeBook, BEST_GRADE, WORST_GRADE};
use crate::core::operations::CourseOperations;
use crate::core::preferences::{FilePreferences, PreferencesStore};
use crate::core::semester::group_by_semester;
use crate::core::traits::{CourseCrud, CourseSearch};
use crate::manager::find_or_report;
use crate::utils::error::{AppError, AppResult};
use crate::utils::{print_success, DisplayFormatter, OutputStyle};
use tracing::{info, warn};

/// Load the grade book and align it with the current courses
pub(crate) fn load_grade_book(prefs: &mut impl PreferencesStore, courses: &[Course]) -> AppResult<GradeBook> {
    let stored = prefs.get_value(GradeBook::KEY).unwrap_or_default();
    let mut book = match GradeBook::from_value(stored) {
        Ok(book) => book,
        Err(e) => {
            warn!(error = %e, "discarding unreadable grades");
            GradeBook::default()
        }
    };
    if book.sync_with_courses(courses) {
        prefs.set_value(GradeBook::KEY, book.to_value())?;
    }
    Ok(book)
}

/// Store a grade (empty text clears it) together with the implied status.
///
/// The course status is written first. When the grade cannot be saved the
/// previous status is put back, so store and preferences never disagree.
pub(crate) fn record_grade(
    manager: &CourseOperations,
    prefs: &mut impl PreferencesStore,
    book: &mut GradeBook,
    course: &Course,
    grade: &str,
) -> AppResult<Course> {
    let grade = grade.trim();
    let updated = manager.set_status(&course.id, status_for_grade(grade))?;

    let mut next = book.clone();
    next.set(&course.id, grade);
    if let Err(e) = prefs.set_value(GradeBook::KEY, next.to_value()) {
        if let Err(undo) = manager.set_status(&course.id, course.status) {
            warn!(course = %course.id, error = %undo, "could not restore course status");
        }
        return Err(e);
    }

    *book = next;
    Ok(updated)
}

pub fn handle_grade_command(config: &Config, command: GradeCommands) -> AppResult<()> {
    let manager = CourseOperations::new(config);
    let mut prefs = FilePreferences::open(&config.general.prefs_file)?;
    let courses = manager.list_courses(&CourseFilter::default())?;
    let mut book = load_grade_book(&mut prefs, &courses)?;

    match command {
        GradeCommands::Set { course, grade } => {
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            if parse_grade(&grade).is_none() {
                return Err(AppError::Validation(format!(
                    "Grade must be a number between {:.1} and {:.1}",
                    BEST_GRADE, WORST_GRADE
                )));
            }

            let updated = record_grade(&manager, &mut prefs, &mut book, &course, &grade)?;
            info!(course = %course.id, grade = grade.trim(), "grade recorded");

            print_success(&format!(
                "{}: {} ({})",
                updated.name,
                grade.trim(),
                updated.status
            ));
            print_average(&manager, &book)?;
        }
        GradeCommands::Clear { course } => {
            let Some(course) = find_or_report(&manager, &course)? else {
                return Ok(());
            };
            record_grade(&manager, &mut prefs, &mut book, &course, "")?;
            info!(course = %course.id, "grade cleared");

            print_success(&format!("Grade for '{}' cleared", course.name));
            print_average(&manager, &book)?;
        }
        GradeCommands::List { json } => {
            if json {
                DisplayFormatter::print_json(book.entries())?;
            } else {
                DisplayFormatter::print_grades(&group_by_semester(&courses), &book, &book.summary(&courses));
            }
        }
        GradeCommands::Average { json } => {
            let summary = book.summary(&courses);
            if json {
                DisplayFormatter::print_json(&summary)?;
            } else {
                OutputStyle::print_header("🎓 Grade Average");
                DisplayFormatter::print_grade_summary(&summary);
            }
        }
    }

    Ok(())
}

fn print_average(manager: &CourseOperations, book: &GradeBook) -> AppResult<()> {
    let courses = manager.list_courses(&CourseFilter::default())?;
    println!();
    DisplayFormatter::print_grade_summary(&book.summary(&courses));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{CourseCollection, CourseStatus};
    use crate::core::preferences::MemoryPreferences;
    use crate::core::traits::CourseStorage;
    use serde_json::json;

    fn store_with_course(dir: &std::path::Path) -> (CourseOperations, Course) {
        let config = Config::in_dir(dir);
        let manager = CourseOperations::new(&config);
        manager.ensure_storage_exists().unwrap();

        let course = Course::new("Datenbanken 1".to_string(), 6, "WS24/25".to_string());
        let mut collection = CourseCollection::default();
        collection.add_course(course.clone());
        manager.save_courses(&collection).unwrap();
        (manager, course)
    }

    #[test]
    fn test_record_grade_updates_status_and_book() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, course) = store_with_course(dir.path());
        let mut prefs = MemoryPreferences::new();
        let mut book = GradeBook::default();

        let updated = record_grade(&manager, &mut prefs, &mut book, &course, " 4.3 ").unwrap();
        assert_eq!(updated.status, CourseStatus::Failed);
        assert_eq!(book.get(&course.id).unwrap().grade, "4.3");

        let stored = GradeBook::from_value(prefs.get_value(GradeBook::KEY).unwrap()).unwrap();
        assert_eq!(stored, book);

        let cleared = record_grade(&manager, &mut prefs, &mut book, &course, "").unwrap();
        assert_eq!(cleared.status, CourseStatus::Enrolled);
        assert_eq!(book.get(&course.id).unwrap().grade, "");
    }

    #[test]
    fn test_record_grade_leaves_book_alone_when_status_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, _) = store_with_course(dir.path());
        let missing = Course::new("Gone".to_string(), 6, "SS25".to_string());
        let mut prefs = MemoryPreferences::new();
        let mut book = GradeBook::default();

        assert!(record_grade(&manager, &mut prefs, &mut book, &missing, "1.0").is_err());
        assert!(book.get(&missing.id).is_none());
        assert!(prefs.get_value(GradeBook::KEY).is_none());
    }

    #[test]
    fn test_load_grade_book_syncs_and_saves() {
        let courses = vec![
            Course::new("A".to_string(), 6, "SS25".to_string()),
            Course::new("B".to_string(), 6, "SS25".to_string()),
        ];
        let mut legacy = serde_json::Map::new();
        legacy.insert(courses[0].id.clone(), json!("1.3"));
        legacy.insert("gone".to_string(), json!("2.0"));
        let mut prefs = MemoryPreferences::new();
        prefs.set_value(GradeBook::KEY, legacy.into()).unwrap();

        let book = load_grade_book(&mut prefs, &courses).unwrap();
        assert_eq!(book.entries().len(), 2);
        assert_eq!(book.get(&courses[0].id).unwrap().grade, "1.3");
        assert!(book.get("gone").is_none());

        let stored = prefs.get_value(GradeBook::KEY).unwrap();
        assert!(stored.is_array());
        assert_eq!(stored.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_load_grade_book_recovers_from_garbage() {
        let courses = vec![Course::new("A".to_string(), 6, "SS25".to_string())];
        let mut prefs = MemoryPreferences::new();
        prefs.set_value(GradeBook::KEY, json!(42)).unwrap();

        let book = load_grade_book(&mut prefs, &courses).unwrap();
        assert_eq!(book.entries().len(), 1);
        assert_eq!(book.get(&courses[0].id).unwrap().grade, "");
    }
}
