// Command handlers, one module per command group
pub mod config;    // Configuration management
pub mod crud;      // Courses, documents, dates, seeding
pub mod deadlines; // Personal deadline list
pub mod grades;    // Grades and the weighted average
pub mod prefs;     // Saved view preferences
pub mod query;     // Listing, semesters, events, dashboard

use crate::core::data::Course;
use crate::core::operations::CourseOperations;
use crate::core::traits::CourseSearch;
use crate::utils::error::{handle_flow, AppResult, FlowResult};

/// Look up a course, reporting a "not found" flow message when it is missing
pub(crate) fn find_or_report(manager: &CourseOperations, identifier: &str) -> AppResult<Option<Course>> {
    let course = manager.find_course(identifier)?;
    if course.is_none() {
        handle_flow(FlowResult::NotFound {
            item_type: "Course".to_string(),
            search_term: identifier.to_string(),
        });
    }
    Ok(course)
}
