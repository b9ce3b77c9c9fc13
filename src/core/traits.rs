//! Core trait definitions for the course store
//!
//! These traits define the operations the presentation layer needs from
//! persistent course storage, so the logic on top stays independent of how
//! courses are kept.

use crate::core::data::{
    Course, CourseCollection, CourseFilter, CourseStats, CourseStatus, Document, ImportantDate,
    ValidCourse,
};
use crate::utils::error::AppResult;

/// Storage operations for courses
///
/// This trait defines the interface for loading and saving course collections
/// from/to persistent storage.
pub trait CourseStorage {
    /// Load courses from storage
    fn load_courses(&self) -> AppResult<CourseCollection>;

    /// Save courses to storage
    fn save_courses(&self, collection: &CourseCollection) -> AppResult<()>;

    /// Ensure the storage location exists
    fn ensure_storage_exists(&self) -> AppResult<()>;
}

/// Read operations for courses
pub trait CourseSearch {
    /// Courses matching the filter, ordered per configuration
    fn list_courses(&self, filter: &CourseFilter) -> AppResult<Vec<Course>>;

    /// Find a course by ID, abbreviation or name
    fn find_course(&self, identifier: &str) -> AppResult<Option<Course>>;

    /// Distinct semester labels in chronological order
    fn get_semesters(&self) -> AppResult<Vec<String>>;

    fn get_course_stats(&self) -> AppResult<CourseStats>;
}

/// CRUD operations for courses and their attachments
///
/// Every mutating call loads the collection, applies the change and saves it
/// back. Unknown course or attachment IDs yield `AppError::NotFound`.
pub trait CourseCrud: CourseStorage + CourseSearch {
    /// Store a new course and return it with its assigned ID
    fn add_course(&self, input: ValidCourse) -> AppResult<Course>;

    fn update_course(&self, id: &str, input: ValidCourse) -> AppResult<Course>;

    /// Delete a course with its documents and dates
    fn delete_course(&self, id: &str) -> AppResult<Course>;

    /// Move a course to another semester (label is validated)
    fn move_course(&self, id: &str, semester: &str) -> AppResult<Course>;

    fn set_status(&self, id: &str, status: CourseStatus) -> AppResult<Course>;

    fn add_document(&self, course_id: &str, document: Document) -> AppResult<Course>;

    fn remove_document(&self, course_id: &str, document_id: &str) -> AppResult<Course>;

    fn add_important_date(&self, course_id: &str, date: ImportantDate) -> AppResult<Course>;

    fn remove_important_date(&self, course_id: &str, date_id: &str) -> AppResult<Course>;

    /// Remove every course, returning how many were removed
    fn clear_all(&self) -> AppResult<usize>;
}
