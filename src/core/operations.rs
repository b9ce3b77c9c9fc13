//! Core operations implementation
//!
//! File-backed implementation of the course store traits. The whole
//! collection lives in one JSON file that is read and rewritten per call.

use crate::config::Config;
use crate::core::data::{
    Course, CourseCollection, CourseFilter, CourseStats, CourseStatus, Document, ImportantDate,
    ValidCourse,
};
use crate::core::semester::Semester;
use crate::core::traits::{CourseCrud, CourseSearch, CourseStorage};
use crate::utils::error::{AppError, AppResult};
use std::path::Path;
use tracing::{debug, info};

/// Main operations hub implementing the course store traits
pub struct CourseOperations {
    config: Config,
}

impl CourseOperations {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn data_file(&self) -> &Path {
        &self.config.general.data_file
    }

    fn load_existing(&self) -> AppResult<CourseCollection> {
        self.ensure_storage_exists()?;
        self.load_courses()
    }

    /// Load, modify one course, save, and return the modified course
    fn modify_course<F>(&self, id: &str, change: F) -> AppResult<Course>
    where
        F: FnOnce(&mut Course) -> AppResult<()>,
    {
        let mut collection = self.load_existing()?;
        let course = collection
            .find_by_id_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Course '{}'", id)))?;
        change(course)?;
        course.touch();
        let updated = course.clone();
        self.save_courses(&collection)?;
        Ok(updated)
    }
}

impl CourseStorage for CourseOperations {
    fn load_courses(&self) -> AppResult<CourseCollection> {
        let path = self.data_file();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read course file {}: {}", path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(CourseCollection::default());
        }

        let collection: CourseCollection = serde_json::from_str(&content)
            .map_err(|e| AppError::Parse(format!("Failed to parse course file {}: {}", path.display(), e)))?;
        debug!(courses = collection.courses.len(), "loaded courses");
        Ok(collection)
    }

    fn save_courses(&self, collection: &CourseCollection) -> AppResult<()> {
        let path = self.data_file();
        let content = serde_json::to_string_pretty(collection)
            .map_err(|e| AppError::Parse(format!("Failed to serialize course collection: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AppError::Io(format!("Failed to write course file {}: {}", path.display(), e)))?;
        debug!(courses = collection.courses.len(), "saved courses");
        Ok(())
    }

    fn ensure_storage_exists(&self) -> AppResult<()> {
        let path = self.data_file();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Io(format!("Failed to create data directory {}: {}", parent.display(), e))
                })?;
            }
            info!(path = %path.display(), "creating empty course store");
            self.save_courses(&CourseCollection::default())?;
        }
        Ok(())
    }
}

impl CourseSearch for CourseOperations {
    fn list_courses(&self, filter: &CourseFilter) -> AppResult<Vec<Course>> {
        let collection = self.load_existing()?;
        Ok(collection.search(filter, &self.config.general.sort_by))
    }

    fn find_course(&self, identifier: &str) -> AppResult<Option<Course>> {
        let collection = self.load_existing()?;
        Ok(collection.find(identifier).cloned())
    }

    fn get_semesters(&self) -> AppResult<Vec<String>> {
        Ok(self.load_existing()?.get_semesters())
    }

    fn get_course_stats(&self) -> AppResult<CourseStats> {
        Ok(self.load_existing()?.get_stats())
    }
}

impl CourseCrud for CourseOperations {
    fn add_course(&self, input: ValidCourse) -> AppResult<Course> {
        let mut collection = self.load_existing()?;
        let course = input.into_course();
        collection.add_course(course.clone());
        self.save_courses(&collection)?;
        info!(id = %course.id, name = %course.name, semester = %course.semester, "course created");
        Ok(course)
    }

    fn update_course(&self, id: &str, input: ValidCourse) -> AppResult<Course> {
        let course = self.modify_course(id, |course| {
            course.apply(input);
            Ok(())
        })?;
        info!(id, "course updated");
        Ok(course)
    }

    fn delete_course(&self, id: &str) -> AppResult<Course> {
        let mut collection = self.load_existing()?;
        let removed = collection
            .delete_course(id)
            .ok_or_else(|| AppError::NotFound(format!("Course '{}'", id)))?;
        self.save_courses(&collection)?;
        info!(id, name = %removed.name, "course deleted");
        Ok(removed)
    }

    fn move_course(&self, id: &str, semester: &str) -> AppResult<Course> {
        let target = Semester::parse(semester)?;
        let course = self.modify_course(id, |course| {
            course.semester = target.label();
            Ok(())
        })?;
        info!(id, semester = %target, "course moved");
        Ok(course)
    }

    fn set_status(&self, id: &str, status: CourseStatus) -> AppResult<Course> {
        self.modify_course(id, |course| {
            course.status = status;
            Ok(())
        })
    }

    fn add_document(&self, course_id: &str, document: Document) -> AppResult<Course> {
        self.modify_course(course_id, |course| {
            course.documents.push(document);
            Ok(())
        })
    }

    fn remove_document(&self, course_id: &str, document_id: &str) -> AppResult<Course> {
        self.modify_course(course_id, |course| {
            let index = course
                .documents
                .iter()
                .position(|d| d.id == document_id)
                .ok_or_else(|| AppError::NotFound(format!("Document '{}'", document_id)))?;
            course.documents.remove(index);
            Ok(())
        })
    }

    fn add_important_date(&self, course_id: &str, date: ImportantDate) -> AppResult<Course> {
        self.modify_course(course_id, |course| {
            course.important_dates.push(date);
            course.important_dates.sort_by(|a, b| a.date.cmp(&b.date));
            Ok(())
        })
    }

    fn remove_important_date(&self, course_id: &str, date_id: &str) -> AppResult<Course> {
        self.modify_course(course_id, |course| {
            let index = course
                .important_dates
                .iter()
                .position(|d| d.id == date_id)
                .ok_or_else(|| AppError::NotFound(format!("Important date '{}'", date_id)))?;
            course.important_dates.remove(index);
            Ok(())
        })
    }

    fn clear_all(&self) -> AppResult<usize> {
        let collection = self.load_existing()?;
        let removed = collection.courses.len();
        self.save_courses(&CourseCollection::default())?;
        info!(removed, "course store cleared");
        Ok(removed)
    }
}
