//! studytrack - a Rust-based study tracker
//!
//! This library provides the course store, semester ordering, the
//! credit-weighted grade average and the preferences store behind the
//! `studytrack` command-line tool.

pub mod cli;
pub mod config;
pub mod core;
pub mod manager;
pub mod utils;

// Re-export core types and traits for easier use
pub use core::{
    data::{Course, CourseCollection, CourseFilter, CourseInput, CourseStats},
    grades::{calculate_average, GradeBook, GradeEntry, GradeSummary},
    operations::CourseOperations,
    preferences::{FilePreferences, MemoryPreferences, PreferencesStore},
    semester::{group_by_semester, sort_key, Semester},
    traits::{CourseCrud, CourseSearch, CourseStorage},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main library interface for external usage
pub struct StudyTrack {
    operations: CourseOperations,
}

impl StudyTrack {
    /// Create a new StudyTrack instance with the given configuration
    pub fn new(config: config::Config) -> Self {
        Self {
            operations: CourseOperations::new(&config),
        }
    }

    /// Get the underlying operations for direct access
    pub fn operations(&self) -> &CourseOperations {
        &self.operations
    }

    /// Open the preferences store named in the configuration
    pub fn preferences(&self) -> utils::error::AppResult<FilePreferences> {
        FilePreferences::open(&self.operations.config().general.prefs_file)
    }
}
