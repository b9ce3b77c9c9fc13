//! Core data structures for course management
//!
//! This module contains the records kept in the course store: courses and
//! the documents and important dates attached to them.

use crate::config::SortBy;
use crate::core::semester::{self, Semester};
use crate::utils::error::{AppError, AppResult};
use crate::utils::format;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Enrollment status of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    #[default]
    Enrolled,
    Passed,
    Failed,
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CourseStatus::Enrolled => "ENROLLED",
            CourseStatus::Passed => "PASSED",
            CourseStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Lecture,
    Assignment,
    Exam,
    Notes,
    Other,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentType::Lecture => "LECTURE",
            DocumentType::Assignment => "ASSIGNMENT",
            DocumentType::Exam => "EXAM",
            DocumentType::Notes => "NOTES",
            DocumentType::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportantDateType {
    AssignmentDue,
    ProjectDue,
    ExamDate,
    Lecture,
    Other,
}

impl ImportantDateType {
    /// Types that count as deadlines on the weekly dashboard
    pub fn is_deadline(&self) -> bool {
        matches!(
            self,
            ImportantDateType::AssignmentDue | ImportantDateType::ProjectDue | ImportantDateType::ExamDate
        )
    }

    /// Human readable label, e.g. "assignment due"
    pub fn label(&self) -> &'static str {
        match self {
            ImportantDateType::AssignmentDue => "assignment due",
            ImportantDateType::ProjectDue => "project due",
            ImportantDateType::ExamDate => "exam date",
            ImportantDateType::Lecture => "lecture",
            ImportantDateType::Other => "other",
        }
    }
}

/// A file or link attached to a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: String,
    #[serde(with = "format")]
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(name: String, doc_type: DocumentType, file_url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            doc_type,
            file_url,
            created_at: Utc::now(),
        }
    }
}

/// A dated event belonging to a course (deadline, exam, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDate {
    pub id: String,
    pub title: String,
    #[serde(with = "format")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub date_type: ImportantDateType,
    #[serde(default, deserialize_with = "format::deserialize_option_string")]
    pub description: Option<String>,
}

impl ImportantDate {
    pub fn new(title: String, date: DateTime<Utc>, date_type: ImportantDateType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            date,
            date_type,
            description: None,
        }
    }
}

/// A single course with its attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "format::deserialize_option_string")]
    pub abbreviation: Option<String>,
    pub credits: u32,
    pub semester: String,
    pub instructor: String,
    pub day: String,
    pub time: String,
    pub room: String,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub important_dates: Vec<ImportantDate>,
    #[serde(with = "format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "format")]
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a new course with empty scheduling fields
    pub fn new(name: String, credits: u32, semester: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            abbreviation: None,
            credits,
            semester,
            instructor: String::new(),
            day: String::new(),
            time: String::new(),
            room: String::new(),
            status: CourseStatus::Enrolled,
            documents: Vec::new(),
            important_dates: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Short code if present, otherwise the full name
    pub fn short_name(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Overwrite the editable fields from validated input
    pub fn apply(&mut self, input: ValidCourse) {
        self.name = input.name;
        self.abbreviation = input.abbreviation;
        self.credits = input.credits;
        self.semester = input.semester.label();
        self.instructor = input.instructor;
        self.day = input.day;
        self.time = input.time;
        self.room = input.room;
        self.touch();
    }

    fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .abbreviation
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&query))
            || self.instructor.to_lowercase().contains(&query)
            || self.semester.to_lowercase().contains(&query)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.abbreviation {
            Some(abbr) => write!(f, "{} ({}) [{}]", self.name, abbr, self.semester),
            None => write!(f, "{} [{}]", self.name, self.semester),
        }
    }
}

/// Upper bound accepted for a single course's credits
pub const MAX_CREDITS: u32 = 999;

/// Unvalidated course form data
#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub name: String,
    pub abbreviation: Option<String>,
    pub credits: String,
    pub semester: String,
    pub instructor: String,
    pub day: String,
    pub time: String,
    pub room: String,
}

/// Course form data that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCourse {
    pub name: String,
    pub abbreviation: Option<String>,
    pub credits: u32,
    pub semester: Semester,
    pub instructor: String,
    pub day: String,
    pub time: String,
    pub room: String,
}

impl CourseInput {
    pub fn validate(&self) -> AppResult<ValidCourse> {
        let required = [
            &self.name,
            &self.credits,
            &self.semester,
            &self.instructor,
            &self.day,
            &self.time,
            &self.room,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let credits = match self.credits.trim().parse::<u32>() {
            Ok(credits) if (1..=MAX_CREDITS).contains(&credits) => credits,
            _ => {
                return Err(AppError::Validation(format!(
                    "Credits must be a whole number between 1 and {}",
                    MAX_CREDITS
                )))
            }
        };

        let semester = Semester::parse(&self.semester)?;

        Ok(ValidCourse {
            name: self.name.trim().to_string(),
            abbreviation: self
                .abbreviation
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            credits,
            semester,
            instructor: self.instructor.trim().to_string(),
            day: self.day.trim().to_string(),
            time: self.time.trim().to_string(),
            room: self.room.trim().to_string(),
        })
    }

    /// Prefill the form with the current values of a course
    pub fn from_course(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            abbreviation: course.abbreviation.clone(),
            credits: course.credits.to_string(),
            semester: course.semester.clone(),
            instructor: course.instructor.clone(),
            day: course.day.clone(),
            time: course.time.clone(),
            room: course.room.clone(),
        }
    }
}

impl ValidCourse {
    pub fn into_course(self) -> Course {
        let mut course = Course::new(self.name.clone(), self.credits, self.semester.label());
        course.apply(self);
        course.updated_at = course.created_at;
        course
    }
}

/// Filter applied when listing courses
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub semester: Option<String>,
    pub query: Option<String>,
    pub status: Option<CourseStatus>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let semester_ok = self
            .semester
            .as_deref()
            .is_none_or(|s| s.is_empty() || course.semester == s);
        let query_ok = self
            .query
            .as_deref()
            .is_none_or(|q| q.trim().is_empty() || course.matches_query(q.trim()));
        let status_ok = self.status.is_none_or(|s| course.status == s);
        semester_ok && query_ok && status_ok
    }
}

/// Collection of courses as persisted by the store
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourseCollection {
    pub courses: Vec<Course>,
}

/// Statistics about the course collection
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStats {
    pub total_courses: usize,
    pub total_documents: usize,
    pub total_dates: usize,
    pub total_credits: u32,
    pub semesters: usize,
}

impl CourseCollection {
    pub fn new() -> Self {
        Self {
            courses: Vec::new(),
        }
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == id)
    }

    /// Find a course by ID, abbreviation or name (case-insensitive)
    pub fn find(&self, identifier: &str) -> Option<&Course> {
        if let Some(course) = self.find_by_id(identifier) {
            return Some(course);
        }
        let needle = identifier.trim().to_lowercase();
        self.courses
            .iter()
            .find(|c| c.abbreviation.as_deref().is_some_and(|a| a.to_lowercase() == needle))
            .or_else(|| self.courses.iter().find(|c| c.name.to_lowercase() == needle))
    }

    pub fn delete_course(&mut self, id: &str) -> Option<Course> {
        let index = self.courses.iter().position(|c| c.id == id)?;
        Some(self.courses.remove(index))
    }

    /// Courses matching the filter, ordered per `sort_by`
    pub fn search(&self, filter: &CourseFilter, sort_by: &SortBy) -> Vec<Course> {
        let mut courses: Vec<Course> = self
            .courses
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        match sort_by {
            SortBy::Recency => courses.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Name => courses.sort_by_key(|c| c.name.to_lowercase()),
            SortBy::Credits => courses.sort_by(|a, b| b.credits.cmp(&a.credits).then_with(|| a.name.cmp(&b.name))),
            SortBy::Semester => courses.sort_by(|a, b| {
                semester::compare_labels(&a.semester, &b.semester)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }),
        }

        courses
    }

    /// Distinct semester labels in chronological order
    pub fn get_semesters(&self) -> Vec<String> {
        semester::ordered_labels(self.courses.iter().map(|c| c.semester.as_str()))
    }

    pub fn get_stats(&self) -> CourseStats {
        CourseStats {
            total_courses: self.courses.len(),
            total_documents: self.courses.iter().map(|c| c.documents.len()).sum(),
            total_dates: self.courses.iter().map(|c| c.important_dates.len()).sum(),
            total_credits: self
                .courses
                .iter()
                .fold(0u32, |sum, c| sum.saturating_add(c.credits)),
            semesters: self.get_semesters().len(),
        }
    }
}
