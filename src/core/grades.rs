//! Credit-weighted grade average
//!
//! Grades follow the German convention: 1.0 is best, 5.0 is worst and
//! anything up to 4.0 passes. Grades are entered incrementally as free text,
//! so invalid entries are treated as "not graded" rather than as errors.

use crate::core::data::{Course, CourseStatus};
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BEST_GRADE: f64 = 1.0;
pub const WORST_GRADE: f64 = 5.0;
pub const PASSING_GRADE: f64 = 4.0;

/// Grade text for one course as stored in the preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub course_id: String,
    pub grade: String,
}

impl GradeEntry {
    pub fn new(course_id: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            grade: grade.into(),
        }
    }

    /// The numeric grade, if the entry holds a valid one
    pub fn value(&self) -> Option<f64> {
        parse_grade(&self.grade)
    }
}

/// Aggregate produced by [`calculate_average`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    pub average: f64,
    pub total_credits: u32,
    pub graded_credits: u32,
    pub graded_count: usize,
}

impl GradeSummary {
    pub fn open_credits(&self) -> u32 {
        self.total_credits.saturating_sub(self.graded_credits)
    }
}

/// Parse a grade, accepting only finite values in [1.0, 5.0].
pub fn parse_grade(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let grade: f64 = text.parse().ok()?;
    (grade.is_finite() && (BEST_GRADE..=WORST_GRADE).contains(&grade)).then_some(grade)
}

/// Round half away from zero to two decimal places
fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the credit-weighted average over all graded courses.
///
/// Courses without a valid grade entry only count towards `total_credits`.
/// The average is `0.0` when nothing is graded.
pub fn calculate_average(courses: &[Course], grades: &[GradeEntry]) -> GradeSummary {
    let mut weighted_sum = 0.0;
    let mut graded_credits = 0u32;
    let mut graded_count = 0usize;

    for course in courses {
        let grade = grades
            .iter()
            .find(|g| g.course_id == course.id)
            .and_then(GradeEntry::value);

        if let Some(grade) = grade {
            weighted_sum += grade * f64::from(course.credits);
            graded_credits = graded_credits.saturating_add(course.credits);
            graded_count += 1;
        }
    }

    let average = if graded_credits > 0 {
        round_2(weighted_sum / f64::from(graded_credits))
    } else {
        0.0
    };

    GradeSummary {
        average,
        total_credits: courses
            .iter()
            .fold(0u32, |sum, c| sum.saturating_add(c.credits)),
        graded_credits,
        graded_count,
    }
}

/// Status implied by a freshly entered grade.
///
/// Grades up to 4.0 pass, anything worse fails. Text that is not a number
/// resets the course to enrolled.
pub fn status_for_grade(text: &str) -> CourseStatus {
    match text.trim().parse::<f64>() {
        Ok(grade) if (BEST_GRADE..=PASSING_GRADE).contains(&grade) => CourseStatus::Passed,
        Ok(grade) if grade > PASSING_GRADE => CourseStatus::Failed,
        _ => CourseStatus::Enrolled,
    }
}

/// All grade entries, persisted under [`GradeBook::KEY`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeBook {
    entries: Vec<GradeEntry>,
}

impl GradeBook {
    pub const KEY: &'static str = "courseGrades";

    pub fn new(entries: Vec<GradeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    /// Read grades from a stored value.
    ///
    /// Accepts the list form `[{"courseId": .., "grade": ..}]` and the older
    /// map form `{"<courseId>": "<grade>"}`.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Array(_) => serde_json::from_value::<Vec<GradeEntry>>(value)
                .map(Self::new)
                .map_err(|e| AppError::Parse(format!("Failed to parse saved grades: {}", e))),
            Value::Object(map) => Ok(Self::new(
                map.into_iter()
                    .map(|(course_id, grade)| {
                        let grade = match grade {
                            Value::String(s) => s,
                            Value::Number(n) => n.to_string(),
                            _ => String::new(),
                        };
                        GradeEntry { course_id, grade }
                    })
                    .collect(),
            )),
            Value::Null => Ok(Self::default()),
            other => Err(AppError::Parse(format!(
                "Saved grades have unexpected shape: {}",
                other
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.entries).unwrap_or(Value::Array(Vec::new()))
    }

    pub fn get(&self, course_id: &str) -> Option<&GradeEntry> {
        self.entries.iter().find(|e| e.course_id == course_id)
    }

    /// Insert or replace the grade text for a course
    pub fn set(&mut self, course_id: &str, grade: &str) {
        match self.entries.iter_mut().find(|e| e.course_id == course_id) {
            Some(entry) => entry.grade = grade.to_string(),
            None => self.entries.push(GradeEntry::new(course_id, grade)),
        }
    }

    pub fn clear(&mut self, course_id: &str) {
        self.set(course_id, "");
    }

    /// Make the book match the given courses.
    ///
    /// Adds an empty entry for every course without one and drops entries of
    /// courses that no longer exist. Returns true when anything changed.
    pub fn sync_with_courses(&mut self, courses: &[Course]) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| courses.iter().any(|c| c.id == e.course_id));
        let mut changed = self.entries.len() != before;

        for course in courses {
            if self.get(&course.id).is_none() {
                self.entries.push(GradeEntry::new(course.id.clone(), ""));
                changed = true;
            }
        }
        changed
    }

    pub fn summary(&self, courses: &[Course]) -> GradeSummary {
        calculate_average(courses, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(id: &str, credits: u32, semester: &str) -> Course {
        let mut course = Course::new(format!("Course {id}"), credits, semester.to_string());
        course.id = id.to_string();
        course
    }

    #[test]
    fn test_no_graded_courses() {
        let courses = vec![course("1", 6, "WS24/25"), course("2", 6, "SS25")];
        let summary = calculate_average(&courses, &[]);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.graded_count, 0);
        assert_eq!(summary.graded_credits, 0);
        assert_eq!(summary.total_credits, 12);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(calculate_average(&[], &[]), GradeSummary::default());
    }

    #[test]
    fn test_weighted_average() {
        let courses = vec![course("A", 6, "WS24/25"), course("B", 6, "WS24/25")];
        let grades = vec![GradeEntry::new("A", "2.0"), GradeEntry::new("B", "4.0")];
        let summary = calculate_average(&courses, &grades);
        assert_eq!(summary.average, 3.0);
        assert_eq!(summary.graded_credits, 12);
        assert_eq!(summary.graded_count, 2);
    }

    #[test]
    fn test_single_graded_course() {
        let courses = vec![course("1", 6, "WS24/25")];
        let grades = vec![GradeEntry::new("1", "1.7")];
        let summary = calculate_average(&courses, &grades);
        assert_eq!(summary.average, 1.7);
        assert_eq!(summary.graded_credits, 6);
        assert_eq!(summary.total_credits, 6);
        assert_eq!(summary.graded_count, 1);
    }

    #[test]
    fn test_credit_weighting_and_rounding() {
        // (1.3 * 6 + 2.7 * 30) / 36 = 2.4666..
        let courses = vec![course("A", 6, "SS25"), course("MT", 30, "SS26")];
        let grades = vec![GradeEntry::new("A", "1.3"), GradeEntry::new("MT", "2.7")];
        assert_eq!(calculate_average(&courses, &grades).average, 2.47);
    }

    #[test]
    fn test_out_of_range_grades_ignored() {
        let courses = vec![
            course("A", 6, "SS25"),
            course("B", 6, "SS25"),
            course("C", 6, "SS25"),
        ];
        let grades = vec![
            GradeEntry::new("A", "5.5"),
            GradeEntry::new("B", "0.5"),
            GradeEntry::new("C", "2.3"),
        ];
        let summary = calculate_average(&courses, &grades);
        assert_eq!(summary.average, 2.3);
        assert_eq!(summary.graded_credits, 6);
        assert_eq!(summary.graded_count, 1);
        assert_eq!(summary.total_credits, 18);
        assert_eq!(summary.open_credits(), 12);
    }

    #[test]
    fn test_huge_credit_totals_do_not_overflow() {
        let courses = vec![course("A", u32::MAX, "SS25"), course("B", 1, "SS25")];
        let grades = vec![GradeEntry::new("A", "1.0"), GradeEntry::new("B", "1.0")];
        let summary = calculate_average(&courses, &grades);
        assert_eq!(summary.average, 1.0);
        assert_eq!(summary.graded_credits, u32::MAX);
        assert_eq!(summary.total_credits, u32::MAX);
        assert_eq!(summary.graded_count, 2);
    }

    #[test]
    fn test_invalid_text_ignored() {
        let courses = vec![course("A", 6, "SS25"), course("B", 6, "SS25")];
        let grades = vec![GradeEntry::new("A", "  "), GradeEntry::new("B", "gut")];
        assert_eq!(calculate_average(&courses, &grades).graded_count, 0);
    }

    #[test]
    fn test_grades_for_unknown_courses_ignored() {
        let courses = vec![course("A", 6, "SS25")];
        let grades = vec![GradeEntry::new("Z", "1.0")];
        assert_eq!(calculate_average(&courses, &grades).graded_count, 0);
    }

    #[test]
    fn test_calculate_average_is_pure() {
        let courses = vec![course("A", 5, "SS25"), course("B", 7, "SS25")];
        let grades = vec![GradeEntry::new("A", "1.0"), GradeEntry::new("B", "3.3")];
        assert_eq!(
            calculate_average(&courses, &grades),
            calculate_average(&courses, &grades)
        );
    }

    #[test]
    fn test_parse_grade_bounds() {
        assert_eq!(parse_grade("1.0"), Some(1.0));
        assert_eq!(parse_grade(" 5 "), Some(5.0));
        assert_eq!(parse_grade("5.01"), None);
        assert_eq!(parse_grade("0.99"), None);
        assert_eq!(parse_grade("NaN"), None);
        assert_eq!(parse_grade("inf"), None);
        assert_eq!(parse_grade(""), None);
    }

    #[test]
    fn test_status_for_grade() {
        assert_eq!(status_for_grade("1.0"), CourseStatus::Passed);
        assert_eq!(status_for_grade("4.0"), CourseStatus::Passed);
        assert_eq!(status_for_grade("4.3"), CourseStatus::Failed);
        assert_eq!(status_for_grade("5.0"), CourseStatus::Failed);
        assert_eq!(status_for_grade(""), CourseStatus::Enrolled);
        assert_eq!(status_for_grade("abc"), CourseStatus::Enrolled);
    }

    #[test]
    fn test_gradebook_from_list_value() {
        let value = json!([{"courseId": "A", "grade": "1.7"}, {"courseId": "B", "grade": ""}]);
        let book = GradeBook::from_value(value).unwrap();
        assert_eq!(book.entries().len(), 2);
        assert_eq!(book.get("A").and_then(GradeEntry::value), Some(1.7));
    }

    #[test]
    fn test_gradebook_from_legacy_map_value() {
        let value = json!({"A": "2.3", "B": 1.0});
        let book = GradeBook::from_value(value).unwrap();
        assert_eq!(book.get("A").map(|e| e.grade.as_str()), Some("2.3"));
        assert_eq!(book.get("B").and_then(GradeEntry::value), Some(1.0));
    }

    #[test]
    fn test_gradebook_rejects_scalar_value() {
        assert!(matches!(
            GradeBook::from_value(json!("1.3")),
            Err(AppError::Parse(_))
        ));
        assert_eq!(GradeBook::from_value(Value::Null).unwrap(), GradeBook::default());
    }

    #[test]
    fn test_gradebook_set_clear_and_sync() {
        let courses = vec![course("A", 6, "SS25"), course("B", 6, "SS25")];
        let mut book = GradeBook::new(vec![GradeEntry::new("gone", "1.0")]);

        assert!(book.sync_with_courses(&courses));
        assert!(book.get("gone").is_none());
        assert_eq!(book.entries().len(), 2);
        assert!(!book.sync_with_courses(&courses));

        book.set("A", "1.3");
        assert_eq!(book.summary(&courses).average, 1.3);
        book.clear("A");
        assert_eq!(book.summary(&courses).graded_count, 0);
    }

    #[test]
    fn test_gradebook_value_roundtrip_keeps_camel_case() {
        let book = GradeBook::new(vec![GradeEntry::new("A", "2.0")]);
        assert_eq!(book.to_value(), json!([{"courseId": "A", "grade": "2.0"}]));
    }
}
