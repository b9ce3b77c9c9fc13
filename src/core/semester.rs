//! Semester labels and their chronological ordering
//!
//! Labels come in two shapes: `WS24/25` for a winter semester spanning two
//! calendar years and `SS25` for a summer semester. Ordering is derived from
//! a numeric sort key so that `WS24/25 → SS25 → WS25/26 → SS26` holds.

use crate::core::data::Course;
use crate::utils::error::{AppError, AppResult};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:WS(\d{2})/(\d{2})|SS(\d{2}))$").expect("semester label pattern is valid")
});

/// Compute the sort key for a raw semester label.
///
/// The key is `year * 10 + offset` where `year` is the two digits after the
/// prefix and `offset` is 0 for `SS` and 5 for any other prefix. Returns
/// `None` when the label is too short or the year is not numeric.
pub fn sort_key(label: &str) -> Option<u32> {
    let prefix = label.get(0..2)?;
    let year: u32 = label.get(2..4)?.parse().ok()?;
    let offset = if prefix == "SS" { 0 } else { 5 };
    Some(year * 10 + offset)
}

/// Chronological comparison of two raw labels.
///
/// Labels without a key sort after every keyed label, lexically among
/// themselves. Equal keys fall back to the label text so the order is total.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// A validated semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semester {
    Winter { start_year: u8 },
    Summer { year: u8 },
}

impl Semester {
    /// Parse a label strictly. Used when courses are created or moved.
    pub fn parse(label: &str) -> AppResult<Self> {
        let label = label.trim();
        let invalid = || {
            AppError::Validation(format!(
                "Invalid semester '{}', expected WS<YY>/<YY+1> or SS<YY>",
                label
            ))
        };

        let caps = LABEL_RE.captures(label).ok_or_else(invalid)?;
        let two_digits = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u8>().ok());

        if let Some(year) = two_digits(3) {
            return Ok(Semester::Summer { year });
        }

        let start_year = two_digits(1).ok_or_else(invalid)?;
        let end_year = two_digits(2).ok_or_else(invalid)?;
        if end_year != (start_year + 1) % 100 {
            return Err(AppError::Validation(format!(
                "Invalid semester '{}': winter semester must span consecutive years",
                label
            )));
        }
        Ok(Semester::Winter { start_year })
    }

    pub fn sort_key(&self) -> u32 {
        match *self {
            Semester::Winter { start_year } => u32::from(start_year) * 10 + 5,
            Semester::Summer { year } => u32::from(year) * 10,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Semester::Winter { start_year } => {
                format!("WS{:02}/{:02}", start_year, (start_year + 1) % 100)
            }
            Semester::Summer { year } => format!("SS{:02}", year),
        }
    }

    /// The semester that follows this one
    pub fn next(&self) -> Self {
        match *self {
            Semester::Winter { start_year } => Semester::Summer {
                year: (start_year + 1) % 100,
            },
            Semester::Summer { year } => Semester::Winter { start_year: year },
        }
    }

    pub fn is_winter(&self) -> bool {
        matches!(self, Semester::Winter { .. })
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Semester {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Semester::parse(s)
    }
}

impl PartialOrd for Semester {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Semester {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Courses of one semester
#[derive(Debug, Clone)]
pub struct SemesterGroup {
    pub label: String,
    pub courses: Vec<Course>,
}

impl SemesterGroup {
    pub fn total_credits(&self) -> u32 {
        self.courses
            .iter()
            .fold(0u32, |sum, c| sum.saturating_add(c.credits))
    }
}

/// Group courses by semester label in chronological order.
///
/// Within a group courses are sorted by name, ignoring case.
pub fn group_by_semester(courses: &[Course]) -> Vec<SemesterGroup> {
    let mut grouped: BTreeMap<&str, Vec<Course>> = BTreeMap::new();
    for course in courses {
        grouped
            .entry(course.semester.as_str())
            .or_default()
            .push(course.clone());
    }

    let mut groups: Vec<SemesterGroup> = grouped
        .into_iter()
        .map(|(label, mut courses)| {
            courses.sort_by_key(|c| c.name.to_lowercase());
            SemesterGroup {
                label: label.to_string(),
                courses,
            }
        })
        .collect();

    groups.sort_by(|a, b| compare_labels(&a.label, &b.label));
    groups
}

/// Distinct labels in chronological order
pub fn ordered_labels<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut labels: Vec<String> = labels.into_iter().map(str::to_string).collect();
    labels.sort_by(|a, b| compare_labels(a, b));
    labels.dedup();
    labels
}
