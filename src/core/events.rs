//! Dashboard queries over important dates

use crate::core::data::{Course, ImportantDate, ImportantDateType};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

/// An important date together with the course it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub date_type: ImportantDateType,
    pub description: Option<String>,
    pub course_id: String,
    pub course_name: String,
}

impl EventView {
    fn new(course: &Course, date: &ImportantDate) -> Self {
        Self {
            id: date.id.clone(),
            title: date.title.clone(),
            date: date.date,
            date_type: date.date_type,
            description: date.description.clone(),
            course_id: course.id.clone(),
            course_name: course.name.clone(),
        }
    }
}

/// Counters shown at the top of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_courses: usize,
    pub total_documents: usize,
    pub upcoming_events: usize,
}

impl DashboardStats {
    /// `upcoming_events` counts every important date on record.
    pub fn from_courses(courses: &[Course]) -> Self {
        Self {
            total_courses: courses.len(),
            total_documents: courses.iter().map(|c| c.documents.len()).sum(),
            upcoming_events: courses.iter().map(|c| c.important_dates.len()).sum(),
        }
    }
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Events within `[start, end]`, both inclusive, sorted by date
fn collect_between<F>(courses: &[Course], start: DateTime<Utc>, end: DateTime<Utc>, keep: F) -> Vec<EventView>
where
    F: Fn(&ImportantDate) -> bool,
{
    let mut events: Vec<EventView> = courses
        .iter()
        .flat_map(|course| {
            course
                .important_dates
                .iter()
                .filter(|d| d.date >= start && d.date <= end && keep(d))
                .map(move |d| EventView::new(course, d))
        })
        .collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
    events
}

/// All important dates falling on `day`
pub fn events_on(courses: &[Course], day: NaiveDate) -> Vec<EventView> {
    let start = start_of(day);
    let end = start + TimeDelta::days(1) - TimeDelta::milliseconds(1);
    collect_between(courses, start, end, |_| true)
}

/// The dashboard week around `today`.
///
/// Starts on the most recent Sunday at midnight and ends seven days later at
/// 23:59:59.999, so the following Sunday is included.
pub fn week_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let back = u64::from(today.weekday().num_days_from_sunday());
    let sunday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
    let start = start_of(sunday);
    let end = start + TimeDelta::days(8) - TimeDelta::milliseconds(1);
    (start, end)
}

/// Assignment, project and exam deadlines inside the week of `today`
pub fn deadlines_this_week(courses: &[Course], today: NaiveDate) -> Vec<EventView> {
    let (start, end) = week_window(today);
    collect_between(courses, start, end, |d| d.date_type.is_deadline())
}

/// Important dates from `now` on, soonest first
pub fn upcoming(courses: &[Course], now: DateTime<Utc>, limit: usize) -> Vec<EventView> {
    let mut events = collect_between(courses, now, DateTime::<Utc>::MAX_UTC, |_| true);
    events.truncate(limit);
    events
}
