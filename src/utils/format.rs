use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

use crate::utils::error::{AppError, AppResult};

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Deserialize empty string (or null) as None
pub fn deserialize_option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|value| !value.trim().is_empty()))
}

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    // First, try parsing our custom format.
    if let Ok(naive_dt) = NaiveDateTime::parse_from_str(&s, FORMAT) {
        Ok(naive_dt.and_utc())
    } else {
        // Fall back to RFC 3339, which is what exported web data uses.
        s.parse::<DateTime<Utc>>().map_err(Error::custom)
    }
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Short form used in event listings, e.g. "Jan 15 14:00"
pub fn format_event_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d %H:%M").to_string()
}

/// Parse a date given on the command line.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DDTHH:MM`. A bare
/// date is taken as midnight UTC.
pub fn parse_date_input(input: &str) -> AppResult<DateTime<Utc>> {
    let input = input.trim();
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", FORMAT] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD [HH:MM]", input)))
}

pub fn truncate_string(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn format_credits(credits: u32) -> String {
    format!("{} ECTS", credits)
}

/// Render a grade average, "–" when nothing has been graded yet
pub fn format_average(average: f64, graded_count: usize) -> String {
    if graded_count == 0 {
        "–".to_string()
    } else {
        format!("{:.2}", average)
    }
}
