//! Demo data for a fresh install

use crate::core::data::{Course, Document, DocumentType, ImportantDate, ImportantDateType};
use chrono::{DateTime, TimeDelta, Utc};

const DEMO_COURSES: &[(&str, &str, u32, &str)] = &[
    ("Datenbanken und Webtechnologien 1", "DW1", 6, "WS24/25"),
    ("Human-Computer Systems", "HCS", 6, "WS24/25"),
    ("Multimedia und Mensch-Maschine-Interaktion 2", "MMI2", 6, "WS24/25"),
    ("Webanwendungen und -architekturen", "WAL", 6, "WS24/25"),
    ("Informationsvisualisierung", "InfoViz", 6, "WS24/25"),
    ("Formale Spezifikation und Entwurf 1", "FSE1", 6, "SS25"),
    ("Virtuelle Realität und User Experience", "VR/UE", 6, "SS25"),
    ("Softwaretechnik", "ST", 6, "SS25"),
    ("Datenbanken und Webtechnologien 2", "DW2", 6, "SS25"),
    ("Formale Spezifikation und Entwurf 2", "FSE2", 6, "WS25/26"),
    ("Eingebettete KI-Systeme", "EKI", 6, "WS25/26"),
    ("Experience Design", "EXD", 6, "WS25/26"),
    ("Objektorientierte Modellierung und Methoden", "OMM", 6, "WS25/26"),
    ("Master Thesis", "MT", 30, "SS26"),
];

/// Build the demo course set.
///
/// Every course gets lecture notes and an assignment due within the next
/// 30 days of `now`, spread by position so the result is reproducible.
pub fn demo_courses(now: DateTime<Utc>) -> Vec<Course> {
    DEMO_COURSES
        .iter()
        .enumerate()
        .map(|(i, (name, abbr, credits, semester))| {
            let mut course = Course::new(name.to_string(), *credits, semester.to_string());
            course.abbreviation = Some(abbr.to_string());
            for field in [&mut course.instructor, &mut course.day, &mut course.time, &mut course.room] {
                *field = "n.a.".to_string();
            }

            course.documents.push(Document::new(
                format!("{} - Lecture Notes", abbr),
                DocumentType::Lecture,
                "#".to_string(),
            ));

            let offset = TimeDelta::hours(((i as i64 * 2 + 1) * 24) % (30 * 24));
            let mut due = ImportantDate::new(
                format!("{} - Assignment Due", abbr),
                now + offset,
                ImportantDateType::AssignmentDue,
            );
            due.description = Some("Sample assignment deadline".to_string());
            course.important_dates.push(due);
            course
        })
        .collect()
}
