//! Personal deadline list shown on the dashboard
//!
//! Unlike important dates these are not tied to a course. The list is kept
//! in user order and stored in the preferences under [`DeadlineList::KEY`].

use crate::core::preferences::PreferencesStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::format;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineKind {
    #[default]
    Private,
    Administrative,
    Uni,
}

impl fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeadlineKind::Private => "Private",
            DeadlineKind::Administrative => "Admin",
            DeadlineKind::Uni => "Uni",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DeadlineKind,
    pub completed: bool,
    #[serde(with = "format")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,
}

impl Deadline {
    pub fn new(title: &str, kind: DeadlineKind) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Deadline title cannot be empty".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            kind,
            completed: false,
            created_at: Utc::now(),
            due_date: None,
            due_time: None,
        })
    }

    pub fn due(mut self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        self.due_date = date;
        self.due_time = time;
        self
    }

    /// True when the due date lies before `today` and the item is still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|d| d < today)
    }
}

/// Ordered list of personal deadlines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeadlineList {
    items: Vec<Deadline>,
}

impl DeadlineList {
    pub const KEY: &'static str = "deadlines";

    pub fn load(prefs: &impl PreferencesStore) -> Self {
        Self {
            items: prefs.get::<Vec<Deadline>>(Self::KEY).unwrap_or_default(),
        }
    }

    pub fn save(&self, prefs: &mut impl PreferencesStore) -> AppResult<()> {
        prefs.set(Self::KEY, &self.items)
    }

    pub fn items(&self) -> &[Deadline] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, deadline: Deadline) {
        self.items.push(deadline);
    }

    /// Resolve a 1-based position or an ID to an index
    pub fn resolve(&self, identifier: &str) -> AppResult<usize> {
        if let Ok(position) = identifier.trim().parse::<usize>() {
            if (1..=self.items.len()).contains(&position) {
                return Ok(position - 1);
            }
        }
        self.items
            .iter()
            .position(|d| d.id == identifier)
            .ok_or_else(|| AppError::NotFound(format!("Deadline '{}'", identifier)))
    }

    /// Flip the completed flag, returning the new state
    pub fn toggle(&mut self, index: usize) -> AppResult<bool> {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("Deadline #{}", index + 1)))?;
        item.completed = !item.completed;
        Ok(item.completed)
    }

    pub fn remove(&mut self, index: usize) -> AppResult<Deadline> {
        if index >= self.items.len() {
            return Err(AppError::NotFound(format!("Deadline #{}", index + 1)));
        }
        Ok(self.items.remove(index))
    }

    /// Move the item at `from` so it ends up at `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> AppResult<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(AppError::Validation(format!(
                "Positions must be between 1 and {}",
                len
            )));
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        Ok(())
    }

    /// Drop completed items, returning how many were removed
    pub fn purge_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|d| !d.completed);
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::MemoryPreferences;

    fn list(titles: &[&str]) -> DeadlineList {
        let mut list = DeadlineList::default();
        for title in titles {
            list.add(Deadline::new(title, DeadlineKind::Private).unwrap());
        }
        list
    }

    fn titles(list: &DeadlineList) -> Vec<&str> {
        list.items().iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_new_trims_and_rejects_empty() {
        assert_eq!(Deadline::new("  Re-register  ", DeadlineKind::Administrative).unwrap().title, "Re-register");
        assert!(matches!(
            Deadline::new("   ", DeadlineKind::Uni),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_move_item() {
        let mut deadlines = list(&["a", "b", "c"]);
        deadlines.move_item(0, 2).unwrap();
        assert_eq!(titles(&deadlines), vec!["b", "c", "a"]);
        deadlines.move_item(2, 0).unwrap();
        assert_eq!(titles(&deadlines), vec!["a", "b", "c"]);
        assert!(deadlines.move_item(0, 3).is_err());
    }

    #[test]
    fn test_toggle_and_purge() {
        let mut deadlines = list(&["a", "b"]);
        assert!(deadlines.toggle(0).unwrap());
        assert_eq!(deadlines.purge_completed(), 1);
        assert_eq!(titles(&deadlines), vec!["b"]);
        assert!(deadlines.toggle(5).is_err());
    }

    #[test]
    fn test_resolve_by_position_or_id() {
        let deadlines = list(&["a", "b"]);
        assert_eq!(deadlines.resolve("2").unwrap(), 1);
        let id = deadlines.items()[0].id.clone();
        assert_eq!(deadlines.resolve(&id).unwrap(), 0);
        assert!(deadlines.resolve("3").is_err());
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let item = Deadline::new("Pay fee", DeadlineKind::Administrative)
            .unwrap()
            .due(NaiveDate::from_ymd_opt(2025, 1, 14), None);
        assert!(item.is_overdue(today));
        assert!(!Deadline::new("x", DeadlineKind::Private).unwrap().is_overdue(today));
    }

    #[test]
    fn test_save_and_load_through_preferences() {
        let mut prefs = MemoryPreferences::new();
        let deadlines = list(&["a", "b"]);
        deadlines.save(&mut prefs).unwrap();

        let loaded = DeadlineList::load(&prefs);
        assert_eq!(titles(&loaded), vec!["a", "b"]);
        assert_eq!(loaded.items()[1].id, deadlines.items()[1].id);

        let raw = prefs.get_value(DeadlineList::KEY).unwrap();
        assert_eq!(raw[0]["type"], "private");
        assert_eq!(raw[0]["completed"], false);
    }
}
