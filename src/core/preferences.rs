//! Key-value preferences store
//!
//! Holds user settings and incrementally edited state (grades, view modes,
//! filters, personal deadlines) as JSON values keyed by string. Listeners
//! can subscribe to be told about every successful write.

use crate::utils::error::{AppError, AppResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const VIEW_MODE_KEY: &str = "coursesViewMode";
pub const SEMESTER_FILTER_KEY: &str = "coursesSemesterFilter";
pub const DASHBOARD_VIEW_KEY: &str = "dashboardViewMode";

/// Handle returned by [`PreferencesStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(&str, &Value)>;

pub trait PreferencesStore {
    fn get_value(&self, key: &str) -> Option<Value>;

    fn set_value(&mut self, key: &str, value: Value) -> AppResult<()>;

    fn remove(&mut self, key: &str) -> AppResult<()>;

    /// Register a listener called with `(key, new_value)` after each write.
    /// Removals report `Value::Null`.
    fn subscribe(&mut self, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Typed read. A stored value of the wrong shape reads as `None`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed preference");
                None
            }
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> AppResult<()>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Parse(format!("Failed to serialize preference '{}': {}", key, e)))?;
        self.set_value(key, value)
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    fn notify(&self, key: &str, value: &Value) {
        for (_, listener) in &self.entries {
            listener(key, value);
        }
    }
}

/// In-memory store, nothing is persisted
#[derive(Default)]
pub struct MemoryPreferences {
    values: Map<String, Value>,
    listeners: Listeners,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> AppResult<()> {
        self.values.insert(key.to_string(), value.clone());
        self.listeners.notify(key, &value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        if self.values.remove(key).is_some() {
            self.listeners.notify(key, &Value::Null);
        }
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

/// Store backed by a JSON object on disk, rewritten on every change
pub struct FilePreferences {
    path: PathBuf,
    values: Map<String, Value>,
    listeners: Listeners,
}

impl FilePreferences {
    /// Open the store, creating an empty one if the file does not exist
    pub fn open(path: &Path) -> AppResult<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::Io(format!("Failed to read preferences {}: {}", path.display(), e)))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str::<Map<String, Value>>(&content).map_err(|e| {
                    AppError::Parse(format!("Failed to parse preferences {}: {}", path.display(), e))
                })?
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = values.len(), "opened preferences");
        Ok(Self {
            path: path.to_path_buf(),
            values,
            listeners: Listeners::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn persist(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| AppError::Parse(format!("Failed to serialize preferences: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| AppError::Io(format!("Failed to write preferences {}: {}", self.path.display(), e)))
    }
}

impl PreferencesStore for FilePreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> AppResult<()> {
        let previous = self.values.insert(key.to_string(), value.clone());
        if let Err(e) = self.persist() {
            // Keep memory consistent with disk
            match previous {
                Some(prev) => self.values.insert(key.to_string(), prev),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        debug!(key, "preference saved");
        self.listeners.notify(key, &value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
            self.listeners.notify(key, &Value::Null);
        }
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_memory_get_set() {
        let mut prefs = MemoryPreferences::new();
        assert!(prefs.get_value(VIEW_MODE_KEY).is_none());

        prefs.set(VIEW_MODE_KEY, &"list").unwrap();
        assert_eq!(prefs.get::<String>(VIEW_MODE_KEY).as_deref(), Some("list"));

        prefs.remove(VIEW_MODE_KEY).unwrap();
        assert!(prefs.get::<String>(VIEW_MODE_KEY).is_none());
    }

    #[test]
    fn test_typed_get_wrong_shape_is_none() {
        let mut prefs = MemoryPreferences::new();
        prefs.set_value("count", json!({"not": "a number"})).unwrap();
        assert!(prefs.get::<u32>("count").is_none());
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let seen: Rc<RefCell<Vec<(String, Value)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut prefs = MemoryPreferences::new();

        let sink = Rc::clone(&seen);
        let id = prefs.subscribe(Box::new(move |key, value| {
            sink.borrow_mut().push((key.to_string(), value.clone()));
        }));

        prefs.set(SEMESTER_FILTER_KEY, &"SS25").unwrap();
        prefs.remove(SEMESTER_FILTER_KEY).unwrap();
        assert!(prefs.unsubscribe(id));
        assert!(!prefs.unsubscribe(id));
        prefs.set(SEMESTER_FILTER_KEY, &"WS24/25").unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (SEMESTER_FILTER_KEY.to_string(), json!("SS25")));
        assert_eq!(seen[1].1, Value::Null);
    }

    #[test]
    fn test_file_preferences_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut prefs = FilePreferences::open(&path).unwrap();
        prefs.set(DASHBOARD_VIEW_KEY, &"columns").unwrap();
        assert!(path.exists());

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get::<String>(DASHBOARD_VIEW_KEY).as_deref(), Some("columns"));
        assert_eq!(reopened.keys(), vec![DASHBOARD_VIEW_KEY.to_string()]);
    }

    #[test]
    fn test_file_preferences_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "  \n").unwrap();
        let prefs = FilePreferences::open(&path).unwrap();
        assert!(prefs.keys().is_empty());
    }

    #[test]
    fn test_file_preferences_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(FilePreferences::open(&path), Err(AppError::Parse(_))));
    }
}
