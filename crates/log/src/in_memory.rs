//! In-memory session log: useful for testing and ephemeral sessions.

use parley_core::entry::LogEntry;
use parley_core::error::LogError;
use parley_core::log::SessionLog;
use std::sync::{Arc, RwLock};

/// A session log that keeps entries in a Vec.
/// Clones share the same entries.
#[derive(Clone)]
pub struct InMemoryLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Start with existing history, oldest first.
    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Number of entries, counted under the read lock without copying.
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLog for InMemoryLog {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn load(&self) -> Vec<LogEntry> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        match self.entries.write() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(mood: &str, date_time: &str) -> LogEntry {
        serde_json::from_value(json!({"mood": mood, "dateTime": date_time})).unwrap()
    }

    #[test]
    fn append_and_load_in_order() {
        let log = InMemoryLog::new();
        assert!(log.is_empty());
        log.append(entry("calm", "2026-10-01T08:00:00Z")).unwrap();
        log.append(entry("tired", "2026-10-02T08:00:00Z")).unwrap();
        let moods: Vec<_> = log.load().iter().filter_map(|e| e.text("mood").map(String::from)).collect();
        assert_eq!(moods, vec!["calm", "tired"]);
    }

    #[test]
    fn clones_share_history() {
        let log = InMemoryLog::new();
        let other = log.clone();
        other.append(entry("good", "2026-10-02T08:00:00Z")).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn len_survives_a_poisoned_lock() {
        let log = InMemoryLog::with_entries(vec![entry("calm", "2026-10-01T08:00:00Z")]);
        let shared = log.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.entries.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(log.entries.is_poisoned());
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn last_entry_uses_timestamps() {
        let log = InMemoryLog::with_entries(vec![
            entry("later", "2026-10-05T08:00:00Z"),
            entry("earlier", "2026-10-01T08:00:00Z"),
        ]);
        assert_eq!(log.last_entry().unwrap().text("mood"), Some("later"));
    }
}
