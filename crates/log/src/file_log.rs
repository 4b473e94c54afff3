//! File-based session log: one JSON document per domain.
//!
//! The document is a JSON array of entry objects, oldest first, written
//! pretty-printed so it stays human-inspectable:
//!
//! ```json
//! [
//!   {
//!     "mood": "a bit anxious",
//!     "energyLevel": "low",
//!     "objectives": ["go for a walk"],
//!     "dateTime": "2026-10-19T08:15:00.000000Z"
//!   }
//! ]
//! ```
//!
//! Nothing is cached: every read goes to disk, and every append rewrites the
//! whole document. There is no locking, so only one process should write a
//! given file.
//!
//! Reads degrade an unusable document to "no history", but an append never
//! overwrites one: it is first moved aside to `<name>.corrupt-<timestamp>`.

use chrono::Utc;
use parley_core::entry::LogEntry;
use parley_core::error::LogError;
use parley_core::log::SessionLog;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A session log stored as a single JSON document.
pub struct JsonFileLog {
    path: PathBuf,
}

impl JsonFileLog {
    /// Create a log at the given path. Nothing is read or created until
    /// first use; the file appears on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document, reporting why it could not be used.
    ///
    /// A missing or blank file is an empty log, not an error. A single
    /// top-level object is read as a one-entry log; non-object array items
    /// are skipped.
    pub fn read_document(&self) -> Result<Vec<LogEntry>, LogError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LogError::Read {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: Value = serde_json::from_str(&content).map_err(|e| LogError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        match document {
            Value::Array(items) => Ok(items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match item {
                    Value::Object(map) => Some(LogEntry::from_map(map)),
                    _ => {
                        warn!(path = %self.path.display(), index, "Skipping non-object session log entry");
                        None
                    }
                })
                .collect()),
            Value::Object(map) => Ok(vec![LogEntry::from_map(map)]),
            other => Err(LogError::Read {
                path: self.path.clone(),
                reason: format!("expected an array of entries, found {}", json_kind(&other)),
            }),
        }
    }

    /// Write the full document through a sibling temp file and rename it
    /// into place, so readers never observe a half-written file.
    fn write_document(&self, entries: &[LogEntry]) -> Result<(), LogError> {
        let write_err = |reason: String| LogError::Write {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_err(format!("Failed to create log directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| write_err(format!("Failed to serialize session log: {e}")))?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, content.as_bytes())
            .map_err(|e| write_err(format!("Failed to write temp file: {e}")))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            write_err(format!("Failed to replace session log: {e}"))
        })
    }

    /// Move an unreadable document out of the way so the next write cannot
    /// destroy it. Returns where it went.
    fn quarantine(&self, cause: &LogError) -> Result<PathBuf, LogError> {
        let write_err = |reason: String| LogError::Write {
            path: self.path.clone(),
            reason,
        };
        if !self.path.is_file() {
            return Err(write_err(format!("Existing session log is unusable: {cause}")));
        }
        let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.6fZ"));
        let backup = self.sibling(&suffix);
        std::fs::rename(&self.path, &backup).map_err(|e| {
            write_err(format!("Failed to move unreadable session log aside: {e}"))
        })?;
        warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            error = %cause,
            "Unreadable session log moved aside before append"
        );
        Ok(backup)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

impl SessionLog for JsonFileLog {
    fn name(&self) -> &str {
        "json_file"
    }

    fn load(&self) -> Vec<LogEntry> {
        match self.read_document() {
            Ok(entries) => {
                debug!(path = %self.path.display(), count = entries.len(), "Session log loaded");
                entries
            }
            Err(e) => {
                warn!(error = %e, "Could not load session log, treating it as empty");
                Vec::new()
            }
        }
    }

    fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        let mut entries = match self.read_document() {
            Ok(entries) => entries,
            Err(e) => {
                self.quarantine(&e)?;
                Vec::new()
            }
        };
        entries.push(entry);
        self.write_document(&entries)?;
        info!(path = %self.path.display(), count = entries.len(), "Session appended to log");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
