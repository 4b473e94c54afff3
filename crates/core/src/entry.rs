//! Log entries: immutable snapshots of completed session records.
//!
//! An entry is kept as the raw JSON object it was written as. History is
//! read back from disk and may have been written by older builds, so the
//! accessors here are lenient: keys are matched loosely and timestamps in
//! several ISO-8601 shapes are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::DATE_TIME_KEY;

/// One completed record as persisted in the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Map<String, Value>);

impl LogEntry {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Look up a key exactly, then by a case- and separator-insensitive
    /// match, so `energyLevel` also finds a legacy `energy_level`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }
        let wanted = loose_key(key);
        self.0
            .iter()
            .find(|(k, _)| loose_key(k) == wanted)
            .map(|(_, v)| v)
    }

    /// A non-blank string value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// A scalar rendered as text: non-blank strings, numbers and booleans.
    pub fn scalar(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// String items of a list value; non-string items are skipped.
    pub fn items(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// The raw `dateTime` string, if present.
    pub fn date_time(&self) -> Option<&str> {
        self.get(DATE_TIME_KEY).and_then(Value::as_str)
    }

    /// The parsed `dateTime`; `None` when absent or unparsable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date_time().and_then(parse_timestamp)
    }
}

/// Parse an ISO-8601 timestamp. Offsets are honoured; naive timestamps are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn loose_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
