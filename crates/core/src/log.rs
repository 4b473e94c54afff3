//! Session log trait: the append-only history of completed records.
//!
//! The read path never fails: a missing document is "no history yet" and a
//! malformed one degrades to empty, so a broken log cannot stop a new
//! conversation from starting. Only `append` reports errors.

use chrono::{DateTime, Duration, Utc};

use crate::entry::LogEntry;
use crate::error::LogError;

/// Default look-back window for history queries, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Largest look-back accepted from callers and config (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// The core SessionLog trait.
///
/// Implementations: JSON document file, in-memory (for testing), none (no-op).
/// Readers re-read the backing store on every call; nothing is cached.
pub trait SessionLog: Send + Sync {
    /// The backend name (e.g., "json_file", "in_memory", "none").
    fn name(&self) -> &str;

    /// All entries in storage order (oldest first). Never fails.
    fn load(&self) -> Vec<LogEntry>;

    /// Append one entry. If the write fails nothing is recorded and the
    /// caller may retry.
    fn append(&self, entry: LogEntry) -> Result<(), LogError>;

    /// Entries timestamped within `window_days` of `now`, most recent first.
    /// Entries without a parsable timestamp are skipped.
    fn recent_entries(&self, window_days: i64, now: DateTime<Utc>) -> Vec<LogEntry> {
        recent_entries(self.load(), window_days, now)
    }

    /// The most recent entry by timestamp.
    fn last_entry(&self) -> Option<LogEntry> {
        last_entry(self.load())
    }
}

/// Window filter over already-loaded entries. Ties keep storage order.
///
/// A window reaching past the representable calendar has no lower bound:
/// every dated entry is kept.
pub fn recent_entries(entries: Vec<LogEntry>, window_days: i64, now: DateTime<Utc>) -> Vec<LogEntry> {
    let cutoff = Duration::try_days(window_days).and_then(|span| now.checked_sub_signed(span));
    let mut recent: Vec<(DateTime<Utc>, LogEntry)> = entries
        .into_iter()
        .filter_map(|entry| entry.timestamp().map(|ts| (ts, entry)))
        .filter(|(ts, _)| cutoff.is_none_or(|cutoff| *ts >= cutoff))
        .collect();
    recent.sort_by(|a, b| b.0.cmp(&a.0));
    recent.into_iter().map(|(_, entry)| entry).collect()
}

/// Most recent entry by timestamp; when any timestamp cannot be parsed the
/// ordering is unknowable and the last entry in storage order is returned.
pub fn last_entry(entries: Vec<LogEntry>) -> Option<LogEntry> {
    let stamped: Option<Vec<DateTime<Utc>>> = entries.iter().map(LogEntry::timestamp).collect();
    match stamped {
        Some(stamps) => {
            // Stable descending order: among equal timestamps the earliest stored wins.
            let mut order: Vec<usize> = (0..entries.len()).collect();
            order.sort_by(|&a, &b| stamps[b].cmp(&stamps[a]));
            let first = *order.first()?;
            entries.into_iter().nth(first)
        }
        None => {
            tracing::debug!("Unparsable timestamp in session log, using storage order");
            entries.into_iter().last()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(day: u32, label: &str) -> LogEntry {
        let ts = Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap();
        serde_json::from_value(json!({"label": label, "dateTime": ts.to_rfc3339()})).unwrap()
    }

    fn raw(date_time: &str, label: &str) -> LogEntry {
        serde_json::from_value(json!({"label": label, "dateTime": date_time})).unwrap()
    }

    fn labels(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.text("label")).collect()
    }

    #[test]
    fn window_excludes_eight_days_and_includes_six() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let entries = vec![at(12, "eight days"), at(14, "six days")];
        let recent = recent_entries(entries, 7, now);
        assert_eq!(labels(&recent), vec!["six days"]);
    }

    #[test]
    fn window_sorts_most_recent_first_and_skips_bad_dates() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let entries = vec![at(15, "a"), raw("not a date", "bad"), at(19, "b"), at(17, "c")];
        let recent = recent_entries(entries, 7, now);
        assert_eq!(labels(&recent), vec!["b", "c", "a"]);
    }

    #[test]
    fn oversized_window_keeps_every_dated_entry() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let entries = vec![at(2, "old"), raw("not a date", "bad"), at(19, "new")];
        for days in [100_000_000, 200_000_000_000, i64::MAX] {
            let recent = recent_entries(entries.clone(), days, now);
            assert_eq!(labels(&recent), vec!["new", "old"], "{days}");
        }
    }

    #[test]
    fn last_entry_picks_latest_timestamp() {
        let entries = vec![at(1, "day 1"), at(5, "day 5"), at(3, "day 3")];
        assert_eq!(last_entry(entries).unwrap().text("label"), Some("day 5"));
    }

    #[test]
    fn last_entry_ties_keep_storage_order() {
        let entries = vec![at(4, "first"), at(4, "second"), at(2, "old")];
        assert_eq!(last_entry(entries).unwrap().text("label"), Some("first"));
    }

    #[test]
    fn last_entry_falls_back_to_storage_order() {
        assert_eq!(
            last_entry(vec![raw("garbage", "only")]).unwrap().text("label"),
            Some("only")
        );
        let mixed = vec![at(9, "newest"), raw("", "stored last")];
        assert_eq!(last_entry(mixed).unwrap().text("label"), Some("stored last"));
    }

    #[test]
    fn empty_log_has_no_last_entry() {
        assert!(last_entry(Vec::new()).is_none());
        assert!(recent_entries(Vec::new(), 7, Utc::now()).is_empty());
    }
}
