//! No-op session log: keeps no history at all.

use parley_core::entry::LogEntry;
use parley_core::error::LogError;
use parley_core::log::SessionLog;

/// A session log that stores nothing. Every conversation looks like the first.
pub struct NoopLog;

impl SessionLog for NoopLog {
    fn name(&self) -> &str { "none" }

    fn load(&self) -> Vec<LogEntry> {
        Vec::new()
    }

    fn append(&self, _entry: LogEntry) -> Result<(), LogError> {
        Ok(())
    }
}
