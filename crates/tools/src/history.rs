//! History tool: recent entries from the session log, for context.

use async_trait::async_trait;
use chrono::Utc;
use parley_core::entry::LogEntry;
use parley_core::error::ToolError;
use parley_core::log::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, SessionLog};
use parley_core::record::SessionRecord;
use parley_core::tool::{Tool, ToolResult};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::reply::plural;

/// Renders the details of one past entry.
pub type DescribeEntry = fn(&LogEntry) -> String;

/// Looks back over the log. Reads only; the record is never touched.
pub struct HistoryTool {
    name: &'static str,
    description: &'static str,
    noun: &'static str,
    log: Arc<dyn SessionLog>,
    default_days: i64,
    /// Used when exactly one entry is in the window.
    describe_full: DescribeEntry,
    /// Used for the most recent of several entries.
    describe_brief: DescribeEntry,
}

impl HistoryTool {
    pub fn new(
        name: &'static str,
        description: &'static str,
        noun: &'static str,
        log: Arc<dyn SessionLog>,
        describe_full: DescribeEntry,
        describe_brief: DescribeEntry,
    ) -> Self {
        Self {
            name,
            description,
            noun,
            log,
            default_days: DEFAULT_WINDOW_DAYS,
            describe_full,
            describe_brief,
        }
    }

    pub fn with_default_days(mut self, days: i64) -> Self {
        self.default_days = days;
        self
    }

    fn days(&self, arguments: &serde_json::Value) -> Result<i64, ToolError> {
        match arguments.get("days") {
            None | Some(serde_json::Value::Null) => Ok(self.default_days),
            Some(value) => value
                .as_i64()
                .filter(|d| (1..=MAX_WINDOW_DAYS).contains(d))
                .ok_or_else(|| {
                    ToolError::InvalidArguments(format!(
                        "'days' must be a whole number from 1 to {MAX_WINDOW_DAYS}"
                    ))
                }),
        }
    }

    fn summarize(&self, recent: &[LogEntry], days: i64) -> String {
        let date = |entry: &LogEntry| {
            entry
                .timestamp()
                .map(|ts| ts.format("%B %d").to_string())
                .unwrap_or_default()
        };
        match recent {
            [] => format!("No previous {} found.", plural(self.noun, 0)),
            [only] => format!(
                "Your last {} was on {}. {}",
                self.noun,
                date(only),
                (self.describe_full)(only)
            ),
            [latest, ..] => format!(
                "Found {} {} in the last {days} days. Most recently on {}: {}",
                recent.len(),
                plural(self.noun, recent.len()),
                date(latest),
                (self.describe_brief)(latest)
            ),
        }
    }
}

#[async_trait]
impl Tool for HistoryTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "days": {
                    "type": "integer",
                    "description": format!("Number of days to look back (default: {})", self.default_days),
                    "default": self.default_days,
                    "minimum": 1,
                    "maximum": MAX_WINDOW_DAYS
                }
            }
        })
    }

    async fn execute(
        &self,
        _record: &mut SessionRecord,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let days = self.days(&arguments)?;
        let recent = self.log.recent_entries(days, Utc::now());
        debug!(tool = self.name, days, found = recent.len(), "History looked up");

        Ok(ToolResult::ack(self.summarize(&recent, days))
            .with_data(json!({ "days": days, "entries": recent })))
    }
}
