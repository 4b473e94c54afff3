//! Finalize tool: the only path from an in-progress record to the log.
//!
//! The record is checked for completeness (and a generated summary, where
//! the domain has one), snapshotted, and appended. A failed append leaves
//! the record untouched so the call can simply be retried.

use async_trait::async_trait;
use parley_core::completion;
use parley_core::error::{IncompleteState, ToolError};
use parley_core::log::SessionLog;
use parley_core::record::SessionRecord;
use parley_core::schema::SlotSchema;
use parley_core::tool::{Tool, ToolResult};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::reply::ensure_domain;
use crate::status::Describe;

pub struct FinalizeTool {
    name: &'static str,
    description: &'static str,
    schema: &'static SlotSchema,
    log: Arc<dyn SessionLog>,
    /// What the call does, for refusals ("save check-in").
    action: &'static str,
    /// Appended to a missing-fields refusal.
    incomplete_hint: &'static str,
    /// Names the tool that generates the summary, for refusals.
    summary_tool: &'static str,
    confirm: Describe,
}

impl FinalizeTool {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        log: Arc<dyn SessionLog>,
        confirm: Describe,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            log,
            action: name,
            incomplete_hint: "Please gather all required information first.",
            summary_tool: "generate_summary",
            confirm,
        }
    }

    pub fn with_action(mut self, action: &'static str) -> Self {
        self.action = action;
        self
    }

    pub fn with_incomplete_hint(mut self, hint: &'static str) -> Self {
        self.incomplete_hint = hint;
        self
    }

    pub fn with_summary_tool(mut self, tool_name: &'static str) -> Self {
        self.summary_tool = tool_name;
        self
    }

    fn refusal(&self, state: IncompleteState) -> ToolError {
        let reason = match &state {
            IncompleteState::MissingFields(_) => {
                format!("Cannot {}. {state}. {}", self.action, self.incomplete_hint)
            }
            IncompleteState::SummaryNotGenerated => format!(
                "Cannot {}. {state}. Please generate a summary first using {}.",
                self.action, self.summary_tool
            ),
        };
        warn!(tool = self.name, %state, "Finalize refused");
        ToolError::Incomplete {
            tool_name: self.name.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl Tool for FinalizeTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(
        &self,
        record: &mut SessionRecord,
        _arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        ensure_domain(self.name, self.schema, record)?;

        if record.is_logged() {
            debug!(tool = self.name, "Record already in the log, not appending again");
            return Ok(ToolResult::ack((self.confirm)(record))
                .with_data(json!({ "alreadySaved": true })));
        }

        completion::check_persistable(record).map_err(|state| self.refusal(state))?;

        let entry = record.snapshot()?;
        self.log.append(entry.clone())?;
        record.mark_logged();
        info!(
            tool = self.name,
            domain = self.schema.domain,
            log = self.log.name(),
            "Record saved"
        );

        Ok(ToolResult::ack((self.confirm)(record)).with_data(json!({ "entry": entry })))
    }
}
