//! Status tool: tells the decision loop what is filled and what to ask next.

use async_trait::async_trait;
use parley_core::completion;
use parley_core::error::ToolError;
use parley_core::record::SessionRecord;
use parley_core::schema::SlotSchema;
use parley_core::tool::{Tool, ToolResult};
use serde_json::json;

use crate::reply::{ensure_domain, short_label};

/// Renders a complete record for the status reply.
pub type Describe = fn(&SessionRecord) -> String;

pub struct StatusTool {
    name: &'static str,
    description: &'static str,
    schema: &'static SlotSchema,
    describe_complete: Describe,
}

impl StatusTool {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        describe_complete: Describe,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            describe_complete,
        }
    }
}

/// Filled fields as "label: value" pairs, or "nothing yet".
pub fn describe_current(record: &SessionRecord) -> String {
    let current: Vec<String> = record
        .current_values()
        .into_iter()
        .filter(|(spec, _)| !spec.prompt.is_empty())
        .map(|(spec, value)| format!("{}: {value}", short_label(spec)))
        .collect();
    if current.is_empty() {
        "nothing yet".to_string()
    } else {
        current.join(", ")
    }
}

/// "Current order: size: large, milk: oat. Still need: drink type, name."
pub fn describe_progress(record: &SessionRecord) -> String {
    format!(
        "Current {}: {}. Still need: {}.",
        record.schema().noun,
        describe_current(record),
        completion::missing_labels(record).join(", ")
    )
}

#[async_trait]
impl Tool for StatusTool {
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
        let output = if record.is_complete() {
            (self.describe_complete)(record)
        } else {
            describe_progress(record)
        };
        Ok(ToolResult::ack(output).with_data(json!({
            "isComplete": record.is_complete(),
            "missingFields": record.missing_fields(),
            "nextPrompt": completion::next_prompt(record),
        })))
    }
}
