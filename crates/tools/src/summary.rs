//! Summary tool: derives the summary field from the filled record.

use async_trait::async_trait;
use parley_core::completion;
use parley_core::error::{SlotError, ToolError};
use parley_core::record::SessionRecord;
use parley_core::schema::{FieldId, SlotSchema};
use parley_core::tool::{Tool, ToolResult};
use serde_json::json;
use tracing::{info, warn};

/// Composes the summary text from a complete record.
pub type Compose = fn(&SessionRecord) -> String;

pub struct SummaryTool {
    name: &'static str,
    description: &'static str,
    schema: &'static SlotSchema,
    field: FieldId,
    compose: Compose,
    ack: &'static str,
}

impl SummaryTool {
    /// Fails when the schema declares no summary field.
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        compose: Compose,
    ) -> Result<Self, SlotError> {
        let field = schema
            .summary_field_id()
            .ok_or_else(|| SlotError::UnknownField {
                domain: schema.domain.to_string(),
                field: "summary".to_string(),
            })?;
        Ok(Self {
            name,
            description,
            schema,
            field,
            compose,
            ack: "Summary generated.",
        })
    }

    pub fn with_ack(mut self, ack: &'static str) -> Self {
        self.ack = ack;
        self
    }
}

#[async_trait]
impl Tool for SummaryTool {
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
        crate::reply::ensure_domain(self.name, self.schema, record)?;

        let missing = completion::missing_labels(record);
        if !missing.is_empty() {
            warn!(tool = self.name, ?missing, "Summary requested before the record is complete");
            return Err(ToolError::Incomplete {
                tool_name: self.name.to_string(),
                reason: format!(
                    "Cannot generate summary. Still missing: {}. Please complete the {} first.",
                    missing.join(", "),
                    self.schema.noun
                ),
            });
        }

        let summary = (self.compose)(record);
        record.set(self.field, &summary);
        info!(domain = self.schema.domain, summary = %summary, "Summary generated");

        Ok(ToolResult::ack(self.ack).with_data(json!({ "summary": summary })))
    }
}
