//! Field-writing tools: one value in, one field updated, one reply out.
//!
//! Each tool is configured with the schema it belongs to and resolves its
//! target field once, at construction. A name outside the schema is a
//! programming error and surfaces when the registry is built, not in the
//! middle of a conversation.

use async_trait::async_trait;
use parley_core::error::{SlotError, ToolError};
use parley_core::record::{Change, SessionRecord};
use parley_core::schema::{FieldId, SlotSchema};
use parley_core::tool::{Tool, ToolResult, string_arg};
use serde_json::json;

use crate::reply::{ack_and_prompt, ensure_domain, render, with_follow_up};

/// Which field a [`SetFieldTool`] writes.
#[derive(Debug, Clone, Copy)]
pub enum FieldTarget {
    /// Always the same field.
    Fixed(FieldId),
    /// The field named by this argument, resolved per call.
    Named(&'static str),
}

/// Overwrites one scalar field.
///
/// Ack templates may use `{value}` (the stored value) and `{label}`. A blank
/// value unsets the field.
pub struct SetFieldTool {
    name: &'static str,
    description: &'static str,
    schema: &'static SlotSchema,
    target: FieldTarget,
    value_arg: &'static str,
    value_description: &'static str,
    ack: &'static str,
}

impl SetFieldTool {
    /// A tool that always writes `field`.
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        field: &str,
        value_arg: &'static str,
    ) -> Result<Self, SlotError> {
        let id = schema.resolve(field)?;
        Ok(Self {
            name,
            description,
            schema,
            target: FieldTarget::Fixed(id),
            value_arg,
            value_description: schema.field(id).label,
            ack: "Got it, {value}.",
        })
    }

    /// A tool whose caller names the field in `field_arg`.
    pub fn named(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        field_arg: &'static str,
        value_arg: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            target: FieldTarget::Named(field_arg),
            value_arg,
            value_description: "The value to record",
            ack: "Got it, {label}: {value}.",
        }
    }

    pub fn with_ack(mut self, ack: &'static str) -> Self {
        self.ack = ack;
        self
    }

    pub fn with_value_description(mut self, description: &'static str) -> Self {
        self.value_description = description;
        self
    }

    fn resolve(&self, arguments: &serde_json::Value) -> Result<FieldId, ToolError> {
        match self.target {
            FieldTarget::Fixed(id) => Ok(id),
            FieldTarget::Named(arg) => Ok(self.schema.resolve(string_arg(arguments, arg)?)?),
        }
    }
}

#[async_trait]
impl Tool for SetFieldTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        if let FieldTarget::Named(arg) = self.target {
            let fields: Vec<&str> = self.schema.fields.iter().map(|f| f.name).collect();
            properties.insert(
                arg.to_string(),
                json!({
                    "type": "string",
                    "description": "Which field to update",
                    "enum": fields
                }),
            );
            required.push(arg);
        }
        properties.insert(
            self.value_arg.to_string(),
            json!({ "type": "string", "description": self.value_description }),
        );
        required.push(self.value_arg);
        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    async fn execute(
        &self,
        record: &mut SessionRecord,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        ensure_domain(self.name, self.schema, record)?;
        let id = self.resolve(&arguments)?;
        let value = string_arg(&arguments, self.value_arg)?;
        let spec = self.schema.field(id);

        let change = record.set(id, value);
        let ack = match change {
            Change::Set | Change::Added => {
                let stored = record.text(id).unwrap_or(value.trim());
                render(self.ack, &[("value", stored), ("label", spec.label)])
            }
            Change::AlreadyPresent => format!("I already have that for {}.", spec.label),
            Change::Cleared => format!("Okay, I've cleared the {}.", spec.label),
            Change::Ignored => String::new(),
        };

        Ok(ToolResult::ack(ack_and_prompt(record, &ack)).with_data(json!({
            "field": spec.name,
            "value": record.text(id),
            "missingFields": record.missing_fields(),
        })))
    }
}

/// Adds one item to a list field, ignoring case-insensitive repeats.
///
/// Templates may use `{value}` and `{count}` (items now in the list). Once
/// the record is complete the tool asks `more_prompt` instead of the
/// schema's ready prompt, since more items are usually welcome.
pub struct AddItemTool {
    name: &'static str,
    description: &'static str,
    schema: &'static SlotSchema,
    field: FieldId,
    value_arg: &'static str,
    value_description: &'static str,
    ack_added: &'static str,
    ack_duplicate: &'static str,
    more_prompt: &'static str,
}

impl AddItemTool {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: &'static SlotSchema,
        field: &str,
        value_arg: &'static str,
    ) -> Result<Self, SlotError> {
        let id = schema.resolve(field)?;
        let spec = schema.field(id);
        if !spec.is_list() {
            return Err(SlotError::NotAList {
                field: spec.name.to_string(),
            });
        }
        Ok(Self {
            name,
            description,
            schema,
            field: id,
            value_arg,
            value_description: spec.label,
            ack_added: "Added {value}.",
            ack_duplicate: "{value} is already on the list.",
            more_prompt: spec.prompt,
        })
    }

    pub fn with_acks(mut self, added: &'static str, duplicate: &'static str) -> Self {
        self.ack_added = added;
        self.ack_duplicate = duplicate;
        self
    }

    pub fn with_more_prompt(mut self, prompt: &'static str) -> Self {
        self.more_prompt = prompt;
        self
    }

    pub fn with_value_description(mut self, description: &'static str) -> Self {
        self.value_description = description;
        self
    }
}

#[async_trait]
impl Tool for AddItemTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.value_arg.to_string(),
            json!({ "type": "string", "description": self.value_description }),
        );
        json!({
            "type": "object",
            "properties": properties,
            "required": [self.value_arg]
        })
    }

    async fn execute(
        &self,
        record: &mut SessionRecord,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        ensure_domain(self.name, self.schema, record)?;
        let value = string_arg(&arguments, self.value_arg)?.trim();

        let change = record.set(self.field, value);
        let count = record.list(self.field).len().to_string();
        let vars = [("value", value), ("count", count.as_str())];
        let ack = match change {
            Change::Added => render(self.ack_added, &vars),
            Change::AlreadyPresent => render(self.ack_duplicate, &vars),
            _ => String::new(),
        };

        let output = if record.is_complete() {
            with_follow_up(&ack, self.more_prompt)
        } else {
            ack_and_prompt(record, &ack)
        };

        Ok(ToolResult::ack(output).with_data(json!({
            "field": self.schema.field(self.field).name,
            "items": record.list(self.field),
            "added": change == Change::Added,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::domain::{lead, order};

    fn size_tool() -> SetFieldTool {
        SetFieldTool::new("update_size", "Update the size", &order::SCHEMA, order::SIZE, "size")
            .unwrap()
            .with_ack("Got it! {value} size.")
    }

    fn extras_tool() -> AddItemTool {
        AddItemTool::new("add_extra", "Add an extra", &order::SCHEMA, order::EXTRAS, "extra")
            .unwrap()
            .with_acks("Added {value} to your order.", "{value} is already in your order.")
    }

    #[tokio::test]
    async fn set_field_acks_and_prompts_next() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        record.set_field(order::DRINK_TYPE, "latte").unwrap();

        let result = size_tool()
            .execute(&mut record, json!({"size": "  Large "}))
            .await
            .unwrap();
        assert_eq!(result.output, "Got it! large size. What kind of milk would you like?");
        assert_eq!(record.text_by_name(order::SIZE), Some("large"));
        assert_eq!(result.data.unwrap()["missingFields"], json!(["milk", "name"]));
    }

    #[tokio::test]
    async fn blank_value_clears_field() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        record.set_field(order::SIZE, "small").unwrap();
        let result = size_tool().execute(&mut record, json!({"size": "  "})).await.unwrap();
        assert!(result.output.starts_with("Okay, I've cleared the size."));
        assert!(record.text_by_name(order::SIZE).is_none());
    }

    #[tokio::test]
    async fn missing_argument_is_invalid() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        let err = size_tool().execute(&mut record, json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn unknown_field_fails_at_construction() {
        let err = SetFieldTool::new("update_colour", "", &order::SCHEMA, "colour", "colour")
            .err()
            .unwrap();
        assert!(matches!(err, SlotError::UnknownField { .. }));
    }

    #[test]
    fn add_item_requires_a_list_field() {
        let err = AddItemTool::new("add_size", "", &order::SCHEMA, order::SIZE, "size")
            .err()
            .unwrap();
        assert!(matches!(err, SlotError::NotAList { .. }));
    }

    #[tokio::test]
    async fn named_target_resolves_loosely() {
        let tool = SetFieldTool::named("update_lead_field", "", &lead::SCHEMA, "field", "value");
        let mut record = SessionRecord::new(&lead::SCHEMA);
        let result = tool
            .execute(&mut record, json!({"field": "use case", "value": "support bots"}))
            .await
            .unwrap();
        assert!(result.output.starts_with("Got it, use case: support bots."));
        assert_eq!(record.text_by_name(lead::USE_CASE), Some("support bots"));
    }

    #[tokio::test]
    async fn named_target_rejects_unknown_field() {
        let tool = SetFieldTool::named("update_lead_field", "", &lead::SCHEMA, "field", "value");
        let mut record = SessionRecord::new(&lead::SCHEMA);
        let err = tool
            .execute(&mut record, json!({"field": "favourite colour", "value": "teal"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Contract(SlotError::UnknownField { .. })));
        assert!(!err.is_retryable());
    }

    #[test]
    fn named_schema_lists_fields() {
        let tool = SetFieldTool::named("update_lead_field", "", &lead::SCHEMA, "field", "value");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["field", "value"]));
        assert!(schema["properties"]["field"]["enum"]
            .as_array()
            .unwrap()
            .contains(&json!("teamSize")));
    }

    #[tokio::test]
    async fn duplicate_item_is_acknowledged_not_added() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        let tool = extras_tool();
        tool.execute(&mut record, json!({"extra": "Vanilla Syrup"})).await.unwrap();
        let result = tool.execute(&mut record, json!({"extra": "vanilla syrup"})).await.unwrap();
        assert!(result.output.starts_with("vanilla syrup is already in your order."));
        assert_eq!(record.list_by_name(order::EXTRAS), ["Vanilla Syrup"]);
        assert_eq!(result.data.unwrap()["added"], json!(false));
    }

    #[tokio::test]
    async fn add_item_asks_for_more_once_complete() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        for (field, value) in [
            (order::DRINK_TYPE, "mocha"),
            (order::SIZE, "small"),
            (order::MILK, "oat"),
            (order::NAME, "Ana"),
        ] {
            record.set_field(field, value).unwrap();
        }
        let result = extras_tool()
            .execute(&mut record, json!({"extra": "caramel"}))
            .await
            .unwrap();
        assert_eq!(
            result.output,
            "Added caramel to your order. Would you like any other extras, or are you all set?"
        );
    }

    #[tokio::test]
    async fn wrong_domain_record_is_rejected() {
        let mut record = SessionRecord::new(&lead::SCHEMA);
        let err = size_tool()
            .execute(&mut record, json!({"size": "large"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
