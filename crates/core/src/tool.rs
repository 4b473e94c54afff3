//! Tool trait: the operations the external decision loop may call.
//!
//! Every tool acts on the conversation's session record. A tool's return
//! value is the whole contract: a short acknowledgment that also says what
//! to ask for next, or a named error whose text is relayed to the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ToolError;
use crate::record::SessionRecord;

/// A tool as advertised to the decision loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the decision loop's call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The acknowledgment text
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful acknowledgment with no structured payload.
    pub fn ack(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The core Tool trait.
///
/// Each tool performs at most one update on the record it is handed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "update_size", "save_check_in").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the decision loop).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool against the conversation's record.
    async fn execute(
        &self,
        record: &mut SessionRecord,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for the decision loop.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Read a required string argument.
pub fn string_arg<'a>(arguments: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    arguments[key]
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{key}' argument")))
}

/// A registry of available tools, keyed by name.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call against `record`. The result carries the call id.
    pub async fn execute(
        &self,
        record: &mut SessionRecord,
        call: &ToolCall,
    ) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        let mut result = tool.execute(record, call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order;

    /// Writes the customer's name, for registry tests.
    struct NameTool;

    #[async_trait]
    impl Tool for NameTool {
        fn name(&self) -> &str { "update_name" }
        fn description(&self) -> &str { "Records the customer's name" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" }
                },
                "required": ["name"]
            })
        }
        async fn execute(
            &self,
            record: &mut SessionRecord,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            let name = string_arg(&arguments, "name")?;
            record.set_field("name", name)?;
            Ok(ToolResult::ack(format!("Thanks {name}!")))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        assert!(registry.get("update_name").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["update_name"]);
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "update_name");
    }

    #[tokio::test]
    async fn registry_execute_tool_updates_record() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        let mut record = SessionRecord::new(&order::SCHEMA);

        let call = ToolCall {
            id: "call_1".into(),
            name: "update_name".into(),
            arguments: serde_json::json!({"name": "Ravi"}),
        };
        let result = registry.execute(&mut record, &call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.call_id, "call_1");
        assert_eq!(result.output, "Thanks Ravi!");
        assert_eq!(record.text_by_name("name"), Some("Ravi"));
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let mut record = SessionRecord::new(&order::SCHEMA);
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&mut record, &call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid() {
        let mut record = SessionRecord::new(&order::SCHEMA);
        let err = NameTool
            .execute(&mut record, serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
