//! Conversation events.
//!
//! `ConversationEvent` is what one turn of the decision loop produced, in a
//! form that can be printed, logged as JSON, or forwarded to a client.
//!
//! - `opening`: the continuity reference that starts the conversation
//! - `reply`: a tool call succeeded; `output` is the acknowledgment
//! - `retry`: the call was refused for a reason the user can fix
//! - `failed`: a hard failure (unknown tool, bad arguments, contract bug)
//! - `done`: the conversation ended

use parley_core::error::ToolError;
use parley_core::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// The opening reference to the last session (never empty).
    Opening { context: String },

    /// A tool call succeeded.
    Reply {
        id: String,
        name: String,
        output: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },

    /// The call was refused; relay `message` and carry on.
    Retry {
        id: String,
        name: String,
        message: String,
    },

    /// The call failed outright.
    Failed {
        id: String,
        name: String,
        message: String,
    },

    /// The conversation is over.
    Done {
        conversation_id: String,
        tool_calls_made: usize,
        saved: bool,
    },
}

impl ConversationEvent {
    /// Wrap the outcome of one tool call.
    pub fn from_outcome(call: &ToolCall, outcome: Result<ToolResult, ToolError>) -> Self {
        match outcome {
            Ok(result) => Self::Reply {
                id: call.id.clone(),
                name: call.name.clone(),
                output: result.output,
                data: result.data,
            },
            Err(e) if e.is_retryable() => Self::Retry {
                id: call.id.clone(),
                name: call.name.clone(),
                message: e.to_string(),
            },
            Err(e) => Self::Failed {
                id: call.id.clone(),
                name: call.name.clone(),
                message: e.to_string(),
            },
        }
    }

    /// Event name, as used in the `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Opening { .. } => "opening",
            Self::Reply { .. } => "reply",
            Self::Retry { .. } => "retry",
            Self::Failed { .. } => "failed",
            Self::Done { .. } => "done",
        }
    }

    /// The text to say to the user, if this event carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Opening { context } => Some(context),
            Self::Reply { output, .. } => Some(output),
            Self::Retry { message, .. } => Some(message),
            Self::Failed { .. } | Self::Done { .. } => None,
        }
    }
}
