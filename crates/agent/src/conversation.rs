//! One conversation: a session record, the domain's tool catalogue, and the
//! log that completed records are saved to.
//!
//! The decision loop (a language model, a script, a test) calls tools one
//! at a time; calls on a conversation are never concurrent, which `&mut
//! self` enforces.

use chrono::{DateTime, Utc};
use parley_core::continuity::{ContinuityPolicy, format_context};
use parley_core::domain::Domain;
use parley_core::error::{SlotError, ToolError};
use parley_core::log::{DEFAULT_WINDOW_DAYS, SessionLog};
use parley_core::record::SessionRecord;
use parley_core::tool::{ToolCall, ToolDefinition, ToolRegistry, ToolResult};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::ConversationEvent;

pub struct Conversation {
    id: String,
    domain: Domain,
    record: SessionRecord,
    tools: ToolRegistry,
    log: Arc<dyn SessionLog>,
    tool_calls_made: usize,
}

impl Conversation {
    /// Start a conversation with an empty record.
    pub fn new(domain: Domain, log: Arc<dyn SessionLog>) -> Result<Self, SlotError> {
        Self::with_history_days(domain, log, DEFAULT_WINDOW_DAYS)
    }

    /// As [`Conversation::new`], with the default look-back for history tools.
    pub fn with_history_days(
        domain: Domain,
        log: Arc<dyn SessionLog>,
        history_days: i64,
    ) -> Result<Self, SlotError> {
        let id = Uuid::new_v4().to_string();
        let schema = domain.schema();
        let mut record = SessionRecord::new(schema);
        if schema.session_field_id().is_some() {
            record = record.with_session_id(&id)?;
        }
        let tools = parley_tools::registry_with_history(domain, log.clone(), history_days)?;
        info!(conversation_id = %id, domain = %domain, log = log.name(), "Conversation started");
        Ok(Self {
            id,
            domain,
            record,
            tools,
            log,
            tool_calls_made: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn tool_calls_made(&self) -> usize {
        self.tool_calls_made
    }

    /// The tools the decision loop may call, sorted by name.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// A reference to the previous session to open with, or an empty
    /// string when the domain keeps no continuity or there is no history.
    pub fn opening_context(&self, policy: &ContinuityPolicy, now: DateTime<Utc>) -> String {
        let schema = self.record.schema();
        if !schema.continuity {
            return String::new();
        }
        let last = self.log.last_entry();
        let context = format_context(last.as_ref(), now, schema.noun, policy);
        debug!(conversation_id = %self.id, has_history = last.is_some(), "Opening context built");
        context
    }

    /// The opening event, if there is anything to open with.
    pub fn opening_event(&self, policy: &ContinuityPolicy, now: DateTime<Utc>) -> Option<ConversationEvent> {
        let context = self.opening_context(policy, now);
        (!context.is_empty()).then_some(ConversationEvent::Opening { context })
    }

    /// Execute one tool call against this conversation's record.
    pub async fn handle(&mut self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        self.tool_calls_made += 1;
        debug!(conversation_id = %self.id, tool = %call.name, "Tool call");
        let outcome = self.tools.execute(&mut self.record, call).await;
        if let Err(e) = &outcome {
            if e.is_retryable() {
                info!(conversation_id = %self.id, tool = %call.name, reason = %e, "Tool call refused");
            } else {
                warn!(conversation_id = %self.id, tool = %call.name, error = %e, "Tool call failed");
            }
        }
        outcome
    }

    /// As [`Conversation::handle`], folded into an event.
    pub async fn respond(&mut self, call: &ToolCall) -> ConversationEvent {
        let outcome = self.handle(call).await;
        ConversationEvent::from_outcome(call, outcome)
    }

    /// Close the conversation. A record that was never saved is dropped.
    pub fn finish(self) -> ConversationEvent {
        let saved = self.record.is_logged();
        if !saved {
            info!(
                conversation_id = %self.id,
                missing = ?self.record.missing_fields(),
                "Conversation ended without saving"
            );
        }
        ConversationEvent::Done {
            conversation_id: self.id,
            tool_calls_made: self.tool_calls_made,
            saved,
        }
    }
}
