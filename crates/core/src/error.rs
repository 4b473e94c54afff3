//! Error types for the Parley domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Parley operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Slot-filling errors ---
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    // --- Session log errors ---
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Why a record is not ready to be summarized or persisted.
///
/// The `Display` text is written for the end user: the decision loop relays
/// it verbatim and the conversation carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompleteState {
    #[error("Still missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Summary not generated")]
    SummaryNotGenerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// A write targeted a name outside the active schema. Always a contract
    /// bug in the caller, never something the user can fix.
    #[error("Unknown {domain} field: {field}")]
    UnknownField { domain: String, field: String },

    #[error("Field '{field}' does not hold a list")]
    NotAList { field: String },

    #[error("Record incomplete: {0}")]
    Incomplete(#[from] IncompleteState),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to read session log at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write session log at {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    /// Retryable: the reason names what the user still has to provide.
    #[error("{reason}")]
    Incomplete { tool_name: String, reason: String },

    #[error("Tool contract violated: {0}")]
    Contract(#[from] SlotError),

    #[error("Could not save session: {0}")]
    Persistence(#[from] LogError),
}

impl ToolError {
    /// Whether the decision loop should relay the message and keep the
    /// conversation going, rather than treat the call as a hard failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Incomplete { .. } | Self::Persistence(_))
    }
}
