//! # Parley Core
//!
//! Domain types, traits, and error definitions for Parley's slot-filling
//! dialogue agents. This crate has no I/O of its own: it defines the model
//! that the log, tool and agent crates implement against.
//!
//! ## Layout
//!
//! - [`schema`] / [`domain`]: what each conversation collects
//! - [`record`] / [`completion`]: the in-progress record and what it lacks
//! - [`entry`] / [`log`]: completed records and the history trait
//! - [`continuity`]: the opening reference to last session
//! - [`tool`]: the contract consumed by the external decision loop

pub mod completion;
pub mod continuity;
pub mod domain;
pub mod entry;
pub mod error;
pub mod log;
pub mod record;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use continuity::{ContinuityPolicy, format_context};
pub use domain::Domain;
pub use entry::LogEntry;
pub use error::{Error, IncompleteState, LogError, Result, SlotError, ToolError};
pub use log::SessionLog;
pub use record::{Change, SessionRecord};
pub use schema::{Cardinality, FieldId, FieldSpec, SlotSchema};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
