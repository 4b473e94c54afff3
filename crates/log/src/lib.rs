//! Session log implementations for Parley.

pub mod file_log;
pub mod in_memory;
pub mod noop;

pub use file_log::JsonFileLog;
pub use in_memory::InMemoryLog;
pub use noop::NoopLog;
