//! The conversation driver for Parley.
//!
//! A [`Conversation`] owns one session record and the tool catalogue for its
//! domain. The decision loop drives it one call at a time:
//!
//! 1. **Open** with a reference to the previous session, if the domain keeps one
//! 2. **Call** tools; each reply says what to ask for next
//! 3. **Finalize** through the domain's save tool, which appends to the log
//! 4. **Finish**, noting whether the record was saved
//!
//! Refusals (missing fields, no summary yet) come back as retryable errors
//! whose text is meant for the user; the conversation simply continues.

pub mod conversation;
pub mod event;

pub use conversation::Conversation;
pub use event::ConversationEvent;
