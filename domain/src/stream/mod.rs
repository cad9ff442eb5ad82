//! Streaming chat domain.
//!
//! [`event::ChatEvent`] is the decoded form of one server-push message on
//! the chat stream.

pub mod event;
