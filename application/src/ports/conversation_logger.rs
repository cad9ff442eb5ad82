//! Port for structured conversation logging.
//!
//! Each chat exchange is recorded as a handful of [`ConversationEvent`]s
//! (question sent, answer completed or failed, fallback used) so a
//! transcript can be replayed later. Diagnostics go through `tracing`;
//! this port is only for the machine-readable transcript.

use serde_json::{Value, json};

/// How a question was put to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Stream,
    Ask,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Stream => "stream",
            ChatMode::Ask => "ask",
        }
    }
}

/// A structured conversation event.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier, written as the record's `type`.
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn question_sent(mode: ChatMode, question: &str, history_turns: usize) -> Self {
        Self::new(
            "question_sent",
            json!({
                "mode": mode.as_str(),
                "question": question,
                "history_turns": history_turns,
            }),
        )
    }

    pub fn answer_completed(mode: ChatMode, bytes: usize) -> Self {
        Self::new(
            "answer_completed",
            json!({ "mode": mode.as_str(), "bytes": bytes }),
        )
    }

    pub fn answer_failed(mode: ChatMode, reason: &str) -> Self {
        Self::new(
            "answer_failed",
            json!({ "mode": mode.as_str(), "reason": reason }),
        )
    }

    /// The backend could not be reached and a canned reply was shown.
    pub fn fallback_used(reason: &str) -> Self {
        Self::new("fallback_used", json!({ "reason": reason }))
    }
}

/// Sink for conversation events.
///
/// `log` never fails; implementations handle their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
