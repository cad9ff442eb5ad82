//! Conversation turn entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role name used by the non-streaming ask endpoint
    pub fn role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One message in a conversation (Entity)
///
/// Created on every user submission and every completed bot reply.
/// Serialized as `{ "sender", "text", "timestamp" }` when attached to a
/// streaming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, Utc::now())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text, Utc::now())
    }

    /// Map to the role-tagged form used by the ask endpoint
    pub fn to_ask_message(&self) -> AskMessage {
        AskMessage {
            role: self.sender.role().to_string(),
            content: self.text.clone(),
        }
    }
}

/// Role-tagged history entry for the non-streaming ask endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskMessage {
    pub role: String,
    pub content: String,
}
