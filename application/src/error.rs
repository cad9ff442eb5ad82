//! Errors surfaced to the chat UI.

use crate::ports::chat_transport::TransportError;
use thiserror::Error;

/// Terminal failure of one chat request.
///
/// Single malformed payloads are not represented here: they are skipped by
/// the [`StreamAssembler`](crate::StreamAssembler) and only become
/// [`ChatError::Parse`] once too many arrive in a row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("timeout")]
    Timeout,

    #[error("stream unhealthy: {consecutive} consecutive malformed messages")]
    Parse { consecutive: u32 },

    #[error("{0}")]
    Upstream(String),

    #[error("cancelled")]
    Cancelled,
}

impl ChatError {
    /// Machine-facing reason, e.g. `"timeout"`.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Human-readable message for display instead of the raw error.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Transport(_) => {
                "I couldn't reach the interview coach. Please check your connection and try again."
            }
            ChatError::Timeout => "The coach is taking too long to answer. Please try again.",
            ChatError::Parse { .. } => "The answer arrived garbled. Please ask again in a moment.",
            ChatError::Upstream(_) => {
                "The coach couldn't answer that right now. Please try again shortly."
            }
            ChatError::Cancelled => "Request cancelled.",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ChatError::Timeout)
    }

    /// Whether the single-request endpoint is worth trying after this
    /// stream failure. The backend never answered, as opposed to answering
    /// with an error.
    pub fn allows_ask_fallback(&self) -> bool {
        matches!(self, ChatError::Transport(_) | ChatError::Timeout)
    }
}
