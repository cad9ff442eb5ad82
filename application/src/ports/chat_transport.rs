//! Chat transport port
//!
//! Defines how the application layer talks to the chat backend: a
//! server-push stream for token-by-token answers and a single-shot ask call.

use async_trait::async_trait;
use futures::stream::BoxStream;
use hiremate_domain::{AskMessage, ConversationTurn};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors raised below the chat protocol, while moving bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection dropped: {0}")]
    Dropped(String),

    #[error("Request timed out")]
    TimedOut,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Whether another endpoint might succeed where this one failed.
    ///
    /// Only failures to reach the backend, and server-side 5xx errors, are
    /// retried. A 4xx status is the backend's answer (bad request, expired
    /// token, out of credits) and would be the same on any port.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Connect(_) | TransportError::Dropped(_) | TransportError::TimedOut => {
                true
            }
            TransportError::Status { status, .. } => *status >= 500,
            TransportError::InvalidResponse(_) => false,
        }
    }
}

/// Raw `data` payloads of the stream, one per server-push message.
pub type EventStream = BoxStream<'static, Result<String, TransportError>>;

/// Parameters of one streaming request.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub question: String,
    /// Prior turns, oldest first, already cut to the streaming window.
    pub history: Vec<ConversationTurn>,
    /// Bearer token for quota tracking, sent as a query parameter.
    pub token: Option<String>,
}

impl StreamRequest {
    /// History as the JSON array sent in the `history` query parameter.
    pub fn history_json(&self) -> String {
        serde_json::to_string(&self.history).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Parameters of one non-streaming request.
///
/// Serializes to the request body `{ question, history: [{role, content}] }`;
/// the token travels in the `Authorization` header.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub history: Vec<AskMessage>,
    #[serde(skip)]
    pub token: Option<String>,
}

/// The coach's reply to an ask request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskReply {
    pub text: String,
}

/// Transport to the chat backend.
///
/// Implementations live in the infrastructure layer. Each call targets one
/// base URL; endpoint failover is decided by the caller.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Open the server-push stream for a question.
    async fn open_stream(
        &self,
        base_url: &Url,
        request: &StreamRequest,
    ) -> Result<EventStream, TransportError>;

    /// Ask a question and wait for the full reply.
    async fn ask(&self, base_url: &Url, request: &AskRequest) -> Result<AskReply, TransportError>;
}
