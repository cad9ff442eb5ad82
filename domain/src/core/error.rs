//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Malformed chat event: {reason}")]
    MalformedEvent { reason: String, raw: String },
}

impl DomainError {
    /// Check if this error came from decoding a stream payload
    pub fn is_malformed_event(&self) -> bool {
        matches!(self, DomainError::MalformedEvent { .. })
    }
}
