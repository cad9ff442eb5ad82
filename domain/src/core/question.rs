//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question to be answered by the interview coach (Value Object)
///
/// Guaranteed to contain at least one non-whitespace character. Surrounding
/// whitespace is trimmed so what is sent matches what the user meant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Question {
    content: String,
}

impl Question {
    /// Try to create a new question, returning None if empty
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        Self::parse(content).ok()
    }

    /// Create a new question, rejecting empty or whitespace-only input
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Question::parse(s)
    }
}

impl TryFrom<&str> for Question {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Question::parse(s)
    }
}

impl From<Question> for String {
    fn from(q: Question) -> Self {
        q.content
    }
}
