//! Conversation domain.
//!
//! - [`turn::ConversationTurn`]: a single user or bot message
//! - [`history::ConversationHistory`]: the in-memory log owned by one chat session

pub mod history;
pub mod turn;
