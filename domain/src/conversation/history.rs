//! Bounded-window conversation history.

use super::turn::{AskMessage, ConversationTurn};

/// Append-only log of the turns exchanged in one chat session.
///
/// The log itself is unbounded; truncation happens when it is read through
/// [`recent`](Self::recent), so each outgoing request picks its own window.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The last `n` turns in chronological order.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// The last `n` turns as role-tagged ask messages.
    pub fn as_ask_messages(&self, n: usize) -> Vec<AskMessage> {
        self.recent(n)
            .iter()
            .map(ConversationTurn::to_ask_message)
            .collect()
    }
}
