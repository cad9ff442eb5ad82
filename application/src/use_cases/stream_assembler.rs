//! Incremental assembly of a streamed answer.

use crate::error::ChatError;
use hiremate_domain::{ChatEvent, DomainError};

/// What the session should do after one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblerStep {
    /// Stream acknowledged; nothing to show.
    Connected,
    /// A fragment was appended to the running total.
    Chunk(String),
    /// The payload could not be decoded and was skipped.
    Skipped(DomainError),
    /// The answer is complete.
    Done,
    /// The stream must be closed with this error.
    Failed(ChatError),
}

/// Accumulates chunk fragments into the full answer.
///
/// Fragments are appended in delivery order, never reordered or
/// deduplicated, so the text only grows until a terminal step.
#[derive(Debug)]
pub struct StreamAssembler {
    text: String,
    chunks: usize,
    consecutive_failures: u32,
    max_consecutive_failures: Option<u32>,
}

impl StreamAssembler {
    pub fn new(max_consecutive_failures: Option<u32>) -> Self {
        Self {
            text: String::new(),
            chunks: 0,
            consecutive_failures: 0,
            max_consecutive_failures,
        }
    }

    /// Feed one raw `data` payload.
    pub fn accept(&mut self, data: &str) -> AssemblerStep {
        let event = match ChatEvent::parse(data) {
            Ok(event) => event,
            Err(e) => {
                self.consecutive_failures += 1;
                return match self.max_consecutive_failures {
                    Some(max) if self.consecutive_failures > max => {
                        AssemblerStep::Failed(ChatError::Parse {
                            consecutive: self.consecutive_failures,
                        })
                    }
                    _ => AssemblerStep::Skipped(e),
                };
            }
        };
        self.consecutive_failures = 0;

        match event {
            ChatEvent::Connected => AssemblerStep::Connected,
            ChatEvent::Chunk(fragment) => {
                self.text.push_str(&fragment);
                self.chunks += 1;
                AssemblerStep::Chunk(fragment)
            }
            ChatEvent::Done => AssemblerStep::Done,
            ChatEvent::Error(message) => AssemblerStep::Failed(ChatError::Upstream(message)),
        }
    }

    /// The running total so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any chunk has been delivered to the caller.
    pub fn has_delivered(&self) -> bool {
        self.chunks > 0
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
