//! Chat behaviour from TOML (`[chat]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Use the streaming endpoint by default
    pub stream: bool,
    /// Budget for a whole streamed answer, in seconds
    pub stream_timeout_seconds: u64,
    /// Turns attached to a streaming request
    pub stream_history_window: usize,
    /// Turns attached to a non-streaming request
    pub ask_history_window: usize,
    /// Consecutive malformed stream messages tolerated (0 = unlimited)
    pub max_consecutive_parse_failures: u32,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            stream: true,
            stream_timeout_seconds: 30,
            stream_history_window: 5,
            ask_history_window: 10,
            max_consecutive_parse_failures: 20,
        }
    }
}
