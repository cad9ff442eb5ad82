//! Chat client parameters.

use std::time::Duration;

/// Default backend for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Parameters that control one [`ChatSession`](crate::ChatSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatClientConfig {
    /// Primary backend base URL.
    pub base_url: String,
    /// Explicit alternates; only the first one is ever tried.
    pub fallback_base_urls: Vec<String>,
    /// Derive a 5000/5001 alternate for local-development hosts when no
    /// explicit alternate is configured.
    pub derive_local_alternate: bool,
    /// Budget for the whole streaming exchange, measured from connection start.
    pub stream_timeout: Duration,
    /// Timeout for each non-streaming request.
    pub request_timeout: Duration,
    /// Turns attached to a streaming request.
    pub stream_history_window: usize,
    /// Turns attached to a non-streaming request.
    pub ask_history_window: usize,
    /// Consecutive malformed stream messages tolerated before giving up.
    /// `None` skips malformed messages forever.
    pub max_consecutive_parse_failures: Option<u32>,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback_base_urls: Vec::new(),
            derive_local_alternate: true,
            stream_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            stream_history_window: 5,
            ask_history_window: 10,
            max_consecutive_parse_failures: Some(20),
        }
    }
}

impl ChatClientConfig {
    // ==================== Builder Methods ====================

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_fallback_base_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_base_urls.push(url.into());
        self
    }

    pub fn with_derive_local_alternate(mut self, derive: bool) -> Self {
        self.derive_local_alternate = derive;
        self
    }

    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_consecutive_parse_failures(mut self, max: Option<u32>) -> Self {
        self.max_consecutive_parse_failures = max;
        self
    }
}
