//! Backend endpoint configuration from TOML (`[api]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the chat backend.
    pub base_url: String,
    /// Alternates to retry on transport failure (only the first is used).
    pub fallback_base_urls: Vec<String>,
    /// Derive a 5000/5001 alternate for local hosts when no fallback is set.
    pub derive_local_alternate: bool,
    /// Timeout for a non-streaming request, in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            fallback_base_urls: Vec::new(),
            derive_local_alternate: true,
            request_timeout_seconds: 60,
        }
    }
}
