//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default so partial files are valid.

mod api;
mod auth;
mod chat;
mod logging;
mod server;

pub use api::FileApiConfig;
pub use auth::FileAuthConfig;
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;

use hiremate_application::{ChatClientConfig, EndpointPlan};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    ZeroValue { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    #[error("{field}: {reason}")]
    InvalidUrl { field: String, reason: String },

    #[error("server.bind '{0}' is not a socket address")]
    InvalidBindAddress(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend endpoints
    pub api: FileApiConfig,
    /// Chat behaviour
    pub chat: FileChatConfig,
    /// Bearer token source
    pub auth: FileAuthConfig,
    /// Diagnostic and transcript logs
    pub logging: FileLoggingConfig,
    /// Legacy resume surface
    pub server: FileServerConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.api.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyValue {
                field: "api.base_url",
            });
        }
        if self.api.request_timeout_seconds == 0 {
            issues.push(ConfigValidationError::ZeroValue {
                field: "api.request_timeout_seconds",
            });
        }
        if self.chat.stream_timeout_seconds == 0 {
            issues.push(ConfigValidationError::ZeroValue {
                field: "chat.stream_timeout_seconds",
            });
        }
        if self.chat.stream_history_window == 0 {
            issues.push(ConfigValidationError::ZeroValue {
                field: "chat.stream_history_window",
            });
        }
        if self.chat.ask_history_window == 0 {
            issues.push(ConfigValidationError::ZeroValue {
                field: "chat.ask_history_window",
            });
        }

        if !self.api.base_url.trim().is_empty()
            && let Err(e) = EndpointPlan::from_config(&self.to_client_config())
        {
            issues.push(ConfigValidationError::InvalidUrl {
                field: "api".to_string(),
                reason: e.to_string(),
            });
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            issues.push(ConfigValidationError::InvalidBindAddress(
                self.server.bind.clone(),
            ));
        }

        issues
    }

    /// Convert into the application's client configuration.
    pub fn to_client_config(&self) -> ChatClientConfig {
        ChatClientConfig {
            base_url: self.api.base_url.clone(),
            fallback_base_urls: self.api.fallback_base_urls.clone(),
            derive_local_alternate: self.api.derive_local_alternate,
            stream_timeout: Duration::from_secs(self.chat.stream_timeout_seconds),
            request_timeout: Duration::from_secs(self.api.request_timeout_seconds),
            stream_history_window: self.chat.stream_history_window,
            ask_history_window: self.chat.ask_history_window,
            max_consecutive_parse_failures: match self.chat.max_consecutive_parse_failures {
                0 => None,
                n => Some(n),
            },
        }
    }
}
