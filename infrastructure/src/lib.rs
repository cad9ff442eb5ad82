//! Infrastructure layer for hiremate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod auth;
pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use auth::{FileTokenStore, StaticTokenStore};
pub use config::{
    ConfigLoader, ConfigValidationError, FileApiConfig, FileAuthConfig, FileChatConfig,
    FileConfig, FileLoggingConfig, FileServerConfig,
};
pub use http::{HttpChatTransport, SseDecoder};
pub use logging::JsonlConversationLogger;
