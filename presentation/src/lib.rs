//! Presentation layer for hiremate
//!
//! This crate contains CLI definitions, the interactive chat interface,
//! console output helpers, and the legacy resume HTTP surface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use chat::{ChatRepl, ConsoleObserver};
pub use cli::commands::Cli;
pub use output::markdown::clean_markdown;
pub use server::legacy_resume::{legacy_resume_router, serve_legacy_resume};
