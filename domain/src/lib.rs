//! Domain layer for hiremate
//!
//! This crate contains the core entities and value objects of the interview
//! coach chat client. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A chat widget owns a [`ConversationHistory`] of [`ConversationTurn`]s.
//! The most recent turns are attached to every outgoing question so the
//! coach keeps context between messages.
//!
//! ## Chat events
//!
//! The streaming endpoint pushes one JSON payload per message, decoded into
//! a [`ChatEvent`] (`connected`, `chunk`, `done`, `error`).
//!
//! ## Fallback replies
//!
//! When the backend cannot be reached at all, [`fallback_reply`] picks a
//! canned coaching answer by keyword so the user always gets a response.

pub mod conversation;
pub mod core;
pub mod fallback;
pub mod stream;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    history::ConversationHistory,
    turn::{AskMessage, ConversationTurn, Sender},
};
pub use core::{error::DomainError, question::Question};
pub use fallback::{FallbackTopic, fallback_reply};
pub use stream::event::ChatEvent;
