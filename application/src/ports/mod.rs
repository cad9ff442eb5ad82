//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod chat_transport;
pub mod conversation_logger;
pub mod stream_observer;
pub mod token_store;
