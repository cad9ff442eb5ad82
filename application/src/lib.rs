//! Application layer for hiremate
//!
//! This crate contains the chat session use case, port definitions, and
//! client configuration. It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatClientConfig, EndpointError, EndpointPlan};
pub use error::ChatError;
pub use ports::{
    chat_transport::{
        AskReply, AskRequest, ChatTransport, EventStream, StreamRequest, TransportError,
    },
    conversation_logger::{ChatMode, ConversationEvent, ConversationLogger, NoConversationLogger},
    stream_observer::{NoopObserver, StreamObserver},
    token_store::{NoTokenStore, TokenStore},
};
pub use use_cases::{
    chat_session::{ChatReply, ChatSession},
    stream_assembler::{AssemblerStep, StreamAssembler},
};
