//! Use cases (application services)
//!
//! - [`chat_session::ChatSession`]: one chat widget's conversation with the coach
//! - [`stream_assembler::StreamAssembler`]: folds stream payloads into the answer text

pub mod chat_session;
pub mod stream_assembler;
