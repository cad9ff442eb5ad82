//! HTTP adapter for the chat backend
//!
//! Implements [`ChatTransport`](hiremate_application::ChatTransport) with
//! reqwest: the streaming endpoint is read as server-sent events, the ask
//! endpoint as plain JSON.

pub mod sse;
pub mod transport;

pub use sse::SseDecoder;
pub use transport::HttpChatTransport;
