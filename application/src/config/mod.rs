//! Application-level configuration.
//!
//! - [`ChatClientConfig`]: timeouts, history windows and endpoints for a chat session
//! - [`EndpointPlan`]: primary backend plus at most one alternate to retry against

pub mod client_config;
pub mod endpoints;

pub use client_config::ChatClientConfig;
pub use endpoints::{EndpointError, EndpointPlan};
