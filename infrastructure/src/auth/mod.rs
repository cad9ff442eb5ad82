//! Token store adapters.
//!
//! - [`FileTokenStore`] reads the token the login flow persisted on disk
//! - [`StaticTokenStore`] holds a token given on the command line or in config

mod token_store;

pub use token_store::{FileTokenStore, StaticTokenStore};
