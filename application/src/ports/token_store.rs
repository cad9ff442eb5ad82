//! Token store port
//!
//! Source of the bearer token used for authenticated quota tracking.
//! Tokens are read as-is; renewal is not handled here.

/// Read access to the persisted bearer token.
pub trait TokenStore: Send + Sync {
    /// The current token, if the user is logged in.
    fn load(&self) -> Option<String>;
}

/// Store for anonymous use
pub struct NoTokenStore;

impl TokenStore for NoTokenStore {
    fn load(&self) -> Option<String> {
        None
    }
}
