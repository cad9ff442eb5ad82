//! Token source from TOML (`[auth]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    /// Explicit bearer token (prefer `token_file` or `HIREMATE_AUTH__TOKEN`)
    pub token: Option<String>,
    /// File holding the token written at login
    pub token_file: Option<String>,
}
