//! Legacy resume surface from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address the legacy resume endpoints listen on
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5001".to_string(),
        }
    }
}
