//! Log destinations from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of chat events
    pub conversation_log: Option<String>,
    /// Directory for daily rotated diagnostic logs
    pub file_dir: Option<String>,
}
