//! Configuration file loading for hiremate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `HIREMATE_<SECTION>__<KEY>` (e.g. `HIREMATE_API__BASE_URL`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./hiremate.toml` or `./.hiremate.toml`
//! 4. Global: `$XDG_CONFIG_HOME/hiremate/config.toml` (or the platform equivalent)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileApiConfig, FileAuthConfig, FileChatConfig, FileConfig,
    FileLoggingConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
