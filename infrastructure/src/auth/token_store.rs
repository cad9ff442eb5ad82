use hiremate_application::TokenStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Token persisted as a plain text file.
///
/// The file is re-read on every request, so a token written by a later
/// login is picked up without restarting.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/hiremate/token`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("hiremate").join("token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) => {
                debug!("No token at {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Fixed token, or none for anonymous use.
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }
}

impl TokenStore for StaticTokenStore {
    fn load(&self) -> Option<String> {
        self.token.clone()
    }
}
