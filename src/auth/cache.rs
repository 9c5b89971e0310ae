use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{AuthError, Token};

const CACHE_FILE: &str = "token_cache.json";

/// JSON file holding the last issued token.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache file in the per-user data directory.
    pub fn open_default() -> Result<Self, AuthError> {
        let dirs = directories::ProjectDirs::from("", "", "onenote-import")
            .ok_or_else(|| AuthError::Cache("Could not determine data directory".into()))?;
        Ok(Self::new(dirs.data_dir().join(CACHE_FILE)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the cached token. A missing or unreadable cache is simply empty.
    pub fn load(&self) -> Option<Token> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                debug!("Ignoring unparsable token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, token: &Token) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AuthError::Cache(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(token).map_err(|e| AuthError::Cache(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(())
    }

    /// Remove the cache file. Returns whether there was one.
    pub fn clear(&self) -> Result<bool, AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AuthError::Cache(e.to_string())),
        }
    }
}
