use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::User;
use crate::error::{DashError, Result};

/// What survives between runs: the bearer token and who it belongs to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// session.toml inside the config directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("session.toml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session. A missing file means logged out.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored = toml::from_str(&content).map_err(|e| DashError::ConfigParse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(stored))
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(session).map_err(|e| DashError::ConfigWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
