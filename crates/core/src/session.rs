use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{HubError, Result};

/// The persisted "active model" record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub model_id: String,
    /// Seconds since the epoch, e.g. `1700000000.123456`
    pub timestamp: String,
    pub identifier: String,
}

impl SessionRecord {
    pub fn new(model_id: &str) -> Self {
        let now = Utc::now();
        Self {
            model_id: model_id.to_string(),
            timestamp: format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros()),
            identifier: Uuid::new_v4().to_string(),
        }
    }
}

/// Single-file store for the active session.
///
/// There is no locking: two processes opening sessions concurrently race and
/// the last write wins.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_model_id(&self) -> Result<Option<String>> {
        Ok(self.get()?.map(|session| session.model_id))
    }

    /// Start a session for `model_id`, replacing whatever was there.
    pub fn open(&self, model_id: &str) -> Result<SessionRecord> {
        debug!("Opening session {}", self.path.display());
        let session = SessionRecord::new(model_id);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&session)?;
        fs::write(&self.path, content)?;
        Ok(session)
    }

    pub fn get(&self) -> Result<Option<SessionRecord>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session exists");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Getting session from {}", self.path.display());
        let session = serde_json::from_slice(&content).map_err(|source| HubError::SessionRead {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(session))
    }

    pub fn close(&self) -> Result<()> {
        debug!("Closing session {}", self.path.display());
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
