use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubError>;

#[derive(Debug, Error)]
pub enum HubError {
    /// The registry could not be reached or its reply could not be decoded.
    #[error("failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The serving tool could not be spawned at all.
    #[error("serving tool `{tool}` is not available: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool} list` exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// An optional collaborator needed by the requested path was not configured.
    #[error("{0} is not configured")]
    MissingCapability(&'static str),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("session file {} is unreadable: {source}", .path.display())]
    SessionRead {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HubError {
    /// True for a registry reply that says the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HubError::Status { status: 404, .. })
    }
}
