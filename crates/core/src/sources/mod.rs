pub mod github;
pub mod services;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{HubError, Result};

pub use github::GitHubClient;
pub use services::{parse_listing, ServingDaemon, ServingTool};

/// A repository as seen through the authenticated registry client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Split an `owner/name` full name.
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// Unauthenticated GET returning a JSON document.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// Enumerates every repository visible to the holder of a token.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn list_repositories(&self, token: &str) -> Result<Vec<RepoRef>>;
}

/// Supplies the registry token, if any.
pub trait TokenSource: Send + Sync {
    fn oauth_token(&self) -> Option<String>;
}

/// A fixed token decided up front (from config or environment).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn oauth_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// An optional collaborator. Code paths that need it call [`Capability::require`]
/// and get [`HubError::MissingCapability`] when nothing was provided.
pub struct Capability<T: ?Sized> {
    name: &'static str,
    inner: Option<Arc<T>>,
}

impl<T: ?Sized> Capability<T> {
    pub fn provided(name: &'static str, inner: Arc<T>) -> Self {
        Self {
            name,
            inner: Some(inner),
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self { name, inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn require(&self) -> Result<&T> {
        self.inner
            .as_deref()
            .ok_or(HubError::MissingCapability(self.name))
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_splits_on_first_slash() {
        let repo = RepoRef::from_full_name("ersilia-os/eos1ax2").unwrap();
        assert_eq!(repo.owner, "ersilia-os");
        assert_eq!(repo.name, "eos1ax2");
        assert!(RepoRef::from_full_name("no-slash").is_none());
    }

    #[test]
    fn missing_capability_names_itself() {
        let cap: Capability<dyn HttpFetcher> = Capability::missing("registry HTTP client");
        assert!(!cap.is_available());
        match cap.require() {
            Err(HubError::MissingCapability(name)) => assert_eq!(name, "registry HTTP client"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
