//! Model card lookups keyed by model identifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::{HubError, Result};
use crate::sources::HttpFetcher;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelCard {
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelCard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }
}

#[async_trait]
pub trait CardLookup: Send + Sync {
    /// `Ok(None)` means the model has no card.
    async fn get(&self, model_id: &str) -> Result<Option<ModelCard>>;
}

/// Cards published as `metadata.json` in each model repository.
pub struct RemoteCards {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    organization: String,
}

impl RemoteCards {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: &str, organization: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            organization: organization.to_string(),
        }
    }

    pub fn card_url(&self, model_id: &str) -> String {
        format!(
            "{}/{}/{}/main/metadata.json",
            self.base_url, self.organization, model_id
        )
    }
}

#[async_trait]
impl CardLookup for RemoteCards {
    async fn get(&self, model_id: &str) -> Result<Option<ModelCard>> {
        let url = self.card_url(model_id);
        match self.fetcher.get_json(&url).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_not_found() => {
                debug!("No card for {}", model_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Cards stored next to installed bundles as `<bundles_dir>/<model_id>/card.json`.
pub struct BundleCards {
    bundles_dir: PathBuf,
}

impl BundleCards {
    pub fn new(bundles_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundles_dir: bundles_dir.into(),
        }
    }
}

#[async_trait]
impl CardLookup for BundleCards {
    async fn get(&self, model_id: &str) -> Result<Option<ModelCard>> {
        let bundle = self.bundles_dir.join(model_id);
        if !bundle.is_dir() {
            // stray files in the bundles directory have no card
            return Ok(None);
        }
        let path = bundle.join("card.json");
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| HubError::Parse(format!("{}: {}", path.display(), e)))
    }
}

/// Tries each lookup in turn; the first card found wins.
pub struct ChainedCards {
    lookups: Vec<Arc<dyn CardLookup>>,
}

impl ChainedCards {
    pub fn new(lookups: Vec<Arc<dyn CardLookup>>) -> Self {
        Self { lookups }
    }
}

#[async_trait]
impl CardLookup for ChainedCards {
    async fn get(&self, model_id: &str) -> Result<Option<ModelCard>> {
        for lookup in &self.lookups {
            if let Some(card) = lookup.get(model_id).await? {
                return Ok(Some(card));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCards {
    cards: HashMap<String, ModelCard>,
}

impl MemoryCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, model_id: &str, title: &str) -> Self {
        self.insert(model_id, ModelCard::titled(title));
        self
    }

    pub fn insert(&mut self, model_id: &str, card: ModelCard) {
        self.cards.insert(model_id.to_string(), card);
    }
}

#[async_trait]
impl CardLookup for MemoryCards {
    async fn get(&self, model_id: &str) -> Result<Option<ModelCard>> {
        Ok(self.cards.get(model_id).cloned())
    }
}
