//! Model catalog aggregated from the registry, the local bundle cache and the
//! serving daemon.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cards::{BundleCards, CardLookup, ChainedCards, RemoteCards};
use crate::config::Config;
use crate::error::{HubError, Result};
use crate::identifier::is_model_id;
use crate::sources::{
    parse_listing, AuthClient, Capability, GitHubClient, HttpFetcher, ServingDaemon, ServingTool,
    StaticToken, TokenSource,
};
use crate::table::{
    CatalogOutput, CatalogTable, ModelEntry, OutputMode, PlainTextRenderer, TableRenderer,
};

/// What to do with a model whose card lookup comes back empty.
///
/// The registry listing skips such models while the local listing keeps them
/// with an empty title. Both are configurable until that difference is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCardPolicy {
    Skip,
    Include,
}

impl MissingCardPolicy {
    pub fn from_skip(skip: bool) -> Self {
        if skip {
            MissingCardPolicy::Skip
        } else {
            MissingCardPolicy::Include
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub organization: String,
    pub api_base: String,
    pub bundles_dir: PathBuf,
    pub spreadsheet_url: String,
    pub output: OutputMode,
    pub hub_missing_cards: MissingCardPolicy,
    pub local_missing_cards: MissingCardPolicy,
}

impl CatalogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            organization: config.hub.organization.clone(),
            api_base: config.hub.api_base.trim_end_matches('/').to_string(),
            bundles_dir: config.local.bundles_dir.clone(),
            spreadsheet_url: config.hub.spreadsheet_url.clone(),
            output: OutputMode::default(),
            hub_missing_cards: MissingCardPolicy::from_skip(config.hub.skip_missing_cards),
            local_missing_cards: MissingCardPolicy::from_skip(config.local.skip_missing_cards),
        }
    }
}

pub struct ModelCatalog {
    settings: CatalogSettings,
    cards: Arc<dyn CardLookup>,
    tokens: Arc<dyn TokenSource>,
    serving: Arc<dyn ServingDaemon>,
    http: Capability<dyn HttpFetcher>,
    auth: Capability<dyn AuthClient>,
    renderer: Capability<dyn TableRenderer>,
}

impl ModelCatalog {
    /// A catalog with no token, no registry clients, the plain-text renderer
    /// and `bentoml` as the serving tool.
    pub fn new(settings: CatalogSettings, cards: Arc<dyn CardLookup>) -> Self {
        let renderer: Arc<dyn TableRenderer> = Arc::new(PlainTextRenderer);
        Self {
            settings,
            cards,
            tokens: Arc::new(StaticToken::default()),
            serving: Arc::new(ServingTool::new("bentoml")),
            http: Capability::missing("registry HTTP client"),
            auth: Capability::missing("authenticated registry client"),
            renderer: Capability::provided("table renderer", renderer),
        }
    }

    /// Wire every collaborator from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = CatalogSettings::from_config(config);
        let github = Arc::new(GitHubClient::new(&config.hub.api_base)?);

        let lookups: Vec<Arc<dyn CardLookup>> = vec![
            Arc::new(BundleCards::new(settings.bundles_dir.clone())),
            Arc::new(RemoteCards::new(
                github.clone(),
                &config.hub.cards_base,
                &config.hub.organization,
            )),
        ];
        let cards = ChainedCards::new(lookups);

        Ok(Self::new(settings, Arc::new(cards))
            .with_tokens(Arc::new(StaticToken(config.github_token())))
            .with_http(github.clone())
            .with_auth(github)
            .with_serving(Arc::new(ServingTool::new(config.serving.tool.clone()))))
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_http(mut self, http: Arc<dyn HttpFetcher>) -> Self {
        self.http = Capability::provided("registry HTTP client", http);
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthClient>) -> Self {
        self.auth = Capability::provided("authenticated registry client", auth);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TableRenderer>) -> Self {
        self.renderer = Capability::provided("table renderer", renderer);
        self
    }

    pub fn without_renderer(mut self) -> Self {
        self.renderer = Capability::missing("table renderer");
        self
    }

    pub fn with_serving(mut self, serving: Arc<dyn ServingDaemon>) -> Self {
        self.serving = serving;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.settings.output = output;
        self
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Curated spreadsheet of models.
    pub fn spreadsheet(&self) -> &str {
        &self.settings.spreadsheet_url
    }

    /// Model identifiers among the organization's repositories.
    pub async fn github(&self) -> Result<Vec<String>> {
        let org = &self.settings.organization;

        let repos = match self.tokens.oauth_token() {
            Some(token) => {
                let client = self.auth.require()?;
                debug!("Listing repositories of the authenticated account");
                client
                    .list_repositories(&token)
                    .await?
                    .into_iter()
                    .filter(|repo| &repo.owner == org)
                    .map(|repo| repo.name)
                    .collect::<Vec<_>>()
            }
            None => {
                let fetcher = self.http.require()?;
                let url = format!("{}/users/{}/repos", self.settings.api_base, org);
                repo_names(fetcher.get_json(&url).await?)?
            }
        };

        let models: Vec<String> = repos.into_iter().filter(|name| is_model_id(name)).collect();
        info!("Found {} model repositories under {}", models.len(), org);
        Ok(models)
    }

    /// Models published in the registry, with their card titles.
    pub async fn hub(&self) -> Result<CatalogOutput> {
        let ids = self.github().await?;
        let entries = self
            .titled_entries(ids, self.settings.hub_missing_cards)
            .await?;
        self.finish(CatalogTable::from_models(entries))
    }

    /// Models installed in the local bundle directory.
    pub async fn local(&self) -> Result<CatalogOutput> {
        let ids = self.bundle_ids()?;
        let entries = self
            .titled_entries(ids, self.settings.local_missing_cards)
            .await?;
        self.finish(CatalogTable::from_models(entries))
    }

    /// Models running under the serving daemon. `None` when nothing is served.
    pub async fn bentoml(&self) -> Result<Option<CatalogOutput>> {
        let stdout = self.serving.list_output().await?;
        match parse_listing(&stdout)? {
            Some(entries) => self.finish(CatalogTable::from_services(entries)).map(Some),
            None => Ok(None),
        }
    }

    /// Direct children of the bundle directory, in listing order.
    pub fn bundle_ids(&self) -> Result<Vec<String>> {
        let dir = &self.settings.bundles_dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Bundle directory {} does not exist", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => ids.push(name),
                Err(name) => warn!("Skipping non UTF-8 bundle name {:?}", name),
            }
        }
        Ok(ids)
    }

    async fn titled_entries(
        &self,
        ids: Vec<String>,
        missing: MissingCardPolicy,
    ) -> Result<Vec<ModelEntry>> {
        let mut entries = Vec::with_capacity(ids.len());
        for model_id in ids {
            let title = match self.cards.get(&model_id).await? {
                Some(card) => card.title,
                None if missing == MissingCardPolicy::Skip => {
                    debug!("Skipping {}: no card", model_id);
                    continue;
                }
                None => String::new(),
            };
            entries.push(ModelEntry { model_id, title });
        }
        Ok(entries)
    }

    fn finish(&self, table: CatalogTable) -> Result<CatalogOutput> {
        match self.settings.output {
            OutputMode::Table => Ok(CatalogOutput::Table(table)),
            OutputMode::Text => {
                let renderer = self.renderer.require()?;
                Ok(CatalogOutput::Text {
                    text: renderer.render(&table),
                    rows: table.len(),
                })
            }
        }
    }
}

/// `name` of every element of a repository-list reply.
fn repo_names(value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(HubError::Parse(
            "repository listing is not a JSON array".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| {
            item.get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| HubError::Parse("repository entry without a name".to_string()))
        })
        .collect()
}
