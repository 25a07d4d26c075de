use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HubError, Result};

/// Environment variable that relocates the base directory.
pub const HOME_ENV: &str = "MODELHUB_HOME";

/// Environment variable consulted when no registry token is configured.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote registry settings
    #[serde(default)]
    pub hub: HubConfig,

    /// Local bundle cache settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Serving daemon settings
    #[serde(default)]
    pub serving: ServingConfig,

    /// Session file settings
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Organization that owns the model repositories
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Base URL of the registry API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL serving raw repository files (model cards)
    #[serde(default = "default_cards_base")]
    pub cards_base: String,

    /// Token for the authenticated listing path
    #[serde(default)]
    pub github_token: Option<String>,

    /// Drop registry models that have no card
    #[serde(default = "default_true")]
    pub skip_missing_cards: bool,

    /// Curated spreadsheet of models
    #[serde(default = "default_spreadsheet_url")]
    pub spreadsheet_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Directory holding installed model bundles (default: ~/.config/modelhub/bundles/)
    #[serde(default = "default_bundles_dir")]
    pub bundles_dir: PathBuf,

    /// Drop local bundles that have no card
    #[serde(default)]
    pub skip_missing_cards: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingConfig {
    /// Executable invoked as `<tool> list`
    #[serde(default = "default_tool")]
    pub tool: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file (default: ~/.config/modelhub/session.json)
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

fn default_organization() -> String {
    "ersilia-os".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_cards_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_spreadsheet_url() -> String {
    "https://docs.google.com/spreadsheets/d/1WE-rKey0WAFktZ_ODNFLvHm2lPe27Xew02tS3EEwi28/edit#gid=1723939193"
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_tool() -> String {
    "bentoml".to_string()
}

fn default_bundles_dir() -> PathBuf {
    Config::base_dir()
        .map(|p| p.join("bundles"))
        .unwrap_or_else(|_| PathBuf::from("~/.config/modelhub/bundles"))
}

fn default_session_path() -> PathBuf {
    Config::base_dir()
        .map(|p| p.join("session.json"))
        .unwrap_or_else(|_| PathBuf::from("~/.config/modelhub/session.json"))
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            api_base: default_api_base(),
            cards_base: default_cards_base(),
            github_token: None,
            skip_missing_cards: default_true(),
            spreadsheet_url: default_spreadsheet_url(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            bundles_dir: default_bundles_dir(),
            skip_missing_cards: false,
        }
    }
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Config {
    /// Get the base directory: $MODELHUB_HOME or ~/.config/modelhub/
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("USERPROFILE").map(PathBuf::from))
            .map_err(|_| HubError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".config").join("modelhub"))
    }

    /// Load config from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| HubError::Config(e.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| HubError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path: ~/.config/modelhub/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Registry token from the config file, or from $GITHUB_TOKEN
    pub fn github_token(&self) -> Option<String> {
        self.hub
            .github_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "hub.organization" => Ok(self.hub.organization.clone()),
            "hub.api_base" => Ok(self.hub.api_base.clone()),
            "hub.cards_base" => Ok(self.hub.cards_base.clone()),
            "hub.github_token" => Ok(self
                .hub
                .github_token
                .as_ref()
                .map(|_| "***".to_string())
                .unwrap_or_default()),
            "hub.skip_missing_cards" => Ok(self.hub.skip_missing_cards.to_string()),
            "hub.spreadsheet_url" => Ok(self.hub.spreadsheet_url.clone()),
            "local.bundles_dir" => Ok(self.local.bundles_dir.display().to_string()),
            "local.skip_missing_cards" => Ok(self.local.skip_missing_cards.to_string()),
            "serving.tool" => Ok(self.serving.tool.clone()),
            "session.path" => Ok(self.session.path.display().to_string()),
            _ => Err(HubError::Config(format!("unknown config key: {}", key))),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "hub.organization" => self.hub.organization = value.to_string(),
            "hub.api_base" => self.hub.api_base = value.to_string(),
            "hub.cards_base" => self.hub.cards_base = value.to_string(),
            "hub.github_token" => {
                self.hub.github_token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "hub.skip_missing_cards" => self.hub.skip_missing_cards = parse_bool(key, value)?,
            "hub.spreadsheet_url" => self.hub.spreadsheet_url = value.to_string(),
            "local.bundles_dir" => self.local.bundles_dir = value.into(),
            "local.skip_missing_cards" => self.local.skip_missing_cards = parse_bool(key, value)?,
            "serving.tool" => self.serving.tool = value.to_string(),
            "session.path" => self.session.path = value.into(),
            _ => return Err(HubError::Config(format!("unknown config key: {}", key))),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| HubError::Config(format!("{} expects true or false, got {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.hub.organization, "ersilia-os");
        assert_eq!(config.serving.tool, "bentoml");
        assert!(config.hub.skip_missing_cards);
        assert!(!config.local.skip_missing_cards);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[serving]\ntool = \"/opt/bin/bentoml\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.serving.tool, "/opt/bin/bentoml");
        assert_eq!(config.hub.api_base, "https://api.github.com");
    }

    #[test]
    fn set_then_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_value("hub.organization", "acme-models").unwrap();
        config.set_value("local.skip_missing_cards", "true").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.get_value("hub.organization").unwrap(), "acme-models");
        assert!(loaded.local.skip_missing_cards);
    }

    #[test]
    fn token_is_masked_and_bad_values_rejected() {
        let mut config = Config::default();
        config.set_value("hub.github_token", "secret").unwrap();
        assert_eq!(config.get_value("hub.github_token").unwrap(), "***");

        assert!(config.set_value("hub.skip_missing_cards", "maybe").is_err());
        assert!(config.get_value("nope.key").is_err());
    }
}
