//! Configuration file handling for upload-form

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use upload_client::TimeoutsConfig;
use upload_core::HandlerSettings;

const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default server URL
    pub server: Option<String>,
    /// Path of the identifier store
    pub store: Option<PathBuf>,
    /// Client timeouts; unset means wait as long as the upload takes
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Form contract overrides
    #[serde(default)]
    pub form: Option<HandlerSettings>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("upload-form");

        Ok(config_dir.join("config.toml"))
    }

    /// Get the default identifier store path
    pub fn default_store_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("upload-form");

        Ok(data_dir.join("storage.json"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        server: Option<&str>,
        store: Option<&Path>,
    ) -> Result<MergedConfig> {
        let store = match store.map(Path::to_path_buf).or_else(|| self.store.clone()) {
            Some(path) => path,
            None => Self::default_store_path()?,
        };

        Ok(MergedConfig {
            server: server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            store,
            timeouts: self.timeouts.clone(),
            form: self.form.clone().unwrap_or_default(),
        })
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub server: String,
    pub store: PathBuf,
    pub timeouts: TimeoutsConfig,
    pub form: HandlerSettings,
}
