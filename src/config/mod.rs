//! Configuration for support-desk
//!
//! Settings are layered, later sources winning:
//! 1. built-in defaults
//! 2. a YAML file (`--config`, else `config.yaml` in the platform config dir)
//! 3. `SUPPORT_DESK__<SECTION>__<KEY>` environment variables,
//!    e.g. `SUPPORT_DESK__STORAGE__KEY=tickets`

use crate::core::GCP_SERVICES;
use crate::error::{DeskError, Result};
use crate::storage::DEFAULT_STORAGE_KEY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SUPPORT_DESK";
const ENV_SEPARATOR: &str = "__";
const FALLBACK_DATA_DIR: &str = ".support-desk";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub notifications: NotificationConfig,
    pub desk: DeskConfig,
}

/// Where and how tickets are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Directory for the file backend; the platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Key holding the ticket collection
    pub key: String,
    /// Start an empty store from the example tickets
    pub seed_sample_data: bool,
    pub id_strategy: IdStrategy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            data_dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            seed_sample_data: false,
            id_strategy: IdStrategy::Sequential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    File,
    /// Nothing outlives the process
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    Sequential,
    Random,
}

/// Desktop notification on ticket creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Program and leading arguments, e.g. `notify-send -a support-desk`
    pub command: Option<String>,
}

/// Suggestion lists shown by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub services: Vec<String>,
    pub team: Vec<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            services: GCP_SERVICES.iter().map(ToString::to_string).collect(),
            team: vec![
                "support@gcp-team.com".to_string(),
                "devops@gcp-team.com".to_string(),
                "iam@gcp-team.com".to_string(),
                "network@gcp-team.com".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load from `path` (required when given) or the default location
    /// (optional), then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading environment variables from `env`
    /// instead of the process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        let file = path.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "reading configuration file");
            builder = builder.add_source(config::File::from(file).required(path.is_some()));
        }

        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env);

        let config = builder.add_source(environment).build()?.try_deserialize()?;
        Ok(config)
    }

    /// `config.yaml` in the platform config directory
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "support-desk").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Directory used by the file backend
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| ProjectDirs::from("", "", "support-desk").map(|d| d.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DeskError::SerializationError(format!("Failed to serialize config: {e}")))
    }

    /// Write as YAML to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
