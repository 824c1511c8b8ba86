//! Configuration management and validation.
//!
//! Configuration is layered: compiled defaults, then an optional TOML file,
//! then environment variables prefixed with `TARIFF_` (nested keys separated
//! by `__`, e.g. `TARIFF_QUERY__MAX_PAGE_SIZE=200`).

use crate::constants::{
    APP_DIR_NAME, DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE_NAME, DEFAULT_CONTAINER_NAME,
    DEFAULT_PAGE_SIZE, DEFAULT_SNAPSHOT_FILE_NAME, DEFAULT_UPLOADED_BY, ENV_PREFIX, MAX_PAGE_SIZE,
};
use crate::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blob storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding blob containers
    pub data_dir: PathBuf,

    /// Container that archives source files and the country catalogue
    pub container: String,

    /// Public URL prefix; blob URLs are `{base_url}/{container}/{key}`
    pub base_url: String,

    /// Re-read every stored blob and compare it with the uploaded bytes
    pub verify_uploads: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            container: DEFAULT_CONTAINER_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_uploads: true,
        }
    }
}

/// Tariff repository settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Snapshot file; defaults to `tariffs.json` inside the storage data directory
    pub snapshot_path: Option<PathBuf>,
}

/// Import behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Identity recorded on archived source files
    pub uploaded_by: String,

    /// Archive the raw CSV in blob storage before replacing tariffs
    pub archive_source: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            uploaded_by: DEFAULT_UPLOADED_BY.to_string(),
            archive_source: true,
        }
    }
}

/// Pagination limits for tariff queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Global configuration for the tariff importer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Layered configuration sources, without extracting them
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration
    ///
    /// An explicit file must exist. Without one, the platform config file
    /// (`<config_dir>/tariff-importer/config.toml`) is used when present.
    pub fn load_layered(explicit_file: Option<&Path>) -> Result<Self> {
        let config_file = match explicit_file {
            Some(path) if !path.exists() => {
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        if let Some(path) = &config_file {
            debug!("Loading configuration from {}", path.display());
        }

        let config: Config = Self::figment(config_file.as_deref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.container.trim().is_empty() {
            return Err(Error::configuration("storage.container must not be empty"));
        }
        if self.storage.container.contains(['/', '\\']) {
            return Err(Error::configuration(
                "storage.container must not contain path separators",
            ));
        }
        if self.storage.base_url.trim().is_empty() {
            return Err(Error::configuration("storage.base_url must not be empty"));
        }
        if self.import.uploaded_by.trim().is_empty() {
            return Err(Error::configuration("import.uploaded_by must not be empty"));
        }
        if self.query.default_page_size == 0 {
            return Err(Error::configuration(
                "query.default_page_size must be greater than 0",
            ));
        }
        if self.query.max_page_size == 0 {
            return Err(Error::configuration(
                "query.max_page_size must be greater than 0",
            ));
        }
        if self.query.default_page_size > self.query.max_page_size {
            return Err(Error::configuration(format!(
                "query.default_page_size ({}) exceeds query.max_page_size ({})",
                self.query.default_page_size, self.query.max_page_size
            )));
        }
        Ok(())
    }

    /// Effective repository snapshot path
    pub fn snapshot_path(&self) -> PathBuf {
        self.repository
            .snapshot_path
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join(DEFAULT_SNAPSHOT_FILE_NAME))
    }

    /// Use a different data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = data_dir.into();
        self
    }

    pub fn with_uploaded_by(mut self, uploaded_by: impl Into<String>) -> Self {
        self.import.uploaded_by = uploaded_by.into();
        self
    }

    /// Disable archiving of source files
    pub fn without_archive(mut self) -> Self {
        self.import.archive_source = false;
        self
    }
}

/// Platform configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_CONFIG_FILE_NAME))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
