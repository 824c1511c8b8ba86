//! Shared components for CLI commands
//!
//! This module contains logging set-up, configuration loading, service wiring
//! and output helpers used across the command implementations.

use crate::app::services::blob_storage::{self, BlobStorage, FilesystemBlobStorage};
use crate::app::services::importer::TariffImporter;
use crate::app::services::query::TariffQueryService;
use crate::app::services::tariff_repository::InMemoryTariffRepository;
use crate::cli::args::Args;
use crate::config::Config;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Command statistics for reporting
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Number of files imported
    pub files_processed: usize,
    /// Number of files that failed to import
    pub files_failed: usize,
    /// Tariffs saved across all imports
    pub tariffs_saved: usize,
    /// Total processing time
    pub processing_time: Duration,
}

impl CommandStats {
    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }
}

/// Set up structured logging
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tariff_importer={}", log_level)));

    // try_init: a second subscriber (e.g. in tests) is not an error
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration using layered approach (defaults -> file -> env)
pub fn load_configuration(args: &Args) -> Result<Config> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, using default location and environment"),
    }

    Config::load_layered(args.config_file.as_deref())
}

/// Repository, blob storage and the services built on them
pub struct Services {
    pub config: Config,
    pub repository: Arc<InMemoryTariffRepository>,
    pub storage: Arc<FilesystemBlobStorage>,
}

impl Services {
    /// Open storage and the repository snapshot described by the configuration
    ///
    /// The blob container is created on first use and the repository learns
    /// the canonical countries from its catalogue.
    pub async fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(
            FilesystemBlobStorage::from_config(&config.storage)
                .with_owner(config.import.uploaded_by.clone()),
        );
        blob_storage::initialize(storage.as_ref()).await?;

        let repository = Arc::new(
            InMemoryTariffRepository::load_snapshot(&config.snapshot_path()).await?,
        );

        match blob_storage::load_countries(storage.as_ref()).await {
            Ok(countries) => {
                debug!("Loaded {} countries from catalogue", countries.len());
                repository.register_countries(&countries).await;
            }
            Err(Error::BlobNotFound { .. }) => {
                warn!("Country catalogue missing from blob storage");
            }
            Err(e) => return Err(e),
        }

        Ok(Self {
            config,
            repository,
            storage,
        })
    }

    pub fn importer(&self) -> TariffImporter {
        TariffImporter::from_config(
            &self.config.import,
            self.repository.clone(),
            self.storage.clone(),
        )
    }

    pub fn query(&self) -> TariffQueryService {
        TariffQueryService::new(self.repository.clone(), &self.config.query)
    }

    pub fn blob_storage(&self) -> &dyn BlobStorage {
        self.storage.as_ref()
    }

    /// Write the repository snapshot back to disk
    pub async fn persist(&self) -> Result<()> {
        self.repository
            .write_snapshot(&self.config.snapshot_path())
            .await
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization("Failed to encode command output", e))?;
    println!("{}", json);
    Ok(())
}

/// Write bytes to a file, or to stdout when no file is given
pub fn write_output(content: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
            info!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|_| stdout.flush())
                .map_err(|e| Error::io("Failed to write to stdout", e))?;
        }
    }
    Ok(())
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
