//! Blob storage backed by a local directory
//!
//! Layout under `{data_dir}/{container}`:
//!
//! ```text
//! countries.json
//! CHINA/tariffs-20240101T120000000Z.csv
//! .metadata/CHINA/tariffs-20240101T120000000Z.csv.json
//! .metadata/.staging/<sha256 of key>.partial
//! ```
//!
//! Blobs are written to the staging area and renamed into place, so a listing
//! never observes a half-written file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{BlobStorage, COUNTRIES_FIXTURE, validate_key};
use crate::app::models::BlobMetadata;
use crate::app::models::blob::mark_latest_upload;
use crate::config::StorageConfig;
use crate::constants::{
    COUNTRIES_BLOB_KEY, CONTENT_TYPE_JSON, DEFAULT_UPLOADED_BY, METADATA_DIR_NAME,
    UPLOADED_BY_METADATA_KEY,
};
use crate::{Error, Result};

const STAGING_DIR_NAME: &str = ".staging";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Sidecar metadata stored next to each blob
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMetadata {
    uploaded_by: Option<String>,
    content_type: String,
    uploaded_at: DateTime<Utc>,
    size: u64,
    sha256: String,
}

/// Filesystem implementation of [`BlobStorage`]
#[derive(Debug, Clone)]
pub struct FilesystemBlobStorage {
    root: PathBuf,
    container: String,
    base_url: String,
    verify_uploads: bool,
    owner: String,
}

impl FilesystemBlobStorage {
    pub fn new(
        data_dir: impl AsRef<Path>,
        container: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let container = container.into();
        Self {
            root: data_dir.as_ref().join(&container),
            container,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            verify_uploads: true,
            owner: DEFAULT_UPLOADED_BY.to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir, &config.container, &config.base_url)
            .with_verification(config.verify_uploads)
    }

    /// Enable or disable the read-back check after each save
    pub fn with_verification(mut self, verify_uploads: bool) -> Self {
        self.verify_uploads = verify_uploads;
        self
    }

    /// Identity recorded as uploader of the seeded catalogue
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Directory holding the container's blobs
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.container, key)
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn metadata_path(&self, key: &str) -> PathBuf {
        let mut path = self.root.join(METADATA_DIR_NAME);
        for segment in key.split('/') {
            path.push(segment);
        }
        let mut file_name = path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".json");
        path.set_file_name(file_name);
        path
    }

    fn metadata_from(&self, key: String, stored: StoredMetadata) -> BlobMetadata {
        BlobMetadata {
            url: self.url_for(&key),
            key,
            uploaded_by: stored.uploaded_by,
            uploaded_at: stored.uploaded_at,
            content_type: stored.content_type,
            size: stored.size,
            sha256: stored.sha256,
            latest_upload: false,
        }
    }

    async fn write_atomically(&self, key: &str, target: &Path, content: &[u8]) -> Result<()> {
        let staging_dir = self.root.join(METADATA_DIR_NAME).join(STAGING_DIR_NAME);
        create_dir(&staging_dir).await?;
        if let Some(parent) = target.parent() {
            create_dir(parent).await?;
        }

        let partial = staging_dir.join(format!("{}.partial", sha256_hex(key.as_bytes())));
        tokio::fs::write(&partial, content)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", partial.display()), e))?;
        tokio::fs::rename(&partial, target)
            .await
            .map_err(|e| Error::io(format!("Failed to move blob to {}", target.display()), e))
    }

    async fn verify_stored(&self, key: &str, path: &Path, expected: &[u8]) -> Result<()> {
        let stored = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read back {}", path.display()), e))?;

        if stored != expected {
            return Err(Error::blob_integrity(
                key,
                format!(
                    "stored {} bytes do not match the {} uploaded bytes",
                    stored.len(),
                    expected.len()
                ),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStorage for FilesystemBlobStorage {
    async fn container_exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.root)
            .await
            .map_err(|e| Error::io(format!("Failed to check {}", self.root.display()), e))
    }

    async fn create_container(&self) -> Result<()> {
        create_dir(&self.root).await?;
        self.save(
            COUNTRIES_BLOB_KEY,
            COUNTRIES_FIXTURE.as_bytes(),
            CONTENT_TYPE_JSON,
            &self.owner,
        )
        .await?;

        info!(
            "Created container '{}' at {}",
            self.container,
            self.root.display()
        );
        Ok(())
    }

    async fn save(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
        uploaded_by: &str,
    ) -> Result<BlobMetadata> {
        validate_key(key)?;

        let digest = sha256_hex(content);
        let path = self.blob_path(key);
        self.write_atomically(key, &path, content).await?;

        if self.verify_uploads {
            self.verify_stored(key, &path, content).await?;
        }

        let stored = StoredMetadata {
            uploaded_by: Some(uploaded_by.to_string()),
            content_type: content_type.to_string(),
            uploaded_at: Utc::now(),
            size: content.len() as u64,
            sha256: digest,
        };
        let json = serde_json::to_vec_pretty(&stored).map_err(|e| {
            Error::serialization(format!("Failed to encode metadata for {}", key), e)
        })?;
        let metadata_path = self.metadata_path(key);
        if let Some(parent) = metadata_path.parent() {
            create_dir(parent).await?;
        }
        tokio::fs::write(&metadata_path, json)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", metadata_path.display()), e))?;

        debug!(
            "Saved blob {} ({} bytes, {}={})",
            key,
            stored.size,
            UPLOADED_BY_METADATA_KEY,
            uploaded_by
        );
        Ok(self.metadata_from(key.to_string(), stored))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobMetadata>> {
        let storage = self.clone();
        let prefix = prefix.to_string();

        let mut blobs = tokio::task::spawn_blocking(move || storage.scan(&prefix))
            .await
            .map_err(|e| Error::io("Blob listing task failed", std::io::Error::other(e)))??;

        blobs.sort_by(|a, b| a.key.cmp(&b.key));
        mark_latest_upload(&mut blobs);
        Ok(blobs)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;
        let path = self.blob_path(key);

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::blob_not_found(key)),
            Err(e) => Err(Error::io(format!("Failed to read {}", path.display()), e)),
        }
    }
}

impl FilesystemBlobStorage {
    /// Walk the container and collect metadata for keys matching `prefix`
    fn scan(&self, prefix: &str) -> Result<Vec<BlobMetadata>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut blobs = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.depth() != 1 || entry.file_name() != METADATA_DIR_NAME);

        for entry in walker {
            let entry = entry.map_err(|e| {
                Error::io(
                    format!("Failed to scan {}", self.root.display()),
                    std::io::Error::other(e),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(key) = relative_key(&self.root, entry.path()) else {
                warn!("Skipping non UTF-8 blob path {}", entry.path().display());
                continue;
            };
            if !key.starts_with(prefix) {
                continue;
            }

            let stored = self.read_stored_metadata(&key, entry.path())?;
            blobs.push(self.metadata_from(key, stored));
        }

        Ok(blobs)
    }

    /// Sidecar metadata, or metadata derived from the file when the sidecar is missing
    fn read_stored_metadata(&self, key: &str, blob_path: &Path) -> Result<StoredMetadata> {
        let metadata_path = self.metadata_path(key);
        match std::fs::read_to_string(&metadata_path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                Error::serialization(format!("Invalid metadata for blob {}", key), e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No metadata sidecar for {}, deriving from file", key);
                let content = std::fs::read(blob_path)
                    .map_err(|e| Error::io(format!("Failed to read {}", blob_path.display()), e))?;
                let modified = std::fs::metadata(blob_path)
                    .and_then(|m| m.modified())
                    .map_err(|e| Error::io(format!("Failed to stat {}", blob_path.display()), e))?;

                Ok(StoredMetadata {
                    uploaded_by: None,
                    content_type: FALLBACK_CONTENT_TYPE.to_string(),
                    uploaded_at: DateTime::<Utc>::from(modified),
                    size: content.len() as u64,
                    sha256: sha256_hex(&content),
                })
            }
            Err(e) => Err(Error::io(
                format!("Failed to read {}", metadata_path.display()),
                e,
            )),
        }
    }
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect();
    segments.map(|segments| segments.join("/"))
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io(format!("Failed to create directory {}", path.display()), e))
}

pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
