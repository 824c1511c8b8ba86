//! Blob storage for archived tariff source files
//!
//! Source CSV files are archived under `{countryCode}/...` keys next to the
//! `countries.json` catalogue. Every stored blob carries metadata recording
//! who uploaded it, when, and a SHA-256 of its content; listings flag the most
//! recent upload so callers can serve "the latest file for a country".

pub mod filesystem;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use tracing::info;

use crate::app::models::{BlobMetadata, Country, CountryList};
use crate::constants::COUNTRIES_BLOB_KEY;
use crate::{Error, Result};

pub use filesystem::FilesystemBlobStorage;

/// Country catalogue seeded into a newly created container
pub const COUNTRIES_FIXTURE: &str = include_str!("../../../../fixtures/countries.json");

/// Storage container for archived blobs
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn container_exists(&self) -> Result<bool>;

    /// Create the container and seed it with the country catalogue
    async fn create_container(&self) -> Result<()>;

    /// Store a blob with its metadata and verify the stored bytes
    async fn save(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
        uploaded_by: &str,
    ) -> Result<BlobMetadata>;

    /// List blobs whose key starts with `prefix`, ordered by key
    ///
    /// Exactly one entry of a non-empty listing has `latest_upload` set.
    async fn list(&self, prefix: &str) -> Result<Vec<BlobMetadata>>;

    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;

    /// Most recent upload under a prefix together with its content
    async fn fetch_latest(&self, prefix: &str) -> Result<(BlobMetadata, Vec<u8>)> {
        let latest = self
            .list(prefix)
            .await?
            .into_iter()
            .find(|blob| blob.latest_upload)
            .ok_or_else(|| Error::blob_not_found(format!("{}*", prefix)))?;

        let content = self.fetch(&latest.key).await?;
        Ok((latest, content))
    }
}

/// Create the container if it does not exist yet
///
/// Returns `true` when the container was created by this call.
pub async fn initialize(storage: &dyn BlobStorage) -> Result<bool> {
    if storage.container_exists().await? {
        return Ok(false);
    }

    storage.create_container().await?;
    info!("Created blob container");
    Ok(true)
}

/// Read the country catalogue from storage
pub async fn load_countries(storage: &dyn BlobStorage) -> Result<Vec<Country>> {
    let content = storage.fetch(COUNTRIES_BLOB_KEY).await?;
    let list: CountryList = serde_json::from_slice(&content)
        .map_err(|e| Error::serialization(format!("Invalid {}", COUNTRIES_BLOB_KEY), e))?;
    Ok(list.countries)
}

/// Check that a key is a safe, relative, `/`-separated path
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_blob_key(key, "key is empty"));
    }
    if key.contains('\\') {
        return Err(Error::invalid_blob_key(key, "backslashes are not allowed"));
    }
    if key.starts_with('/') {
        return Err(Error::invalid_blob_key(key, "absolute keys are not allowed"));
    }

    for segment in key.split('/') {
        match segment {
            "" => return Err(Error::invalid_blob_key(key, "empty path segment")),
            "." | ".." => {
                return Err(Error::invalid_blob_key(
                    key,
                    format!("'{}' segments are not allowed", segment),
                ));
            }
            _ => {}
        }
    }

    if key.split('/').next() == Some(crate::constants::METADATA_DIR_NAME) {
        return Err(Error::invalid_blob_key(key, "reserved metadata prefix"));
    }

    Ok(())
}
