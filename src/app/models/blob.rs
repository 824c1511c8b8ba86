//! Blob metadata model for archived source files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing entry for one archived blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMetadata {
    /// Container-relative key, `/`-separated
    pub key: String,

    /// Public URL of the blob
    pub url: String,

    pub uploaded_by: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub content_type: String,
    pub size: u64,

    /// Hex-encoded SHA-256 of the stored bytes
    pub sha256: String,

    /// Set on the most recent upload within a listing
    #[serde(default)]
    pub latest_upload: bool,
}

/// Mark the most recent upload in a listing, ties broken by the greater key
pub fn mark_latest_upload(blobs: &mut [BlobMetadata]) {
    for blob in blobs.iter_mut() {
        blob.latest_upload = false;
    }

    if let Some(latest) = blobs
        .iter_mut()
        .max_by(|a, b| (a.uploaded_at, &a.key).cmp(&(b.uploaded_at, &b.key)))
    {
        latest.latest_upload = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn blob(key: &str, uploaded_at: DateTime<Utc>) -> BlobMetadata {
        BlobMetadata {
            key: key.to_string(),
            url: format!("http://localhost/tariffs/{}", key),
            uploaded_by: Some("tester".to_string()),
            uploaded_at,
            content_type: "text/csv".to_string(),
            size: 10,
            sha256: String::new(),
            latest_upload: false,
        }
    }

    #[test]
    fn test_mark_latest_upload() {
        let mut blobs = vec![
            blob("CHINA/a.csv", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            blob("CHINA/b.csv", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            blob("CHINA/c.csv", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
        ];

        mark_latest_upload(&mut blobs);

        let latest: Vec<_> = blobs.iter().filter(|b| b.latest_upload).collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].key, "CHINA/b.csv");
    }

    #[test]
    fn test_mark_latest_upload_tie_uses_key() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut blobs = vec![blob("x/1.csv", at), blob("x/2.csv", at)];

        mark_latest_upload(&mut blobs);

        assert!(!blobs[0].latest_upload);
        assert!(blobs[1].latest_upload);
    }

    #[test]
    fn test_mark_latest_upload_empty() {
        let mut blobs: Vec<BlobMetadata> = Vec::new();
        mark_latest_upload(&mut blobs);
        assert!(blobs.is_empty());
    }
}
