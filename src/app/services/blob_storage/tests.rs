use super::*;
use crate::constants::{CONTENT_TYPE_CSV, COUNTRIES_BLOB_KEY};
use tempfile::TempDir;

fn create_test_storage() -> (TempDir, FilesystemBlobStorage) {
    let temp_dir = TempDir::new().unwrap();
    let storage =
        FilesystemBlobStorage::new(temp_dir.path(), "tariffs", "http://localhost:8080/blobs/");
    (temp_dir, storage)
}

#[test]
fn test_validate_key() {
    assert!(validate_key("CHINA/tariffs-20240101T000000000Z.csv").is_ok());
    assert!(validate_key("countries.json").is_ok());

    for key in [
        "",
        "/etc/passwd",
        "../outside.csv",
        "CHINA/../../x",
        "CHINA//x.csv",
        "CHINA/./x.csv",
        "CHINA\\x.csv",
        "CHINA/",
        ".metadata/countries.json.json",
    ] {
        assert!(
            matches!(validate_key(key), Err(Error::InvalidBlobKey { .. })),
            "key {:?} should be rejected",
            key
        );
    }
}

#[tokio::test]
async fn test_save_and_fetch() {
    let (_temp_dir, storage) = create_test_storage();
    let content = b"ID,TL\n1,0101\n";

    let metadata = storage
        .save("CHINA/tariffs-1.csv", content, CONTENT_TYPE_CSV, "analyst@example.gov")
        .await
        .unwrap();

    assert_eq!(metadata.key, "CHINA/tariffs-1.csv");
    assert_eq!(metadata.url, "http://localhost:8080/blobs/tariffs/CHINA/tariffs-1.csv");
    assert_eq!(metadata.uploaded_by.as_deref(), Some("analyst@example.gov"));
    assert_eq!(metadata.content_type, "text/csv");
    assert_eq!(metadata.size, content.len() as u64);
    assert_eq!(metadata.sha256, filesystem::sha256_hex(content));

    let fetched = storage.fetch("CHINA/tariffs-1.csv").await.unwrap();
    assert_eq!(fetched, content);
}

#[tokio::test]
async fn test_save_overwrites_existing_key() {
    let (_temp_dir, storage) = create_test_storage();

    storage.save("a.csv", b"first", CONTENT_TYPE_CSV, "a").await.unwrap();
    storage.save("a.csv", b"second", CONTENT_TYPE_CSV, "b").await.unwrap();

    assert_eq!(storage.fetch("a.csv").await.unwrap(), b"second");
    let blobs = storage.list("a.csv").await.unwrap();
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].uploaded_by.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_fetch_unknown_key() {
    let (_temp_dir, storage) = create_test_storage();

    let result = storage.fetch("CHINA/missing.csv").await;
    assert!(matches!(result, Err(Error::BlobNotFound { .. })));

    let result = storage.fetch("../secrets").await;
    assert!(matches!(result, Err(Error::InvalidBlobKey { .. })));
}

#[tokio::test]
async fn test_list_marks_single_latest_upload() {
    let (_temp_dir, storage) = create_test_storage();

    storage.save("KOREA/tariffs-3.csv", b"k", CONTENT_TYPE_CSV, "x").await.unwrap();
    storage.save("CHINA/tariffs-1.csv", b"1", CONTENT_TYPE_CSV, "x").await.unwrap();
    storage.save("CHINA/tariffs-2.csv", b"2", CONTENT_TYPE_CSV, "x").await.unwrap();

    let blobs = storage.list("CHINA/").await.unwrap();
    let keys: Vec<&str> = blobs.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["CHINA/tariffs-1.csv", "CHINA/tariffs-2.csv"]);
    assert_eq!(blobs.iter().filter(|b| b.latest_upload).count(), 1);
    assert!(blobs[1].latest_upload);

    let everything = storage.list("").await.unwrap();
    assert_eq!(everything.len(), 3);
    assert!(everything.iter().all(|b| !b.key.starts_with(".metadata")));

    assert!(storage.list("PERU/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_missing_container_is_empty() {
    let (_temp_dir, storage) = create_test_storage();

    assert!(!storage.container_exists().await.unwrap());
    assert!(storage.list("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_derives_metadata_without_sidecar() {
    let (_temp_dir, storage) = create_test_storage();
    std::fs::create_dir_all(storage.root().join("PERU")).unwrap();
    std::fs::write(storage.root().join("PERU").join("manual.csv"), b"ID\n1\n").unwrap();

    let blobs = storage.list("PERU/").await.unwrap();
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].uploaded_by, None);
    assert_eq!(blobs[0].size, 5);
    assert!(blobs[0].latest_upload);
}

#[tokio::test]
async fn test_fetch_latest() {
    let (_temp_dir, storage) = create_test_storage();
    storage.save("CHINA/tariffs-1.csv", b"old", CONTENT_TYPE_CSV, "x").await.unwrap();
    storage.save("CHINA/tariffs-2.csv", b"new", CONTENT_TYPE_CSV, "x").await.unwrap();

    let (metadata, content) = storage.fetch_latest("CHINA/").await.unwrap();
    assert_eq!(metadata.key, "CHINA/tariffs-2.csv");
    assert_eq!(content, b"new");

    let result = storage.fetch_latest("KOREA/").await;
    assert!(matches!(result, Err(Error::BlobNotFound { .. })));
}

#[tokio::test]
async fn test_initialize_seeds_countries() {
    let (_temp_dir, storage) = create_test_storage();
    let storage = storage.with_owner("ops");

    assert!(initialize(&storage).await.unwrap());
    assert!(storage.container_exists().await.unwrap());
    // Second call leaves the container alone
    assert!(!initialize(&storage).await.unwrap());

    let countries = load_countries(&storage).await.unwrap();
    assert!(countries.iter().any(|c| c.code == "CHINA"));
    assert!(countries.iter().all(|c| c.id.is_some()));

    let blobs = storage.list(COUNTRIES_BLOB_KEY).await.unwrap();
    assert_eq!(blobs[0].content_type, "application/json");
    assert_eq!(blobs[0].uploaded_by.as_deref(), Some("ops"));
}

#[tokio::test]
async fn test_load_countries_rejects_invalid_catalogue() {
    let (_temp_dir, storage) = create_test_storage();
    storage
        .save(COUNTRIES_BLOB_KEY, b"[]", "application/json", "x")
        .await
        .unwrap();

    let result = load_countries(&storage).await;
    assert!(matches!(result, Err(Error::Serialization { .. })));
}

#[tokio::test]
async fn test_save_without_verification() {
    let (_temp_dir, storage) = create_test_storage();
    let storage = storage.with_verification(false);

    storage.save("x.csv", b"abc", CONTENT_TYPE_CSV, "x").await.unwrap();
    assert_eq!(storage.fetch("x.csv").await.unwrap(), b"abc");
}
