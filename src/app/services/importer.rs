//! Tariff import orchestration
//!
//! An import translates one country's CSV document, archives the raw file in
//! blob storage and replaces the country's tariffs in the repository. The
//! translation runs first, so a malformed document never reaches storage.

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::app::services::blob_storage::BlobStorage;
use crate::app::services::tariff_csv_translator::{
    RateScheme, TariffCsvTranslator, TranslationResult,
};
use crate::app::services::tariff_repository::TariffRepository;
use crate::config::ImportConfig;
use crate::constants::CONTENT_TYPE_CSV;
use crate::{Error, Result};

static COUNTRY_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid country code pattern"));

/// Outcome of one country import
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub country_code: String,
    pub scheme: RateScheme,
    pub tariffs_saved: usize,
    pub rates_extracted: usize,
    pub alternate_rates: usize,
    /// Key of the archived source file
    pub blob_key: Option<String>,
    /// Tariffs removed for the country before saving the new batch
    pub tariffs_replaced: usize,
    pub dry_run: bool,
}

impl ImportReport {
    fn from_translation(country_code: &str, translation: &TranslationResult) -> Self {
        Self {
            country_code: country_code.to_string(),
            scheme: translation.stats.scheme,
            tariffs_saved: 0,
            rates_extracted: translation.stats.rates_extracted,
            alternate_rates: translation.stats.alternate_rates,
            blob_key: None,
            tariffs_replaced: 0,
            dry_run: false,
        }
    }
}

/// Imports tariff documents into the repository and the blob archive
pub struct TariffImporter {
    translator: TariffCsvTranslator,
    repository: Arc<dyn TariffRepository>,
    storage: Arc<dyn BlobStorage>,
    archive_source: bool,
}

impl TariffImporter {
    pub fn new(repository: Arc<dyn TariffRepository>, storage: Arc<dyn BlobStorage>) -> Self {
        Self {
            translator: TariffCsvTranslator::new(),
            repository,
            storage,
            archive_source: true,
        }
    }

    pub fn from_config(
        config: &ImportConfig,
        repository: Arc<dyn TariffRepository>,
        storage: Arc<dyn BlobStorage>,
    ) -> Self {
        Self::new(repository, storage).with_archive(config.archive_source)
    }

    /// Enable or disable archiving of the raw CSV
    pub fn with_archive(mut self, archive_source: bool) -> Self {
        self.archive_source = archive_source;
        self
    }

    /// Import a country's tariff document, replacing its existing tariffs
    pub async fn import(
        &self,
        country_code: &str,
        csv: &str,
        uploaded_by: &str,
    ) -> Result<ImportReport> {
        validate_country_code(country_code)?;

        let translation = self.translator.translate_with_stats(country_code, csv)?;
        let mut report = ImportReport::from_translation(country_code, &translation);

        if self.archive_source {
            let key = archive_key(country_code);
            self.storage
                .save(&key, csv.as_bytes(), CONTENT_TYPE_CSV, uploaded_by)
                .await?;
            debug!("Archived source document as {}", key);
            report.blob_key = Some(key);
        }

        let replacement = self
            .repository
            .replace_country_tariffs(country_code, translation.tariffs)
            .await?;
        report.tariffs_replaced = replacement.removed;
        report.tariffs_saved = replacement.saved.len();

        info!(
            "Imported {} tariffs for {} ({} rates, {} replaced)",
            report.tariffs_saved, country_code, report.rates_extracted, report.tariffs_replaced
        );
        Ok(report)
    }

    /// Translate a document and report what an import would do, storing nothing
    pub async fn preview(&self, country_code: &str, csv: &str) -> Result<ImportReport> {
        validate_country_code(country_code)?;

        let translation = self.translator.translate_with_stats(country_code, csv)?;
        let mut report = ImportReport::from_translation(country_code, &translation);
        report.tariffs_saved = translation.tariffs.len();
        report.tariffs_replaced = self.repository.count_by_country_code(country_code).await?;
        report.dry_run = true;
        Ok(report)
    }
}

/// Check that a country code can be used as a storage prefix
pub fn validate_country_code(country_code: &str) -> Result<()> {
    if country_code.is_empty() {
        return Err(Error::invalid_country_code(country_code, "code is empty"));
    }
    if !COUNTRY_CODE_PATTERN.is_match(country_code) {
        return Err(Error::invalid_country_code(
            country_code,
            "only letters, digits, '-' and '_' are allowed",
        ));
    }
    Ok(())
}

/// Archive key for a source document uploaded now
fn archive_key(country_code: &str) -> String {
    format!(
        "{}/tariffs-{}.csv",
        country_code,
        Utc::now().format("%Y%m%dT%H%M%S%3fZ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{BlobMetadata, Page, PageRequest, StagingBasket, Tariff};
    use crate::app::services::tariff_repository::Replacement;
    use crate::app::services::blob_storage::FilesystemBlobStorage;
    use crate::app::services::tariff_csv_translator::tests::{
        create_relative_year_csv, create_test_tariff_csv,
    };
    use crate::app::services::tariff_repository::InMemoryTariffRepository;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        repository: Arc<InMemoryTariffRepository>,
        storage: Arc<FilesystemBlobStorage>,
        importer: TariffImporter,
    }

    fn create_fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(InMemoryTariffRepository::new());
        let storage = Arc::new(FilesystemBlobStorage::new(
            temp_dir.path(),
            "tariffs",
            "http://localhost/blobs",
        ));
        let importer = TariffImporter::new(repository.clone(), storage.clone());
        Fixture {
            _temp_dir: temp_dir,
            repository,
            storage,
            importer,
        }
    }

    /// Storage whose uploads always fail
    struct UnavailableStorage;

    #[async_trait]
    impl BlobStorage for UnavailableStorage {
        async fn container_exists(&self) -> Result<bool> {
            Ok(true)
        }

        async fn create_container(&self) -> Result<()> {
            Ok(())
        }

        async fn save(
            &self,
            key: &str,
            _content: &[u8],
            _content_type: &str,
            _uploaded_by: &str,
        ) -> Result<BlobMetadata> {
            Err(Error::blob_integrity(key, "upload rejected"))
        }

        async fn list(&self, _prefix: &str) -> Result<Vec<BlobMetadata>> {
            Ok(Vec::new())
        }

        async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
            Err(Error::blob_not_found(key))
        }
    }

    /// Repository that accepts the first import and then refuses to write
    struct ReadOnlyAfterFirstSave {
        inner: InMemoryTariffRepository,
    }

    #[async_trait]
    impl TariffRepository for ReadOnlyAfterFirstSave {
        async fn save_all(&self, tariffs: Vec<Tariff>) -> Result<Vec<Tariff>> {
            self.inner.save_all(tariffs).await
        }

        async fn delete_by_country_code(&self, country_code: &str) -> Result<usize> {
            self.inner.delete_by_country_code(country_code).await
        }

        async fn replace_country_tariffs(
            &self,
            country_code: &str,
            tariffs: Vec<Tariff>,
        ) -> Result<Replacement> {
            if self.inner.total_tariffs().await > 0 {
                return Err(Error::io(
                    "Repository is read-only",
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            self.inner.replace_country_tariffs(country_code, tariffs).await
        }

        async fn find_by_country_code(
            &self,
            country_code: &str,
            page: PageRequest,
        ) -> Result<Page<Tariff>> {
            self.inner.find_by_country_code(country_code, page).await
        }

        async fn find_by_country_code_and_staging_basket_id(
            &self,
            country_code: &str,
            staging_basket_id: i64,
            page: PageRequest,
        ) -> Result<Page<Tariff>> {
            self.inner
                .find_by_country_code_and_staging_basket_id(country_code, staging_basket_id, page)
                .await
        }

        async fn find_all_staging_baskets_by_country(
            &self,
            country_code: &str,
        ) -> Result<Vec<StagingBasket>> {
            self.inner.find_all_staging_baskets_by_country(country_code).await
        }

        async fn count_by_country_code(&self, country_code: &str) -> Result<usize> {
            self.inner.count_by_country_code(country_code).await
        }
    }

    #[test]
    fn test_validate_country_code() {
        assert!(validate_country_code("CHINA").is_ok());
        assert!(validate_country_code("USMCA-MX").is_ok());
        assert!(validate_country_code("cafta_dr").is_ok());

        for code in ["", "CH INA", "../CHINA", "CHINA/1", "ÇHINA"] {
            assert!(
                matches!(
                    validate_country_code(code),
                    Err(Error::InvalidCountryCode { .. })
                ),
                "code {:?} should be rejected",
                code
            );
        }
    }

    #[test]
    fn test_archive_key_layout() {
        let key = archive_key("KOREA");

        assert!(key.starts_with("KOREA/tariffs-"));
        assert!(key.ends_with("Z.csv"));
        // KOREA/tariffs-YYYYMMDDTHHMMSSmmmZ.csv
        assert_eq!(key.len(), "KOREA/tariffs-".len() + 19 + ".csv".len());
    }

    #[tokio::test]
    async fn test_import_saves_and_archives() {
        let fixture = create_fixture();
        let csv = create_test_tariff_csv();

        let report = fixture.importer.import("KOREA", &csv, "analyst").await.unwrap();

        assert_eq!(report.scheme, RateScheme::CalendarYear);
        assert_eq!(report.tariffs_saved, 2);
        assert_eq!(report.tariffs_replaced, 0);
        assert!(!report.dry_run);

        let key = report.blob_key.unwrap();
        let archived = fixture.storage.fetch(&key).await.unwrap();
        assert_eq!(archived, csv.as_bytes());
        let blobs = fixture.storage.list("KOREA/").await.unwrap();
        assert_eq!(blobs[0].uploaded_by.as_deref(), Some("analyst"));
        assert_eq!(blobs[0].content_type, "text/csv");

        let page = fixture
            .repository
            .find_by_country_code("KOREA", PageRequest::new(0, 10).unwrap())
            .await
            .unwrap();
        let legacy_ids: Vec<i64> = page.content.iter().map(|t| t.legacy_id).collect();
        assert_eq!(legacy_ids, vec![101, 102]);
        assert!(page.content.iter().all(|t| t.id.is_some()));
    }

    #[tokio::test]
    async fn test_reimport_replaces_country_tariffs() {
        let fixture = create_fixture();
        let csv = create_test_tariff_csv();

        fixture.importer.import("KOREA", &csv, "a").await.unwrap();
        fixture
            .importer
            .import("USMCA-MX", &create_relative_year_csv(), "a")
            .await
            .unwrap();
        // Archive keys have millisecond resolution
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let report = fixture.importer.import("KOREA", &csv, "b").await.unwrap();

        assert_eq!(report.tariffs_replaced, 2);
        assert_eq!(fixture.repository.count_by_country_code("KOREA").await.unwrap(), 2);
        assert_eq!(fixture.repository.count_by_country_code("USMCA-MX").await.unwrap(), 2);
        assert_eq!(fixture.storage.list("KOREA/").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_document_changes_nothing() {
        let fixture = create_fixture();
        fixture
            .importer
            .import("KOREA", &create_test_tariff_csv(), "a")
            .await
            .unwrap();

        let malformed = "ID,StagingBasketId,Product_Type\n1,1,1\nx,1,1\n";
        let result = fixture.importer.import("KOREA", malformed, "a").await;

        match result {
            Err(Error::MalformedRecord { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "ID");
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
        assert_eq!(fixture.repository.count_by_country_code("KOREA").await.unwrap(), 2);
        assert_eq!(fixture.storage.list("KOREA/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_country_code_is_rejected() {
        let fixture = create_fixture();

        let result = fixture
            .importer
            .import("../etc", &create_test_tariff_csv(), "a")
            .await;

        assert!(matches!(result, Err(Error::InvalidCountryCode { .. })));
        assert!(fixture.storage.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_without_archive() {
        let fixture = create_fixture();
        let importer = TariffImporter::new(fixture.repository.clone(), fixture.storage.clone())
            .with_archive(false);

        let report = importer
            .import("USMCA-MX", &create_relative_year_csv(), "a")
            .await
            .unwrap();

        assert_eq!(report.scheme, RateScheme::RelativeYear);
        assert_eq!(report.blob_key, None);
        assert_eq!(report.tariffs_saved, 2);
        assert!(fixture.storage.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_archive_leaves_repository_untouched() {
        let repository = Arc::new(InMemoryTariffRepository::new());
        let importer = TariffImporter::new(repository.clone(), Arc::new(UnavailableStorage));

        let result = importer.import("KOREA", &create_test_tariff_csv(), "a").await;

        assert!(matches!(result, Err(Error::BlobIntegrity { .. })));
        assert_eq!(repository.total_tariffs().await, 0);
    }

    #[tokio::test]
    async fn test_failed_replacement_keeps_previous_tariffs() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(ReadOnlyAfterFirstSave {
            inner: InMemoryTariffRepository::new(),
        });
        let storage = Arc::new(FilesystemBlobStorage::new(
            temp_dir.path(),
            "tariffs",
            "http://localhost/blobs",
        ));
        let importer = TariffImporter::new(repository.clone(), storage);
        let csv = create_test_tariff_csv();

        importer.import("KOREA", &csv, "a").await.unwrap();
        let result = importer.import("KOREA", &csv, "a").await;

        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(repository.count_by_country_code("KOREA").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_preview_stores_nothing() {
        let fixture = create_fixture();
        fixture
            .importer
            .import("KOREA", &create_test_tariff_csv(), "a")
            .await
            .unwrap();

        let report = fixture
            .importer
            .preview("KOREA", &create_test_tariff_csv())
            .await
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.tariffs_saved, 2);
        assert_eq!(report.tariffs_replaced, 2);
        assert_eq!(report.blob_key, None);
        assert_eq!(fixture.repository.total_tariffs().await, 2);
        assert_eq!(fixture.storage.list("KOREA/").await.unwrap().len(), 1);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ImportReport {
            country_code: "CHINA".to_string(),
            scheme: RateScheme::CalendarYear,
            tariffs_saved: 1,
            rates_extracted: 1,
            alternate_rates: 0,
            blob_key: None,
            tariffs_replaced: 0,
            dry_run: false,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["countryCode"], "CHINA");
        assert_eq!(json["scheme"], "calendar-year");
        assert_eq!(json["tariffsSaved"], 1);
    }
}
