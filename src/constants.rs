//! Application constants for the tariff importer
//!
//! This module contains the CSV column names, rate extraction ranges,
//! storage conventions and default values used throughout the application.

// =============================================================================
// Tariff CSV Columns
// =============================================================================

/// Column names of the tariff CSV export
pub mod columns {
    pub const ID: &str = "ID";
    pub const TARIFF_LINE: &str = "TL";
    pub const TARIFF_LINE_DESCRIPTION: &str = "TL_Desc";
    pub const SECTOR_CODE: &str = "Sector_Code";
    pub const BASE_RATE: &str = "Base_Rate";
    pub const BASE_RATE_ALT: &str = "Base_Rate_Alt";
    pub const FINAL_YEAR: &str = "Final_Year";
    pub const TRQ_QUOTA: &str = "TRQ_Quota";
    pub const TRQ_NOTE: &str = "TRQ_Note";
    pub const TARIFF_ELIMINATED: &str = "Tariff_Eliminated";
    pub const PARTNER_NAME: &str = "PartnerName";
    pub const REPORTER_NAME: &str = "ReporterName";
    pub const PARTNER_START_YEAR: &str = "PartnerStartYear";
    pub const REPORTER_START_YEAR: &str = "ReporterStartYear";
    pub const PARTNER_AGREEMENT_NAME: &str = "PartnerAgreementName";
    pub const REPORTER_AGREEMENT_NAME: &str = "ReporterAgreementName";
    pub const QUOTA_NAME: &str = "QuotaName";
    pub const RULE_TEXT: &str = "Rule_Text";
    pub const LINK_TEXT: &str = "Link_Text";
    pub const LINK_URL: &str = "Link_Url";
    pub const HS6: &str = "HS6";
    pub const HS6_DESCRIPTION: &str = "HS6_Desc";
    pub const STAGING_BASKET_ID: &str = "StagingBasketId";
    pub const STAGING_BASKET: &str = "StagingBasket";
    pub const PRODUCT_TYPE_ID: &str = "Product_Type";
    pub const PRODUCT_TYPE: &str = "ProductType";

    /// Every scalar column the row mapper reads
    pub const SCALAR_COLUMNS: &[&str] = &[
        ID,
        TARIFF_LINE,
        TARIFF_LINE_DESCRIPTION,
        SECTOR_CODE,
        BASE_RATE,
        BASE_RATE_ALT,
        FINAL_YEAR,
        TRQ_QUOTA,
        TRQ_NOTE,
        TARIFF_ELIMINATED,
        PARTNER_NAME,
        REPORTER_NAME,
        PARTNER_START_YEAR,
        REPORTER_START_YEAR,
        PARTNER_AGREEMENT_NAME,
        REPORTER_AGREEMENT_NAME,
        QUOTA_NAME,
        RULE_TEXT,
        LINK_TEXT,
        LINK_URL,
        HS6,
        HS6_DESCRIPTION,
        STAGING_BASKET_ID,
        STAGING_BASKET,
        PRODUCT_TYPE_ID,
        PRODUCT_TYPE,
    ];
}

// =============================================================================
// Rate Extraction
// =============================================================================

/// Rate column conventions for the two extraction schemes
pub mod rates {
    /// Country codes containing this marker use the relative-year scheme
    pub const RELATIVE_YEAR_MARKER: &str = "USMCA";

    /// Relative-year scheme: `YEAR{i}` and `YEAR{i}_Alt` for i in 1..=30
    pub const RELATIVE_YEAR_PREFIX: &str = "YEAR";
    pub const RELATIVE_YEAR_ALT_SUFFIX: &str = "_Alt";
    pub const RELATIVE_YEAR_FIRST: i32 = 1;
    pub const RELATIVE_YEAR_LAST: i32 = 30;

    /// Calendar-year scheme: `Y{year}` and `Alt_{year}` for 2004..=2041
    pub const CALENDAR_YEAR_PREFIX: &str = "Y";
    pub const CALENDAR_YEAR_ALT_PREFIX: &str = "Alt_";
    pub const CALENDAR_YEAR_FIRST: i32 = 2004;
    pub const CALENDAR_YEAR_LAST: i32 = 2041;
}

// =============================================================================
// Blob Storage
// =============================================================================

/// Key of the country catalogue inside the blob container
pub const COUNTRIES_BLOB_KEY: &str = "countries.json";

/// Metadata key recording who uploaded a blob
pub const UPLOADED_BY_METADATA_KEY: &str = "uploaded_by";

/// Sidecar directory holding blob metadata
pub const METADATA_DIR_NAME: &str = ".metadata";

pub const CONTENT_TYPE_CSV: &str = "text/csv";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =============================================================================
// Defaults
// =============================================================================

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "tariff-importer";

pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_CONTAINER_NAME: &str = "tariffs";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/blobs";
pub const DEFAULT_SNAPSHOT_FILE_NAME: &str = "tariffs.json";
pub const DEFAULT_UPLOADED_BY: &str = "tariff-importer";

/// Default and maximum number of tariffs per page
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 1000;

/// Staging basket id meaning "all staging baskets" in tariff queries
pub const ALL_STAGING_BASKETS: i64 = -1;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TARIFF_";
