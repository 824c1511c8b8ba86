//! Tariff Importer Library
//!
//! A Rust library for publishing government tariff schedules: it translates
//! tariff CSV exports into normalized tariff and rate records, stores them in a
//! queryable repository, and archives the source files in blob storage.
//!
//! This library provides tools for:
//! - Translating tariff CSV documents with country-specific rate extraction
//! - Persisting tariffs with reference reconciliation and paginated queries
//! - Archiving and retrieving source files with upload verification
//! - Layered configuration from defaults, TOML files and the environment

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod blob_storage;
        pub mod importer;
        pub mod query;
        pub mod tariff_csv_translator;
        pub mod tariff_repository;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Country, Hs6, ProductType, Rate, StagingBasket, Tariff};
pub use app::services::tariff_csv_translator::{RateScheme, TariffCsvTranslator};
pub use config::Config;

/// Result type alias for tariff import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tariff import, storage and query operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV structure could not be read
    #[error("CSV parsing error at row {row}: {message}")]
    CsvParsing {
        row: usize,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Header row is unusable
    #[error("Malformed CSV header: {message}")]
    MalformedHeader { message: String },

    /// A mandatory field is missing or fails its expected parse
    #[error("Malformed record at row {row}, column '{column}': {reason}")]
    MalformedRecord {
        row: usize,
        column: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Country code cannot be used for an import
    #[error("Invalid country code '{code}': {reason}")]
    InvalidCountryCode { code: String, reason: String },

    /// Blob key is not a safe relative path
    #[error("Invalid blob key '{key}': {reason}")]
    InvalidBlobKey { key: String, reason: String },

    /// Blob does not exist
    #[error("Blob not found: {key}")]
    BlobNotFound { key: String },

    /// Stored bytes differ from the uploaded bytes
    #[error("Integrity check failed for blob '{key}': {message}")]
    BlobIntegrity { key: String, message: String },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Page request outside the accepted bounds
    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(row: usize, message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::CsvParsing {
            row,
            message: message.into(),
            source,
        }
    }

    /// Create a malformed header error
    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create a malformed record error for a 1-based data row
    pub fn malformed_record(
        row: usize,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            row,
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid country code error
    pub fn invalid_country_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCountryCode {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid blob key error
    pub fn invalid_blob_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBlobKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a blob not found error
    pub fn blob_not_found(key: impl Into<String>) -> Self {
        Self::BlobNotFound { key: key.into() }
    }

    /// Create a blob integrity error
    pub fn blob_integrity(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BlobIntegrity {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid page request error
    pub fn invalid_page_request(message: impl Into<String>) -> Self {
        Self::InvalidPageRequest {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True when the error was caused by the content of an input document
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::CsvParsing { .. }
                | Self::MalformedHeader { .. }
                | Self::MalformedRecord { .. }
                | Self::InvalidCountryCode { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        let row = error
            .position()
            .map(|position| position.record() as usize)
            .unwrap_or(0);
        Self::CsvParsing {
            row,
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(error: figment::Error) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}
