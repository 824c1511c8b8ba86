//! Tariff CSV translator for tariff schedule exports
//!
//! This module converts a tariff CSV document into an ordered list of
//! [`Tariff`](crate::app::models::Tariff) records, each carrying the rates
//! extracted from its year columns. Translation is all-or-nothing: the first
//! malformed row aborts the document and no partial result is returned.
//!
//! ## Architecture
//!
//! The translator is organized into logical components:
//! - [`translator`] - Document parsing and per-row orchestration
//! - [`column_mapping`] - Header analysis and column categorization
//! - [`record_parser`] - Mapping of one row's scalar columns to a tariff
//! - [`rate_extractor`] - Scheme selection and per-year rate extraction
//! - [`field_parsers`] - Typed field accessors and the field error type
//! - [`stats`] - Translation statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use tariff_importer::app::services::tariff_csv_translator::TariffCsvTranslator;
//!
//! # fn example() -> tariff_importer::Result<()> {
//! let csv = "ID,StagingBasketId,Product_Type,Y2010\n1,5,2,3.5\n";
//! let tariffs = TariffCsvTranslator::new().translate("CHINA", csv)?;
//!
//! assert_eq!(tariffs.len(), 1);
//! assert_eq!(tariffs[0].rates[0].year, 2010);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod rate_extractor;
pub mod record_parser;
pub mod stats;
pub mod translator;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnKind, ColumnMapping};
pub use field_parsers::FieldError;
pub use rate_extractor::{RateScheme, RateSource};
pub use stats::{TranslationResult, TranslationStats};
pub use translator::TariffCsvTranslator;
