//! Core tariff CSV translator implementation
//!
//! This module reads a whole CSV document, builds the column mapping from its
//! header and runs the row mapper and rate extractor over every data row.

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use super::column_mapping::ColumnMapping;
use super::rate_extractor::{RateScheme, extract_rates_with_sources};
use super::record_parser::parse_tariff_record;
use super::stats::{TranslationResult, TranslationStats};
use crate::app::models::Tariff;
use crate::{Error, Result};

/// Translator from tariff CSV documents to tariff records
///
/// Stateless: every call reads only its own input, so one translator can be
/// shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct TariffCsvTranslator;

impl TariffCsvTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate a CSV document into tariffs, one per data row, in row order
    pub fn translate(&self, country_code: &str, csv: &str) -> Result<Vec<Tariff>> {
        Ok(self.translate_with_stats(country_code, csv)?.tariffs)
    }

    /// Translate a CSV document and report statistics
    ///
    /// Fails on the first malformed row with an error naming the 1-based data
    /// row and the offending column; no tariffs are returned in that case.
    pub fn translate_with_stats(&self, country_code: &str, csv: &str) -> Result<TranslationResult> {
        let scheme = RateScheme::for_country(country_code);
        info!("Translating tariff CSV for {} ({} scheme)", country_code, scheme);

        let csv = csv.strip_prefix('\u{feff}').unwrap_or(csv);
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(csv.as_bytes());

        let column_mapping = {
            let headers = csv_reader.headers().map_err(|e| {
                let message = format!("Failed to read CSV headers: {}", e);
                Error::csv_parsing(0, message, Some(e))
            })?;
            ColumnMapping::analyze(headers)?
        };

        let (total_cols, scalar_cols, rate_cols, unrecognized_cols) = column_mapping.stats();
        debug!(
            "Column mapping: {} total, {} scalar, {} rate, {} unrecognized",
            total_cols, scalar_cols, rate_cols, unrecognized_cols
        );
        if unrecognized_cols > 0 {
            debug!("Unrecognized columns: {:?}", column_mapping.unrecognized_columns);
        }

        let mut stats = TranslationStats::new(scheme);
        stats.unrecognized_columns = column_mapping.unrecognized_columns.clone();
        let mut tariffs = Vec::new();

        for (index, result) in csv_reader.records().enumerate() {
            let row = index + 1;

            let record = result.map_err(|e| {
                let message = format!("Failed to read record: {}", e);
                Error::csv_parsing(row, message, Some(e))
            })?;

            let mut tariff = parse_tariff_record(&record, &column_mapping, country_code)
                .map_err(|e| e.into_record_error(row))?;
            let rates = extract_rates_with_sources(&record, &column_mapping, scheme)
                .map_err(|e| e.into_record_error(row))?;

            stats.record_row(&rates);
            tariff.rates = rates.into_iter().map(|(rate, _)| rate).collect();
            tariffs.push(tariff);
        }

        info!(
            "Translated {} tariffs with {} rates ({:.1} per row) for {}",
            stats.rows_translated,
            stats.rates_extracted,
            stats.rates_per_row(),
            country_code
        );

        Ok(TranslationResult { tariffs, stats })
    }
}
