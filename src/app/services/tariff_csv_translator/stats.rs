//! Translation statistics and result structures for tariff CSV documents

use serde::{Deserialize, Serialize};

use super::rate_extractor::{RateScheme, RateSource};
use crate::app::models::{Rate, Tariff};

/// Translation result with tariffs and statistics
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Tariffs in input row order
    pub tariffs: Vec<Tariff>,

    pub stats: TranslationStats,
}

/// Statistics for one translated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Scheme selected for the document
    pub scheme: RateScheme,

    /// Number of data rows translated
    pub rows_translated: usize,

    /// Total rates extracted across all rows
    pub rates_extracted: usize,

    /// Rates taken from an alternate column
    pub alternate_rates: usize,

    /// Rows that produced no rate at all
    pub rows_without_rates: usize,

    /// Header columns the translation never reads
    pub unrecognized_columns: Vec<String>,
}

impl TranslationStats {
    /// Create new empty statistics for a scheme
    pub fn new(scheme: RateScheme) -> Self {
        Self {
            scheme,
            rows_translated: 0,
            rates_extracted: 0,
            alternate_rates: 0,
            rows_without_rates: 0,
            unrecognized_columns: Vec::new(),
        }
    }

    /// Record one translated row and the rates extracted from it
    pub fn record_row(&mut self, rates: &[(Rate, RateSource)]) {
        self.rows_translated += 1;
        self.rates_extracted += rates.len();
        self.alternate_rates += rates
            .iter()
            .filter(|(_, source)| *source == RateSource::Alternate)
            .count();
        if rates.is_empty() {
            self.rows_without_rates += 1;
        }
    }

    /// Average number of rates per translated row
    pub fn rates_per_row(&self) -> f64 {
        if self.rows_translated == 0 {
            0.0
        } else {
            self.rates_extracted as f64 / self.rows_translated as f64
        }
    }
}
