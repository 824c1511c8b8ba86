//! Data models for tariff publishing
//!
//! This module contains the core data structures for representing tariff
//! schedule entries, their per-year rates, and the lightweight reference
//! values (country, HS6 classification, staging basket, product type) that a
//! tariff carries at import time.

pub mod blob;
pub mod page;

use serde::{Deserialize, Serialize};

pub use blob::BlobMetadata;
pub use page::{Page, PageRequest};

// =============================================================================
// Reference Values
// =============================================================================

/// Trading partner a tariff schedule belongs to
///
/// Imports only know the country code; the repository fills in the canonical
/// id and name when the tariff is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Country or agreement code (e.g., "CHINA", "USMCA-MX")
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Country {
    /// Reference to a country known only by its code
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: None,
        }
    }
}

/// Wrapper matching the layout of the `countries.json` catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryList {
    pub countries: Vec<Country>,
}

/// Harmonized System 6-digit product classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hs6 {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Grouping bucket used to phase tariff elimination schedules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingBasket {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: i64,
    pub name: Option<String>,
}

// =============================================================================
// Rate
// =============================================================================

/// Tariff rate for one year of a schedule
///
/// `year` is either a relative sequence number (1–30) or a calendar year
/// (2004–2041) depending on the extraction scheme. The value is kept as text
/// so policy markers such as "Free" and the exact source precision survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub year: i32,
    pub value: String,
}

impl Rate {
    pub fn new(year: i32, value: impl Into<String>) -> Self {
        Self {
            year,
            value: value.into(),
        }
    }
}

// =============================================================================
// Tariff
// =============================================================================

/// One product/partner tariff schedule entry
///
/// Every tariff belongs to exactly one country and carries zero or more rates
/// in ascending year order, at most one per year. `id` is assigned by the
/// repository and stays `None` until the tariff has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Row identifier from the source export
    pub legacy_id: i64,

    pub tariff_line: Option<String>,
    pub description: Option<String>,
    pub sector_code: Option<String>,

    pub base_rate: Option<String>,
    pub base_rate_alt: Option<String>,
    /// Year in which the tariff reaches its final rate
    pub final_year: Option<i32>,
    pub tariff_rate_quota: Option<i32>,
    pub tariff_rate_quota_notes: Option<String>,
    pub tariff_eliminated: bool,

    pub partner_name: Option<String>,
    pub reporter_name: Option<String>,
    pub partner_start_year: Option<i32>,
    pub reporter_start_year: Option<i32>,
    pub partner_agreement_name: Option<String>,
    pub reporter_agreement_name: Option<String>,

    pub quota_name: Option<String>,
    pub rule_text: Option<String>,
    pub link_text: Option<String>,
    pub link_url: Option<String>,

    pub country: Country,
    pub hs6: Hs6,
    pub staging_basket: StagingBasket,
    pub product_type: ProductType,

    #[serde(default)]
    pub rates: Vec<Rate>,
}

impl Tariff {
    /// Rate for a given year or sequence index, if one was extracted
    pub fn rate_for(&self, year: i32) -> Option<&Rate> {
        self.rates.iter().find(|rate| rate.year == year)
    }

    pub fn country_code(&self) -> &str {
        &self.country.code
    }
}
