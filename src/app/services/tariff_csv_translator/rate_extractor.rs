//! Per-year rate extraction for tariff CSV records
//!
//! Two column layouts exist. Trilateral-agreement exports number their rate
//! columns by relative year (`YEAR1` … `YEAR30`, alternates `YEAR1_Alt`);
//! every other export uses calendar years (`Y2004` … `Y2041`, alternates
//! `Alt_2004`). The layout is chosen from the country code alone.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use super::column_mapping::ColumnMapping;
use super::field_parsers::{FieldError, get_optional_field, parse_rate_number};
use crate::app::models::Rate;
use crate::constants::rates;

/// Rate column layout of a tariff document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateScheme {
    /// Sequence index 1..=30 (`YEAR{i}` / `YEAR{i}_Alt`)
    RelativeYear,
    /// Calendar year 2004..=2041 (`Y{year}` / `Alt_{year}`)
    CalendarYear,
}

impl RateScheme {
    /// Select the scheme for a country code
    ///
    /// Codes containing the trilateral-agreement marker use relative years.
    /// No other condition selects a scheme.
    pub fn for_country(country_code: &str) -> Self {
        if country_code.contains(rates::RELATIVE_YEAR_MARKER) {
            RateScheme::RelativeYear
        } else {
            RateScheme::CalendarYear
        }
    }

    /// Years (or sequence indices) visited in ascending order
    pub fn periods(&self) -> RangeInclusive<i32> {
        match self {
            RateScheme::RelativeYear => rates::RELATIVE_YEAR_FIRST..=rates::RELATIVE_YEAR_LAST,
            RateScheme::CalendarYear => rates::CALENDAR_YEAR_FIRST..=rates::CALENDAR_YEAR_LAST,
        }
    }

    pub fn primary_column(&self, period: i32) -> String {
        match self {
            RateScheme::RelativeYear => format!("{}{}", rates::RELATIVE_YEAR_PREFIX, period),
            RateScheme::CalendarYear => format!("{}{}", rates::CALENDAR_YEAR_PREFIX, period),
        }
    }

    pub fn alternate_column(&self, period: i32) -> String {
        match self {
            RateScheme::RelativeYear => format!(
                "{}{}{}",
                rates::RELATIVE_YEAR_PREFIX,
                period,
                rates::RELATIVE_YEAR_ALT_SUFFIX
            ),
            RateScheme::CalendarYear => format!("{}{}", rates::CALENDAR_YEAR_ALT_PREFIX, period),
        }
    }
}

impl fmt::Display for RateScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateScheme::RelativeYear => write!(f, "relative-year"),
            RateScheme::CalendarYear => write!(f, "calendar-year"),
        }
    }
}

/// Column a rate value was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Primary,
    Alternate,
}

/// Extract the rate for one year or sequence index
///
/// The alternate column wins whenever it has a value. Otherwise a present
/// primary value must parse as a number and is kept only when non-zero.
pub fn extract_rate(
    record: &StringRecord,
    mapping: &ColumnMapping,
    scheme: RateScheme,
    period: i32,
) -> Result<Option<(Rate, RateSource)>, FieldError> {
    let alternate_column = scheme.alternate_column(period);
    if let Some(alternate) = get_optional_field(record, mapping, &alternate_column) {
        return Ok(Some((Rate::new(period, alternate), RateSource::Alternate)));
    }

    let primary_column = scheme.primary_column(period);
    match get_optional_field(record, mapping, &primary_column) {
        Some(primary) => {
            let number = parse_rate_number(primary, &primary_column)?;
            if number != 0.0 {
                Ok(Some((Rate::new(period, primary), RateSource::Primary)))
            } else {
                Ok(None)
            }
        }
        None => Ok(None),
    }
}

/// Extract all rates of a record with the column each came from
pub fn extract_rates_with_sources(
    record: &StringRecord,
    mapping: &ColumnMapping,
    scheme: RateScheme,
) -> Result<Vec<(Rate, RateSource)>, FieldError> {
    let mut extracted = Vec::new();
    for period in scheme.periods() {
        if let Some(rate) = extract_rate(record, mapping, scheme, period)? {
            extracted.push(rate);
        }
    }
    Ok(extracted)
}
