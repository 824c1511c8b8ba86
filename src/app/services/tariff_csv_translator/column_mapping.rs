//! Column mapping and categorization for tariff CSV headers
//!
//! This module indexes the header row by exact (trimmed, case-sensitive)
//! column name and sorts the columns into scalar tariff fields, rate columns
//! of either extraction scheme, and columns the translator does not read.

use crate::constants::{columns, rates};
use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;

/// Category of a header column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Scalar tariff field read by the row mapper
    Scalar,
    /// `YEAR{i}` or `YEAR{i}_Alt` with i in 1..=30
    RelativeYearRate,
    /// `Y{year}` or `Alt_{year}` with year in 2004..=2041
    CalendarYearRate,
    /// Present in the document but never read
    Unrecognized,
}

impl ColumnKind {
    /// Classify a trimmed column name
    pub fn classify(column_name: &str) -> Self {
        if columns::SCALAR_COLUMNS.contains(&column_name) {
            return ColumnKind::Scalar;
        }

        if let Some(rest) = column_name.strip_prefix(rates::RELATIVE_YEAR_PREFIX) {
            let index = rest.strip_suffix(rates::RELATIVE_YEAR_ALT_SUFFIX).unwrap_or(rest);
            if in_range(index, rates::RELATIVE_YEAR_FIRST, rates::RELATIVE_YEAR_LAST) {
                return ColumnKind::RelativeYearRate;
            }
        }

        let calendar_year = column_name
            .strip_prefix(rates::CALENDAR_YEAR_ALT_PREFIX)
            .or_else(|| column_name.strip_prefix(rates::CALENDAR_YEAR_PREFIX));
        if let Some(year) = calendar_year {
            if in_range(year, rates::CALENDAR_YEAR_FIRST, rates::CALENDAR_YEAR_LAST) {
                return ColumnKind::CalendarYearRate;
            }
        }

        ColumnKind::Unrecognized
    }
}

/// Digits-only number within an inclusive range; rejects signs and padding
fn in_range(text: &str, first: i32, last: i32) -> bool {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match text.parse::<i32>() {
        Ok(value) => value.to_string() == text && (first..=last).contains(&value),
        Err(_) => false,
    }
}

/// Column mapping for a tariff CSV document
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    /// Column name to index mapping
    pub name_to_index: HashMap<String, usize>,

    /// Known scalar tariff columns present in the header
    pub scalar_columns: Vec<String>,

    /// Relative-year rate columns present in the header
    pub relative_year_columns: Vec<String>,

    /// Calendar-year rate columns present in the header
    pub calendar_year_columns: Vec<String>,

    /// Columns that no part of the translation reads
    pub unrecognized_columns: Vec<String>,
}

impl ColumnMapping {
    /// Analyze column headers, rejecting duplicated names
    pub fn analyze(headers: &StringRecord) -> Result<Self> {
        let mut mapping = ColumnMapping::default();

        for (index, header) in headers.iter().enumerate() {
            let column_name = header.trim().to_string();

            // Unnamed columns cannot be addressed
            if column_name.is_empty() {
                continue;
            }

            if mapping.name_to_index.contains_key(&column_name) {
                return Err(Error::malformed_header(format!(
                    "duplicate column '{}' at position {}",
                    column_name,
                    index + 1
                )));
            }
            mapping.name_to_index.insert(column_name.clone(), index);

            match ColumnKind::classify(&column_name) {
                ColumnKind::Scalar => mapping.scalar_columns.push(column_name),
                ColumnKind::RelativeYearRate => mapping.relative_year_columns.push(column_name),
                ColumnKind::CalendarYearRate => mapping.calendar_year_columns.push(column_name),
                ColumnKind::Unrecognized => mapping.unrecognized_columns.push(column_name),
            }
        }

        Ok(mapping)
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    /// Get statistics about the column mapping
    pub fn stats(&self) -> (usize, usize, usize, usize) {
        (
            self.name_to_index.len(),
            self.scalar_columns.len(),
            self.relative_year_columns.len() + self.calendar_year_columns.len(),
            self.unrecognized_columns.len(),
        )
    }
}
