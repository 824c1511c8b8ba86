//! Field parsing utilities for tariff CSV records
//!
//! Mandatory fields fail with a [`FieldError`]. Optional fields never fail:
//! a missing, empty or unparsable value resolves to `None`.

use super::column_mapping::ColumnMapping;
use crate::Error;
use csv::StringRecord;

/// A mandatory field is absent or does not parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column '{column}': {reason}")]
pub struct FieldError {
    pub column: String,
    pub reason: String,
}

impl FieldError {
    pub fn missing(column: &str) -> Self {
        Self {
            column: column.to_string(),
            reason: "required value is missing".to_string(),
        }
    }

    pub fn invalid(column: &str, value: &str, expected: &str) -> Self {
        Self {
            column: column.to_string(),
            reason: format!("'{}' is not a valid {}", value, expected),
        }
    }

    /// Attach the 1-based data row the field belongs to
    pub fn into_record_error(self, row: usize) -> Error {
        Error::malformed_record(row, self.column, self.reason)
    }
}

/// Get an optional field value from a CSV record
///
/// Columns missing from the header, short records and empty values all
/// read as "no value".
pub fn get_optional_field<'a>(
    record: &'a StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Option<&'a str> {
    mapping
        .get_index(field_name)
        .and_then(|index| record.get(index))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Parse a required i64 field from a CSV record
pub fn parse_required_i64(
    record: &StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Result<i64, FieldError> {
    let value_str = get_optional_field(record, mapping, field_name)
        .ok_or_else(|| FieldError::missing(field_name))?;

    value_str
        .parse::<i64>()
        .map_err(|_| FieldError::invalid(field_name, value_str, "integer"))
}

/// Parse an optional i32 field from a CSV record
pub fn parse_optional_i32(
    record: &StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Option<i32> {
    get_optional_field(record, mapping, field_name).and_then(|s| s.parse::<i32>().ok())
}

/// Parse an optional text field from a CSV record
pub fn parse_optional_string(
    record: &StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Option<String> {
    get_optional_field(record, mapping, field_name).map(str::to_string)
}

/// Parse a boolean flag; only "true" (any ASCII case) is true
pub fn parse_flag(record: &StringRecord, mapping: &ColumnMapping, field_name: &str) -> bool {
    get_optional_field(record, mapping, field_name)
        .is_some_and(|s| s.eq_ignore_ascii_case("true"))
}

/// Parse a present rate value as a finite number
pub fn parse_rate_number(value: &str, field_name: &str) -> Result<f64, FieldError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| FieldError::invalid(field_name, value, "number"))
}
