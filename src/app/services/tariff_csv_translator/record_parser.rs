//! Individual CSV record mapping for tariff documents
//!
//! This module maps the scalar columns of one row onto a [`Tariff`]. Rates are
//! not touched here; the translator attaches them after rate extraction.

use csv::StringRecord;

use super::column_mapping::ColumnMapping;
use super::field_parsers::{
    FieldError, parse_flag, parse_optional_i32, parse_optional_string, parse_required_i64,
};
use crate::app::models::{Country, Hs6, ProductType, StagingBasket, Tariff};
use crate::constants::columns;

/// Map a single tariff record from CSV data
///
/// `ID`, `StagingBasketId` and `Product_Type` are mandatory integers; any of
/// them missing or non-numeric fails the row. The returned tariff has no
/// durable id and an empty rate sequence.
pub fn parse_tariff_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    country_code: &str,
) -> Result<Tariff, FieldError> {
    // Extract required fields
    let legacy_id = parse_required_i64(record, mapping, columns::ID)?;
    let staging_basket_id = parse_required_i64(record, mapping, columns::STAGING_BASKET_ID)?;
    let product_type_id = parse_required_i64(record, mapping, columns::PRODUCT_TYPE_ID)?;

    let text = |column: &str| parse_optional_string(record, mapping, column);
    let number = |column: &str| parse_optional_i32(record, mapping, column);

    Ok(Tariff {
        id: None,
        legacy_id,
        tariff_line: text(columns::TARIFF_LINE),
        description: text(columns::TARIFF_LINE_DESCRIPTION),
        sector_code: text(columns::SECTOR_CODE),
        base_rate: text(columns::BASE_RATE),
        base_rate_alt: text(columns::BASE_RATE_ALT),
        final_year: number(columns::FINAL_YEAR),
        tariff_rate_quota: number(columns::TRQ_QUOTA),
        tariff_rate_quota_notes: text(columns::TRQ_NOTE),
        tariff_eliminated: parse_flag(record, mapping, columns::TARIFF_ELIMINATED),
        partner_name: text(columns::PARTNER_NAME),
        reporter_name: text(columns::REPORTER_NAME),
        partner_start_year: number(columns::PARTNER_START_YEAR),
        reporter_start_year: number(columns::REPORTER_START_YEAR),
        partner_agreement_name: text(columns::PARTNER_AGREEMENT_NAME),
        reporter_agreement_name: text(columns::REPORTER_AGREEMENT_NAME),
        quota_name: text(columns::QUOTA_NAME),
        rule_text: text(columns::RULE_TEXT),
        link_text: text(columns::LINK_TEXT),
        link_url: text(columns::LINK_URL),
        country: Country::with_code(country_code),
        hs6: Hs6 {
            code: text(columns::HS6),
            description: text(columns::HS6_DESCRIPTION),
        },
        staging_basket: StagingBasket {
            id: staging_basket_id,
            name: text(columns::STAGING_BASKET),
        },
        product_type: ProductType {
            id: product_type_id,
            name: text(columns::PRODUCT_TYPE),
        },
        rates: Vec::new(),
    })
}
