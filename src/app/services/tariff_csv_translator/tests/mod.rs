//! Test utilities for tariff CSV translator testing
//!
//! This module provides helper functions and sample documents used across
//! the translator test modules.

use csv::StringRecord;

use super::column_mapping::ColumnMapping;
use super::field_parsers::FieldError;
use super::rate_extractor::{RateScheme, extract_rates_with_sources};
use crate::app::models::Rate;

mod rate_extractor_tests;

/// Build a record and its column mapping from parallel header/value lists
pub fn record_with(headers: &[&str], values: &[&str]) -> (StringRecord, ColumnMapping) {
    let header_record = StringRecord::from(headers.to_vec());
    let mapping = ColumnMapping::analyze(&header_record).unwrap();
    (StringRecord::from(values.to_vec()), mapping)
}

/// Rates of a record without their sources
pub fn extract_rates(
    record: &StringRecord,
    mapping: &ColumnMapping,
    scheme: RateScheme,
) -> Result<Vec<Rate>, FieldError> {
    Ok(extract_rates_with_sources(record, mapping, scheme)?
        .into_iter()
        .map(|(rate, _)| rate)
        .collect())
}

/// Calendar-year document with every scalar column and two data rows
pub fn create_test_tariff_csv() -> String {
    r#"ID,TL,TL_Desc,Sector_Code,Base_Rate,Base_Rate_Alt,Final_Year,TRQ_Quota,TRQ_Note,Tariff_Eliminated,PartnerName,ReporterName,PartnerStartYear,ReporterStartYear,PartnerAgreementName,ReporterAgreementName,QuotaName,Rule_Text,Link_Text,Link_Url,HS6,HS6_Desc,StagingBasketId,StagingBasket,Product_Type,ProductType,Y2004,Alt_2004,Y2005,Alt_2005,Y2006,Alt_2006
101,01012100,Pure-bred breeding horses,AG,5.5,,2006,,,true,United States,Korea,2004,2004,KORUS,KORUS,,,See schedule,https://example.gov/korus,010121,Horses,1,Immediate,2,Agricultural,5.5,,0,,0,Free
102,01019000, Other live horses ,AG,8,,N/A,150,Quota applies,FALSE,United States,Korea,,,,,Horse quota,Rule 3,,,010190,Other horses,4,Ten-year linear,2,Agricultural,8,,6.4,,,Excluded"#
        .to_string()
}

/// Relative-year document for a trilateral-agreement partner
pub fn create_relative_year_csv() -> String {
    r#"ID,StagingBasketId,Product_Type,YEAR1,YEAR1_Alt,YEAR2,YEAR2_Alt,YEAR3,YEAR30
7,5,2,0,Free,2.5,,0,1.25
8,5,2,,,,,,"#
        .to_string()
}
