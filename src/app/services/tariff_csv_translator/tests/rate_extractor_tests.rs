//! Tests for scheme selection and per-year rate extraction

use super::super::rate_extractor::{
    RateScheme, RateSource, extract_rate, extract_rates_with_sources,
};
use super::{extract_rates, record_with};
use crate::app::models::Rate;

#[test]
fn test_scheme_selection_by_marker() {
    assert_eq!(RateScheme::for_country("USMCA"), RateScheme::RelativeYear);
    assert_eq!(RateScheme::for_country("USMCA-MEXICO"), RateScheme::RelativeYear);
    assert_eq!(RateScheme::for_country("CA-USMCA"), RateScheme::RelativeYear);
    assert_eq!(RateScheme::for_country("CHINA"), RateScheme::CalendarYear);
    // The marker is matched case-sensitively
    assert_eq!(RateScheme::for_country("usmca"), RateScheme::CalendarYear);
}

#[test]
fn test_scheme_columns_and_periods() {
    let relative = RateScheme::RelativeYear;
    assert_eq!(relative.primary_column(7), "YEAR7");
    assert_eq!(relative.alternate_column(7), "YEAR7_Alt");
    assert_eq!(relative.periods().count(), 30);

    let calendar = RateScheme::CalendarYear;
    assert_eq!(calendar.primary_column(2010), "Y2010");
    assert_eq!(calendar.alternate_column(2010), "Alt_2010");
    assert_eq!(calendar.periods().next(), Some(2004));
    assert_eq!(calendar.periods().last(), Some(2041));
}

#[test]
fn test_alternate_wins_over_primary() {
    let (record, mapping) = record_with(&["Y2010", "Alt_2010"], &["3.5", "See note"]);
    let rate = extract_rate(&record, &mapping, RateScheme::CalendarYear, 2010).unwrap();

    assert_eq!(rate, Some((Rate::new(2010, "See note"), RateSource::Alternate)));
}

#[test]
fn test_alternate_wins_even_over_unparsable_primary() {
    let (record, mapping) = record_with(&["YEAR4", "YEAR4_Alt"], &["n/a", "Free"]);
    let rates = extract_rates(&record, &mapping, RateScheme::RelativeYear).unwrap();

    assert_eq!(rates, vec![Rate::new(4, "Free")]);
}

#[test]
fn test_alternate_without_primary_column() {
    let (record, mapping) = record_with(&["Alt_2030"], &["Excluded"]);
    let rates = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap();

    assert_eq!(rates, vec![Rate::new(2030, "Excluded")]);
}

#[test]
fn test_zero_primary_is_skipped() {
    let (record, mapping) = record_with(&["Y2010", "Y2011", "Y2012"], &["0", "0.0", "-0"]);
    let rates = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap();

    assert!(rates.is_empty());
}

#[test]
fn test_non_zero_primary_keeps_source_text() {
    let (record, mapping) = record_with(&["Y2010", "Y2011"], &["3.50", "1e-1"]);
    let rates = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap();

    assert_eq!(rates, vec![Rate::new(2010, "3.50"), Rate::new(2011, "1e-1")]);
}

#[test]
fn test_unparsable_primary_fails() {
    let (record, mapping) = record_with(&["Y2015"], &["Free"]);
    let error = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap_err();

    assert_eq!(error.column, "Y2015");
    assert!(error.reason.contains("'Free'"));
}

#[test]
fn test_non_finite_primary_fails() {
    for value in ["inf", "-Infinity", "nan", "NaN"] {
        let (record, mapping) = record_with(&["Y2010"], &[value]);
        let error = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap_err();

        assert_eq!(error.column, "Y2010", "value {:?}", value);
    }
}

#[test]
fn test_rates_ascend_by_period() {
    let (record, mapping) = record_with(
        &["Y2041", "Alt_2004", "Y2020", "Y2005"],
        &["1", "Free", "2", "0"],
    );
    let rates = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap();

    let years: Vec<i32> = rates.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2004, 2020, 2041]);
}

#[test]
fn test_scheme_ignores_other_layout() {
    // Calendar columns mean nothing to the relative-year scheme and vice versa
    let (record, mapping) = record_with(&["Y2010", "YEAR1"], &["3.5", "4.5"]);

    let relative = extract_rates(&record, &mapping, RateScheme::RelativeYear).unwrap();
    assert_eq!(relative, vec![Rate::new(1, "4.5")]);

    let calendar = extract_rates(&record, &mapping, RateScheme::CalendarYear).unwrap();
    assert_eq!(calendar, vec![Rate::new(2010, "3.5")]);
}

#[test]
fn test_sources_reported() {
    let (record, mapping) = record_with(&["YEAR1", "YEAR1_Alt", "YEAR2"], &["0", "Free", "2.5"]);
    let extracted =
        extract_rates_with_sources(&record, &mapping, RateScheme::RelativeYear).unwrap();

    let sources: Vec<RateSource> = extracted.iter().map(|(_, source)| *source).collect();
    assert_eq!(sources, vec![RateSource::Alternate, RateSource::Primary]);
}
