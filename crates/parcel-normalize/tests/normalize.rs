//! Tests for string and address normalization.

use parcel_model::{AddressFields, Record, ThresholdConfig};
use parcel_normalize::{
    AddressParts, normalize_address, normalize_record_address, normalize_string, street_number,
};
use proptest::prelude::*;

#[test]
fn scenario_addresses_normalize_identically() {
    let first = normalize_address("123 Main St", "Springfield", "il", "62704-1111");
    let second = normalize_address("123 Main Street", "Springfield", "IL", "62704");
    assert_eq!(first, "123 Main St Springfield IL 62704");
    assert_eq!(second, "123 Main St Springfield IL 62704");
}

#[test]
fn punctuation_and_case_noise_is_removed() {
    assert_eq!(
        normalize_address("  123  main st.,", "SPRING-FIELD", "Il", "62704"),
        "123 Main St Springfield IL 62704"
    );
}

#[test]
fn configured_field_names_are_used() {
    let config = ThresholdConfig::builder("assessor")
        .strict_key_fields(["apn"])
        .fuzzy_threshold(96)
        .address_field("situs_street")
        .address_fields(AddressFields {
            city: "situs_city".to_string(),
            state: "situs_state".to_string(),
            zip: "situs_zip".to_string(),
        })
        .build()
        .unwrap();
    let record = Record::new()
        .with("situs_street", "18 Birch Lane")
        .with("situs_city", "richland")
        .with("situs_state", "wa")
        .with("situs_zip", "99352-1234")
        .with("street", "ignored");
    assert_eq!(
        normalize_record_address(&record, &config),
        "18 Birch Ln Richland WA 99352"
    );
    assert_eq!(
        AddressParts::from_record(&record, &config).street_number(),
        Some(18)
    );
}

#[test]
fn records_missing_the_same_component_compare_equal() {
    let config = ThresholdConfig::new("mls", ["id"], 95, "street").unwrap();
    let a = Record::new().with("street", "1 Elm St").with("state", "TX");
    let b = Record::new().with("street", "1 elm st").with("state", "tx");
    assert_eq!(
        normalize_record_address(&a, &config),
        normalize_record_address(&b, &config)
    );
}

#[test]
fn street_number_reads_raw_street() {
    assert_eq!(street_number("123 Main St"), Some(123));
    assert_eq!(street_number("124 Main St"), Some(124));
    assert_eq!(street_number("Main St"), None);
}

proptest! {
    #[test]
    fn normalize_address_is_deterministic(
        street in "[ -~]{0,30}",
        city in "[ -~]{0,20}",
        state in "[ -~]{0,4}",
        zip in "[ -~]{0,12}",
    ) {
        let first = normalize_address(&street, &city, &state, &zip);
        let second = normalize_address(&street, &city, &state, &zip);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn normalize_string_is_idempotent(text in "[ -~\t]{0,40}") {
        let once = normalize_string(&text);
        prop_assert_eq!(normalize_string(&once), once.clone());
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn leading_digits_are_the_street_number(number in 0u32..1_000_000, rest in "[A-Za-z ]{0,20}") {
        let street = format!("{number} {rest}");
        prop_assert_eq!(street_number(&street), Some(u64::from(number)));
    }
}
