use std::fs;
use std::path::{Path, PathBuf};

use parcel_core::{dedup_batch, strict_dedup};
use parcel_ingest::{
    IngestError, MergeReport, SourceCatalog, digest_file, parse_csv_batch, read_batch,
    read_csv_batch, read_json_batch, write_csv, write_csv_survivors, write_merge_report,
};
use parcel_model::{DedupStage, Entry, FieldValue};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

const LISTINGS_CSV: &str = "\u{feff}listing_id, street ,city,state,zip\n\
L-001,123 Main St,Springfield,il,62704-1111\n\
L-001,123 Main Street,Springfield,IL,62704\n\
,,,,\n\
L-002,45 Oak Ave,Salem,OR\n\
L-003,45 Oak Avenue,Salen,or,97301\n";

#[test]
fn reads_csv_with_bom_padding_and_blank_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "listings.csv", LISTINGS_CSV);
    let batch = read_csv_batch(&path, "mls").expect("read csv");

    assert_eq!(batch.source, "mls");
    assert_eq!(batch.headers, vec!["listing_id", "street", "city", "state", "zip"]);
    assert_eq!(batch.len(), 4);
    assert_eq!(
        batch.records[0].get("street"),
        Some(&FieldValue::text("123 Main St"))
    );
    // Short row is padded with nulls.
    assert_eq!(batch.records[2].get("zip"), Some(&FieldValue::Null));
    // Line numbers survive the skipped blank row.
    assert_eq!(batch.source_rows, vec![2, 3, 5, 6]);
}

#[test]
fn rejects_duplicate_csv_headers() {
    let err = parse_csv_batch(
        "zip,street, zip\n62704,1 Elm St,62705\n".as_bytes(),
        "mls",
        Path::new("dupes.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::DuplicateHeader { ref name, .. } if name == "zip"));
    assert_eq!(
        err.to_string(),
        "column 'zip' appears more than once in dupes.csv"
    );
}

#[test]
fn csv_keeps_leading_zeros_as_text() {
    let batch = parse_csv_batch(
        "apn,zip\n007-12,02134\n".as_bytes(),
        "assessor",
        Path::new("inline.csv"),
    )
    .expect("parse csv");
    assert_eq!(batch.records[0].get("zip"), Some(&FieldValue::text("02134")));
    assert_eq!(batch.records[0].get("apn"), Some(&FieldValue::text("007-12")));
}

#[test]
fn reads_json_batch_in_first_appearance_order() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "feed.json",
        r#"[
            {"zip": 98901, "street": "9 Cedar Ct", "listing_id": "P1", "lot_acres": 0.25},
            {"listing_id": "P2", "street": null, "unit": "4B", "vacant": true}
        ]"#,
    );
    let batch = read_batch(&path, "aggregator").expect("read json");
    assert_eq!(batch.len(), 2);
    assert_eq!(
        batch.headers,
        vec!["zip", "street", "listing_id", "lot_acres", "unit", "vacant"]
    );
    assert_eq!(batch.source_rows, vec![0, 1]);
    assert_eq!(batch.records[0].get("zip"), Some(&FieldValue::text("98901")));
    assert_eq!(batch.records[0].get("lot_acres"), Some(&FieldValue::Number(0.25)));
    assert_eq!(batch.records[1].get("street"), Some(&FieldValue::Null));
    assert_eq!(batch.records[1].get("vacant"), Some(&FieldValue::text("true")));
}

#[test]
fn json_integer_identifiers_stay_exact() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "parcels.json",
        r#"[{"apn": 9007199254740993}, {"apn": 9007199254740992}]"#,
    );
    let batch = read_json_batch(&path, "assessor").expect("read json");
    assert_eq!(
        batch.records[0].get("apn"),
        Some(&FieldValue::text("9007199254740993"))
    );

    let result = strict_dedup(Entry::enumerate(batch.records), &["apn".to_string()]);
    assert_eq!(result.survivors.len(), 2);
    assert!(result.merges.is_empty());
}

#[test]
fn rejects_non_object_json_records() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "bad.json", r#"[{"id": "1"}, 42]"#);
    let err = read_json_batch(&path, "mls").unwrap_err();
    assert!(matches!(err, IngestError::InvalidRecord { index: 1, .. }));

    let path = temp_file(&dir, "object.json", r#"{"id": "1"}"#);
    let err = read_json_batch(&path, "mls").unwrap_err();
    assert!(matches!(err, IngestError::JsonParse { .. }));
}

#[test]
fn rejects_unknown_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "feed.xlsx", "");
    let err = read_batch(&path, "mls").unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_csv_batch(&dir.path().join("absent.csv"), "mls").unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
}

#[test]
fn loads_catalog_with_custom_address_fields() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "sources.toml",
        r#"
[[source]]
name = "county"
strict_key_fields = ["apn", "unit"]
fuzzy_threshold = 97
address_field = "situs_street"

[source.address]
city = "situs_city"
"#,
    );
    let catalog = SourceCatalog::load(&path).expect("load catalog");
    let county = catalog.get("county").expect("county source");
    assert_eq!(county.fuzzy_threshold(), 97);
    assert_eq!(county.strict_key_fields(), ["apn", "unit"]);
    assert_eq!(
        county.address_components(),
        ["situs_street", "situs_city", "state", "zip"]
    );
}

#[test]
fn catalog_rejects_invalid_and_duplicate_sources() {
    let out_of_range = r#"
[[source]]
name = "mls"
strict_key_fields = ["listing_id"]
fuzzy_threshold = 101
"#;
    let err = SourceCatalog::from_toml_str(out_of_range).unwrap_err();
    assert!(matches!(err, IngestError::InvalidSource { ref name, .. } if name == "mls"));
    assert!(err.to_string().contains("101"));

    let err = SourceCatalog::from_toml_str("[[source]]\nname = 3\n").unwrap_err();
    assert!(matches!(err, IngestError::CatalogParse { .. }));

    let duplicate = r#"
[[source]]
name = "mls"
strict_key_fields = ["listing_id"]
tier = "clean"

[[source]]
name = "mls"
strict_key_fields = ["mls_number"]
tier = "noisy"
"#;
    let err = SourceCatalog::from_toml_str(duplicate).unwrap_err();
    assert!(matches!(err, IngestError::DuplicateSource { ref name } if name == "mls"));
}

#[test]
fn writes_survivors_and_merge_report() {
    let dir = TempDir::new().expect("temp dir");
    let input = temp_file(&dir, "listings.csv", LISTINGS_CSV);
    let batch = read_csv_batch(&input, "mls").expect("read csv");
    let catalog = SourceCatalog::builtin().expect("builtin catalog");
    let config = catalog
        .get("mls")
        .expect("mls source")
        .with_fuzzy_threshold(95)
        .expect("valid threshold");
    let headers = batch.headers.clone();
    let result = dedup_batch(batch.records, &config);
    assert_eq!(result.removed_by(DedupStage::Strict), 1);

    let survivors_path = dir.path().join("survivors.csv");
    write_csv_survivors(&survivors_path, &headers, &result).expect("write survivors");
    let reread = read_csv_batch(&survivors_path, "mls").expect("reread survivors");
    assert_eq!(reread.headers, headers);
    assert_eq!(reread.len(), result.survivors.len());

    let report = MergeReport::new(&config, &result).with_input(digest_file(&input).expect("digest"));
    let report_path = dir.path().join("merges.json");
    write_merge_report(&report_path, &report).expect("write report");
    let text = fs::read_to_string(&report_path).expect("read report");
    let parsed: MergeReport = serde_json::from_str(&text).expect("parse report");
    assert_eq!(parsed, report);
    assert_eq!(parsed.summary.input, 4);
    assert_eq!(parsed.input.map(|digest| digest.sha256.len()), Some(64));
}

#[test]
fn csv_writer_renders_nulls_as_empty_cells() {
    let batch = parse_csv_batch(
        "id,street,unit\n1,1 Elm St,\n2,2 Elm St,4B\n".as_bytes(),
        "mls",
        Path::new("inline.csv"),
    )
    .expect("parse csv");
    let config = SourceCatalog::builtin()
        .expect("builtin catalog")
        .get("mls")
        .expect("mls source")
        .clone();
    let result = dedup_batch(batch.records, &config);
    let mut out = Vec::new();
    write_csv(&mut out, &batch.headers, &result).expect("write csv");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "id,street,unit\n1,1 Elm St,\n2,2 Elm St,4B\n"
    );
}
