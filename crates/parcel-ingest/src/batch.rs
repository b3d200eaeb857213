//! Record batch loading from CSV and JSON files.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use parcel_model::{FieldValue, Record, RecordBatch};
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Load a batch, choosing the parser from the file extension.
pub fn read_batch(path: &Path, source: &str) -> Result<RecordBatch> {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => read_csv_batch(path, source),
        Some("json") => read_json_batch(path, source),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a headed CSV file into a batch.
///
/// Empty cells become [`FieldValue::Null`]; every other cell stays text so
/// identifiers keep leading zeros. Short rows are padded with nulls and fully
/// empty rows are skipped; each record remembers its file line number. A
/// header name that appears twice is rejected.
pub fn read_csv_batch(path: &Path, source: &str) -> Result<RecordBatch> {
    let file = fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv_batch(file, source, path)
}

/// Parse CSV from any reader; `origin` is only used in error messages.
pub fn parse_csv_batch<R: Read>(reader: R, source: &str, origin: &Path) -> Result<RecordBatch> {
    let csv_error = |err: csv::Error| IngestError::CsvParse {
        path: origin.to_path_buf(),
        message: err.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let raw_headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw_headers.len());
    for name in raw_headers.iter().filter(|name| !name.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateHeader {
                path: origin.to_path_buf(),
                name: name.clone(),
            });
        }
        headers.push(name.clone());
    }

    let mut records = Vec::new();
    let mut source_rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        if row.iter().all(|value| normalize_cell(value).is_empty()) {
            continue;
        }
        source_rows.push(row.position().map_or(0, csv::Position::line));
        let mut record = Record::new();
        for (idx, name) in raw_headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let value = row.get(idx).map(normalize_cell).unwrap_or("");
            let value = if value.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::text(value)
            };
            record.insert(name.as_str(), value);
        }
        records.push(record);
    }
    debug!(
        path = %origin.display(),
        columns = headers.len(),
        records = records.len(),
        "csv batch loaded"
    );
    Ok(RecordBatch::new(source, headers, records).with_source_rows(source_rows))
}

/// Read a JSON array of objects into a batch.
pub fn read_json_batch(path: &Path, source: &str) -> Result<RecordBatch> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_batch(&text, source, path)
}

/// Parse a JSON batch.
///
/// Strings, fractional numbers and nulls map directly. Integers are kept as
/// their exact digits, since identifiers beyond 2^53 do not survive `f64`.
/// Booleans and nested values are kept as their JSON text rather than
/// rejected. Headers follow the key order of the file.
pub fn parse_json_batch(text: &str, source: &str, origin: &Path) -> Result<RecordBatch> {
    let parsed: Value = serde_json::from_str(text).map_err(|err| IngestError::JsonParse {
        path: origin.to_path_buf(),
        message: err.to_string(),
    })?;
    let Value::Array(items) = parsed else {
        return Err(IngestError::JsonParse {
            path: origin.to_path_buf(),
            message: "expected a top-level array of records".to_string(),
        });
    };
    let mut seen = BTreeSet::new();
    let mut headers = Vec::new();
    let mut records = Vec::with_capacity(items.len());
    let mut source_rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(IngestError::InvalidRecord {
                path: origin.to_path_buf(),
                index,
            });
        };
        let mut record = Record::new();
        for (name, value) in fields {
            if seen.insert(name.clone()) {
                headers.push(name.clone());
            }
            record.insert(name, json_field(value));
        }
        records.push(record);
        source_rows.push(index as u64);
    }
    debug!(
        path = %origin.display(),
        columns = headers.len(),
        records = records.len(),
        "json batch loaded"
    );
    Ok(RecordBatch::new(source, headers, records).with_source_rows(source_rows))
}

fn json_field(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::String(text) => FieldValue::Text(text),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            FieldValue::Text(number.to_string())
        }
        Value::Number(number) => match number.as_f64() {
            Some(float) => FieldValue::Number(float),
            None => FieldValue::Text(number.to_string()),
        },
        other => FieldValue::Text(other.to_string()),
    }
}
