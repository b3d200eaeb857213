//! Writers for dedup results: surviving records and the merge report.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parcel_model::{DedupResult, DedupSummary, Merge, ThresholdConfig};
use serde::{Deserialize, Serialize};
use sha2::Digest;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Input file fingerprint recorded alongside the merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDigest {
    pub path: PathBuf,
    pub sha256: String,
}

/// Audit trail for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub source: String,
    pub fuzzy_threshold: u8,
    pub strict_key_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputDigest>,
    pub summary: DedupSummary,
    pub merges: Vec<Merge>,
}

impl MergeReport {
    pub fn new(config: &ThresholdConfig, result: &DedupResult) -> Self {
        Self {
            source: config.source().to_string(),
            fuzzy_threshold: config.fuzzy_threshold(),
            strict_key_fields: config.strict_key_fields().to_vec(),
            input: None,
            summary: result.summary(),
            merges: result.merges.clone(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: InputDigest) -> Self {
        self.input = Some(input);
        self
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}

/// Fingerprint an input file for the merge report.
pub fn digest_file(path: &Path) -> Result<InputDigest> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InputDigest {
        path: path.to_path_buf(),
        sha256: sha256_hex(&bytes),
    })
}

pub fn write_merge_report(path: &Path, report: &MergeReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|err| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: std::io::Error::other(err),
    })?;
    fs::write(path, json).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), merges = report.merges.len(), "merge report written");
    Ok(())
}

/// Write surviving records as CSV using the batch's column order.
pub fn write_csv_survivors(path: &Path, headers: &[String], result: &DedupResult) -> Result<()> {
    let write_error = |source: std::io::Error| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(write_error)?;
    write_csv(file, headers, result).map_err(write_error)?;
    debug!(
        path = %path.display(),
        records = result.survivors.len(),
        "survivors written"
    );
    Ok(())
}

/// Write surviving records as CSV to any writer. Nulls and missing fields
/// become empty cells.
pub fn write_csv<W: Write>(writer: W, headers: &[String], result: &DedupResult) -> std::io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers).map_err(std::io::Error::other)?;
    for record in result.survivor_records() {
        let row: Vec<String> = headers
            .iter()
            .map(|name| record.text(name).map(Cow::into_owned).unwrap_or_default())
            .collect();
        csv.write_record(&row).map_err(std::io::Error::other)?;
    }
    csv.flush()
}
