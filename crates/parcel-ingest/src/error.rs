//! Error types for batch loading and result writing.

use std::path::PathBuf;

use parcel_model::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while reading batches, catalogs, or writing results.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input extension is neither CSV nor JSON.
    #[error("unsupported input format for {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("failed to parse JSON {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    #[error("column '{name}' appears more than once in {path}")]
    DuplicateHeader { path: PathBuf, name: String },

    /// A JSON batch element is not an object.
    #[error("record {index} in {path} is not a JSON object")]
    InvalidRecord { path: PathBuf, index: usize },

    // === Source Catalog Errors ===
    #[error("failed to parse source catalog {origin}: {message}")]
    CatalogParse { origin: String, message: String },

    #[error("source '{name}' is defined more than once")]
    DuplicateSource { name: String },

    #[error("unknown source '{name}' (known: {known})")]
    UnknownSource { name: String, known: String },

    /// A catalog entry parsed but failed validation.
    #[error("invalid source '{name}': {source}")]
    InvalidSource {
        name: String,
        #[source]
        source: ConfigurationError,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::UnknownSource {
            name: "zillow".to_string(),
            known: "aggregator, assessor, mls".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown source 'zillow' (known: aggregator, assessor, mls)"
        );
    }

    #[test]
    fn test_invalid_source_keeps_configuration_cause() {
        use std::error::Error as _;

        let err = IngestError::InvalidSource {
            name: "county".to_string(),
            source: ConfigurationError::EmptyKeyFields,
        };
        assert_eq!(
            err.to_string(),
            "invalid source 'county': strict key field list must not be empty"
        );
        assert!(err.source().is_some());
    }
}
