//! Loading record batches and source catalogs, and writing dedup results.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod output;

pub use batch::{parse_csv_batch, parse_json_batch, read_batch, read_csv_batch, read_json_batch};
pub use catalog::SourceCatalog;
pub use error::{IngestError, Result};
pub use output::{
    InputDigest, MergeReport, digest_file, sha256_hex, write_csv, write_csv_survivors,
    write_merge_report,
};
