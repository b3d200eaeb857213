pub mod config;
pub mod dedup;
pub mod error;
pub mod record;

pub use config::{
    AddressFields, DEFAULT_STREET_FIELD, DefaultTier, MAX_THRESHOLD, RawThresholdConfig,
    ThresholdConfig, ThresholdConfigBuilder,
};
pub use dedup::{DedupResult, DedupStage, DedupSummary, Entry, Merge};
pub use error::{ConfigurationError, Result};
pub use record::{FieldValue, Record, RecordBatch};
