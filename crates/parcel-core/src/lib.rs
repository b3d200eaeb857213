//! Property record deduplication engine.
//!
//! The engine is synchronous, performs no I/O, and keeps no state between
//! calls. Records and the per-source [`ThresholdConfig`](parcel_model::ThresholdConfig)
//! are read-only inputs; the only thing built is the returned
//! [`DedupResult`](parcel_model::DedupResult).

pub mod fuzzy;
pub mod partition;
pub mod pipeline;
pub mod similarity;
pub mod strict;

pub use fuzzy::{AddressKey, ClusterMode, PairDecision, decide_pair, fuzzy_dedup, fuzzy_dedup_with};
pub use partition::{Partition, partition_by_zip};
pub use pipeline::{DedupOptions, DedupPipeline, PartitionMode, dedup_batch};
pub use similarity::{MAX_SCORE, max_possible_score, similarity};
pub use strict::{KEY_SEPARATOR, strict_dedup, strict_key};
