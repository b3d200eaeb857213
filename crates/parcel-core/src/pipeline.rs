//! Batch dedup pipeline with a fixed stage order.
//!
//! # Stage Order
//!
//! 1. **Strict** - drop records whose composite identifier key was already seen
//! 2. **Fuzzy** - merge near-duplicate addresses among the strict survivors
//!
//! The order is not configurable: fuzzy dedup always sees strict survivors.
//!
//! # Example
//!
//! ```
//! use parcel_core::DedupPipeline;
//! use parcel_model::{Record, ThresholdConfig};
//!
//! let config = ThresholdConfig::new("mls", ["id"], 95, "street").unwrap();
//! let records = vec![
//!     Record::new().with("id", "1").with("street", "123 Main St"),
//!     Record::new().with("id", "1").with("street", "123 Main Street"),
//! ];
//! let result = DedupPipeline::new(&config).run(records);
//! assert_eq!(result.survivors.len(), 1);
//! ```

use std::time::Instant;

use parcel_model::{DedupResult, Entry, Record, ThresholdConfig};
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::fuzzy::{ClusterMode, fuzzy_dedup_with};
use crate::partition::partition_by_zip;
use crate::strict::strict_dedup;

/// Whether the fuzzy stage runs over the whole batch or per zip block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartitionMode {
    #[default]
    Whole,
    /// Compare only records sharing a normalized zip; blocks run in parallel.
    Zip,
}

impl PartitionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Zip => "zip",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupOptions {
    pub cluster_mode: ClusterMode,
    pub partition_mode: PartitionMode,
}

/// Runs strict then fuzzy dedup for one source batch.
#[derive(Debug, Clone, Copy)]
pub struct DedupPipeline<'a> {
    config: &'a ThresholdConfig,
    options: DedupOptions,
}

impl<'a> DedupPipeline<'a> {
    pub fn new(config: &'a ThresholdConfig) -> Self {
        Self {
            config,
            options: DedupOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DedupOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cluster_mode(mut self, mode: ClusterMode) -> Self {
        self.options.cluster_mode = mode;
        self
    }

    #[must_use]
    pub fn with_partition_mode(mut self, mode: PartitionMode) -> Self {
        self.options.partition_mode = mode;
        self
    }

    pub fn config(&self) -> &ThresholdConfig {
        self.config
    }

    pub fn options(&self) -> DedupOptions {
        self.options
    }

    pub fn run(&self, records: Vec<Record>) -> DedupResult {
        self.run_entries(Entry::enumerate(records))
    }

    /// Run both stages over entries that already carry input positions.
    pub fn run_entries(&self, entries: Vec<Entry>) -> DedupResult {
        let span = info_span!(
            "dedup",
            source = %self.config.source(),
            records = entries.len()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let mut strict = strict_dedup(entries, self.config.strict_key_fields());
        let strict_survivors = std::mem::take(&mut strict.survivors);
        let fuzzy = match self.options.partition_mode {
            PartitionMode::Whole => {
                fuzzy_dedup_with(strict_survivors, self.config, self.options.cluster_mode)
            }
            PartitionMode::Zip => self.fuzzy_by_zip(strict_survivors),
        };
        let result = strict.absorb(fuzzy);

        let summary = result.summary();
        info!(
            source = %self.config.source(),
            input = summary.input,
            strict_removed = summary.strict_removed,
            fuzzy_removed = summary.fuzzy_removed,
            survivors = summary.survivors,
            duration_ms = start.elapsed().as_millis(),
            "dedup complete"
        );
        result
    }

    fn fuzzy_by_zip(&self, entries: Vec<Entry>) -> DedupResult {
        let partitions = partition_by_zip(entries, self.config);
        debug!(partitions = partitions.len(), "fuzzy dedup partitioned by zip");
        let config = self.config;
        let mode = self.options.cluster_mode;
        let results: Vec<DedupResult> = partitions
            .into_par_iter()
            .map(|partition| fuzzy_dedup_with(partition.entries, config, mode))
            .collect();
        let mut combined = DedupResult::default();
        for result in results {
            combined.survivors.extend(result.survivors);
            combined.merges.extend(result.merges);
        }
        combined.survivors.sort_by_key(|entry| entry.position);
        combined.merges.sort_by_key(|merge| merge.removed);
        combined
    }
}

/// Strict then fuzzy dedup with default options.
pub fn dedup_batch(records: Vec<Record>, config: &ThresholdConfig) -> DedupResult {
    DedupPipeline::new(config).run(records)
}
