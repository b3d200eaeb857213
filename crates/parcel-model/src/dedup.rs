//! Dedup outcome and merge provenance.
//!
//! Every record removed by either dedup stage leaves a [`Merge`] behind that
//! names the surviving record it was folded into. Positions always refer to
//! the record's index in the batch originally handed to the pipeline, so
//! provenance stays meaningful after the strict stage has already dropped
//! rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A record tagged with its position in the original input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub position: usize,
    pub record: Record,
}

impl Entry {
    pub fn new(position: usize, record: Record) -> Self {
        Self { position, record }
    }

    /// Tag a raw batch with input positions.
    pub fn enumerate(records: Vec<Record>) -> Vec<Entry> {
        records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Entry { position, record })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStage {
    Strict,
    Fuzzy,
}

impl DedupStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// One removed record and the survivor it was merged into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    pub removed: usize,
    pub survivor: usize,
    pub stage: DedupStage,
    /// Similarity score that justified a fuzzy merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// Composite identifier shared by a strict merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Merge {
    pub fn strict(removed: usize, survivor: usize, key: impl Into<String>) -> Self {
        Self {
            removed,
            survivor,
            stage: DedupStage::Strict,
            score: None,
            key: Some(key.into()),
        }
    }

    pub fn fuzzy(removed: usize, survivor: usize, score: u8) -> Self {
        Self {
            removed,
            survivor,
            stage: DedupStage::Fuzzy,
            score: Some(score),
            key: None,
        }
    }
}

/// Surviving records plus provenance for everything removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupResult {
    pub survivors: Vec<Entry>,
    pub merges: Vec<Merge>,
}

impl DedupResult {
    /// A result in which nothing was merged.
    pub fn passthrough(entries: Vec<Entry>) -> Self {
        Self {
            survivors: entries,
            merges: Vec::new(),
        }
    }

    pub fn survivor_records(&self) -> impl Iterator<Item = &Record> {
        self.survivors.iter().map(|entry| &entry.record)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.survivors.into_iter().map(|entry| entry.record).collect()
    }

    pub fn survivor_positions(&self) -> Vec<usize> {
        self.survivors.iter().map(|entry| entry.position).collect()
    }

    /// The record a removed position was directly merged into.
    pub fn merged_into(&self, position: usize) -> Option<usize> {
        self.merges
            .iter()
            .find(|merge| merge.removed == position)
            .map(|merge| merge.survivor)
    }

    /// Follow merge links until reaching a record that was never removed.
    ///
    /// A strict survivor can itself be removed by the fuzzy stage, so a
    /// record may be two hops away from its final representative.
    pub fn final_survivor(&self, position: usize) -> usize {
        let links: BTreeMap<usize, usize> = self
            .merges
            .iter()
            .map(|merge| (merge.removed, merge.survivor))
            .collect();
        let mut current = position;
        let mut hops = 0;
        while let Some(next) = links.get(&current) {
            current = *next;
            hops += 1;
            if hops > links.len() {
                break;
            }
        }
        current
    }

    pub fn removed_count(&self) -> usize {
        self.merges.len()
    }

    pub fn removed_by(&self, stage: DedupStage) -> usize {
        self.merges.iter().filter(|merge| merge.stage == stage).count()
    }

    /// Chain a later stage onto this one: the later stage's survivors replace
    /// ours and its merges are appended after ours.
    #[must_use]
    pub fn absorb(mut self, next: DedupResult) -> DedupResult {
        self.merges.extend(next.merges);
        DedupResult {
            survivors: next.survivors,
            merges: self.merges,
        }
    }

    pub fn summary(&self) -> DedupSummary {
        DedupSummary {
            input: self.survivors.len() + self.merges.len(),
            strict_removed: self.removed_by(DedupStage::Strict),
            fuzzy_removed: self.removed_by(DedupStage::Fuzzy),
            survivors: self.survivors.len(),
        }
    }
}

/// Counts for reporting one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSummary {
    pub input: usize,
    pub strict_removed: usize,
    pub fuzzy_removed: usize,
    pub survivors: usize,
}
