//! Near-duplicate detection on normalized addresses.
//!
//! Two records are candidates when the similarity of their normalized
//! addresses reaches the source threshold. Before the score is consulted, the
//! street-number tie-break runs: when both raw street fields start with a
//! parseable house number and the numbers differ, the pair never merges.
//! "123 Main St" and "124 Main St" stay distinct at any threshold.
//!
//! The pass is pairwise and therefore O(n²) in the batch size. Large batches
//! should be partitioned first (see [`partition_by_zip`](crate::partition_by_zip)).

use parcel_model::{DedupResult, Entry, Merge, ThresholdConfig};
use parcel_normalize::AddressParts;
use tracing::{debug, trace};

use crate::similarity::{max_possible_score, similarity};

/// How matching pairs are turned into groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusterMode {
    /// Each record merges into the earliest surviving record it matches.
    /// Merged records are never compared again, so long chains of
    /// near-duplicates can under-merge.
    #[default]
    FirstMatch,
    /// Matching pairs are unioned into equivalence classes; the earliest
    /// record of each class survives.
    Transitive,
}

impl ClusterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstMatch => "first-match",
            Self::Transitive => "transitive",
        }
    }
}

/// Outcome of comparing one pair of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairDecision {
    /// Both house numbers parsed and differ; similarity was not consulted.
    StreetNumberMismatch { left: u64, right: u64 },
    /// `score` is the length-based upper bound when the edit distance was
    /// skipped.
    BelowThreshold { score: u8 },
    Match { score: u8 },
}

impl PairDecision {
    pub fn is_match(self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Per-record comparison data, computed once per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressKey {
    pub normalized: String,
    pub street_number: Option<u64>,
    char_len: usize,
}

impl AddressKey {
    pub fn from_parts(parts: &AddressParts<'_>) -> Self {
        let normalized = parts.normalize();
        Self {
            char_len: normalized.chars().count(),
            street_number: parts.street_number(),
            normalized,
        }
    }

    pub fn from_entry(entry: &Entry, config: &ThresholdConfig) -> Self {
        Self::from_parts(&AddressParts::from_record(&entry.record, config))
    }
}

/// Apply the tie-break, then the threshold, to one pair.
pub fn decide_pair(left: &AddressKey, right: &AddressKey, threshold: u8) -> PairDecision {
    if let (Some(l), Some(r)) = (left.street_number, right.street_number)
        && l != r
    {
        return PairDecision::StreetNumberMismatch { left: l, right: r };
    }
    let ceiling = max_possible_score(left.char_len, right.char_len);
    if ceiling < threshold {
        return PairDecision::BelowThreshold { score: ceiling };
    }
    let score = similarity(&left.normalized, &right.normalized);
    if score >= threshold {
        PairDecision::Match { score }
    } else {
        PairDecision::BelowThreshold { score }
    }
}

/// Fuzzy dedup with the default [`ClusterMode::FirstMatch`] policy.
///
/// Expects the survivors of [`strict_dedup`](crate::strict_dedup); running it
/// on raw input is slower but not incorrect.
pub fn fuzzy_dedup(entries: Vec<Entry>, config: &ThresholdConfig) -> DedupResult {
    fuzzy_dedup_with(entries, config, ClusterMode::FirstMatch)
}

pub fn fuzzy_dedup_with(
    entries: Vec<Entry>,
    config: &ThresholdConfig,
    mode: ClusterMode,
) -> DedupResult {
    let threshold = config.fuzzy_threshold();
    let keys: Vec<AddressKey> = entries
        .iter()
        .map(|entry| AddressKey::from_entry(entry, config))
        .collect();
    let assignments = match mode {
        ClusterMode::FirstMatch => first_match(&entries, &keys, threshold),
        ClusterMode::Transitive => transitive(&entries, &keys, threshold),
    };
    let result = collect_result(entries, &assignments);
    debug!(
        input = keys.len(),
        removed = result.merges.len(),
        threshold,
        mode = mode.as_str(),
        "fuzzy dedup complete"
    );
    result
}

/// For each index: `None` when it survives, otherwise the index it merges
/// into and the score reported for the merge.
type Assignments = Vec<Option<(usize, u8)>>;

fn first_match(entries: &[Entry], keys: &[AddressKey], threshold: u8) -> Assignments {
    let count = keys.len();
    let mut assigned: Assignments = vec![None; count];
    for i in 0..count {
        if assigned[i].is_some() {
            continue;
        }
        for j in (i + 1)..count {
            if assigned[j].is_some() {
                continue;
            }
            let decision = decide_pair(&keys[i], &keys[j], threshold);
            trace_decision(&entries[i], &entries[j], decision);
            if let PairDecision::Match { score } = decision {
                assigned[j] = Some((i, score));
            }
        }
    }
    assigned
}

fn transitive(entries: &[Entry], keys: &[AddressKey], threshold: u8) -> Assignments {
    let count = keys.len();
    let mut sets = DisjointSet::new(count);
    let mut best_score = vec![0u8; count];
    for i in 0..count {
        for j in (i + 1)..count {
            let decision = decide_pair(&keys[i], &keys[j], threshold);
            trace_decision(&entries[i], &entries[j], decision);
            if let PairDecision::Match { score } = decision {
                sets.union(i, j);
                best_score[i] = best_score[i].max(score);
                best_score[j] = best_score[j].max(score);
            }
        }
    }
    (0..count)
        .map(|idx| {
            let root = sets.find(idx);
            (root != idx).then_some((root, best_score[idx]))
        })
        .collect()
}

fn trace_decision(left: &Entry, right: &Entry, decision: PairDecision) {
    trace!(
        left = left.position,
        right = right.position,
        ?decision,
        "fuzzy pair"
    );
}

fn collect_result(entries: Vec<Entry>, assignments: &Assignments) -> DedupResult {
    let positions: Vec<usize> = entries.iter().map(|entry| entry.position).collect();
    let mut result = DedupResult {
        survivors: Vec::with_capacity(entries.len()),
        merges: Vec::new(),
    };
    for (idx, entry) in entries.into_iter().enumerate() {
        match assignments[idx] {
            Some((survivor, score)) => {
                result
                    .merges
                    .push(Merge::fuzzy(entry.position, positions[survivor], score));
            }
            None => result.survivors.push(entry),
        }
    }
    result
}

/// Union-find over batch indices whose root is always the smallest member.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = idx;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return;
        }
        let (low, high) = if left_root < right_root {
            (left_root, right_root)
        } else {
            (right_root, left_root)
        };
        self.parent[high] = low;
    }
}
