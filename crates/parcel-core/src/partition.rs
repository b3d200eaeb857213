//! Zip-code blocking for the pairwise fuzzy pass.

use std::collections::BTreeMap;

use parcel_model::{Entry, ThresholdConfig};
use parcel_normalize::AddressParts;

/// Entries sharing one normalized five-character zip.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Empty for records without a zip.
    pub zip: String,
    pub entries: Vec<Entry>,
}

/// Group entries by normalized zip.
///
/// Input order is preserved inside each partition; partitions are ordered by
/// the first appearance of their zip. Records without a zip share one
/// partition.
pub fn partition_by_zip(entries: Vec<Entry>, config: &ThresholdConfig) -> Vec<Partition> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut partitions: Vec<Partition> = Vec::new();
    for entry in entries {
        let zip = AddressParts::from_record(&entry.record, config)
            .zip5()
            .to_string();
        let slot = match index.get(&zip) {
            Some(&slot) => slot,
            None => {
                index.insert(zip.clone(), partitions.len());
                partitions.push(Partition {
                    zip,
                    entries: Vec::new(),
                });
                partitions.len() - 1
            }
        };
        partitions[slot].entries.push(entry);
    }
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_model::Record;

    #[test]
    fn test_partitions_follow_first_appearance() {
        let config = ThresholdConfig::new("t", ["id"], 95, "street").unwrap();
        let zips = ["99352-1234", "", "62704", "99352", " 62704 "];
        let entries = Entry::enumerate(
            zips.iter()
                .map(|zip| Record::new().with("zip", *zip))
                .collect(),
        );
        let partitions = partition_by_zip(entries, &config);
        let shape: Vec<(&str, Vec<usize>)> = partitions
            .iter()
            .map(|partition| {
                (
                    partition.zip.as_str(),
                    partition.entries.iter().map(|entry| entry.position).collect(),
                )
            })
            .collect();
        assert_eq!(
            shape,
            vec![("99352", vec![0, 3]), ("", vec![1]), ("62704", vec![2, 4])]
        );
    }
}
