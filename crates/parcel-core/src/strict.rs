//! Identity-level dedup on composite identifier keys.

use std::collections::BTreeMap;

use parcel_model::{DedupResult, Entry, Merge, Record};
use tracing::{debug, trace};

/// Separator between identifier values in a composite key.
pub const KEY_SEPARATOR: char = '|';

/// Build the composite strict key for a record.
///
/// Values are trimmed and joined in `key_fields` order. Returns `None` when
/// any field is absent, null, or blank; such records cannot be compared by
/// identity. Separator and escape characters inside values are escaped so
/// that `["a|b", "c"]` and `["a", "b|c"]` never collide.
pub fn strict_key(record: &Record, key_fields: &[String]) -> Option<String> {
    if key_fields.is_empty() {
        return None;
    }
    let mut composite = String::new();
    for (pos, field) in key_fields.iter().enumerate() {
        let value = record.text(field)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if pos > 0 {
            composite.push(KEY_SEPARATOR);
        }
        for ch in trimmed.chars() {
            if ch == KEY_SEPARATOR || ch == '\\' {
                composite.push('\\');
            }
            composite.push(ch);
        }
    }
    Some(composite)
}

/// Remove records whose strict key was already seen earlier in the batch.
///
/// The first record with a given key survives and every later one is
/// recorded as merged into it. Records without a key always survive.
/// Survivors keep their input order.
pub fn strict_dedup(entries: Vec<Entry>, key_fields: &[String]) -> DedupResult {
    let input = entries.len();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut result = DedupResult {
        survivors: Vec::with_capacity(input),
        merges: Vec::new(),
    };
    let mut unkeyed = 0usize;
    for entry in entries {
        let Some(key) = strict_key(&entry.record, key_fields) else {
            unkeyed += 1;
            result.survivors.push(entry);
            continue;
        };
        match seen.get(&key) {
            Some(&survivor) => {
                trace!(removed = entry.position, survivor, "strict duplicate");
                result.merges.push(Merge::strict(entry.position, survivor, key));
            }
            None => {
                seen.insert(key, entry.position);
                result.survivors.push(entry);
            }
        }
    }
    debug!(
        input,
        removed = result.merges.len(),
        unkeyed,
        "strict dedup complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_model::FieldValue;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_key_joins_in_field_order() {
        let record = Record::new().with("apn", " 12-34 ").with("county", "Benton");
        assert_eq!(
            strict_key(&record, &fields(&["county", "apn"])).as_deref(),
            Some("Benton|12-34")
        );
    }

    #[test]
    fn test_key_requires_every_field() {
        let record = Record::new()
            .with("apn", "1234")
            .with("county", "  ")
            .with("unit", FieldValue::Null);
        assert_eq!(strict_key(&record, &fields(&["apn", "county"])), None);
        assert_eq!(strict_key(&record, &fields(&["apn", "unit"])), None);
        assert_eq!(strict_key(&record, &fields(&["apn", "missing"])), None);
        assert_eq!(strict_key(&record, &[]), None);
    }

    #[test]
    fn test_separator_inside_values_is_escaped() {
        let left = Record::new().with("a", "x|y").with("b", "z");
        let right = Record::new().with("a", "x").with("b", "y|z");
        let keys = fields(&["a", "b"]);
        assert_ne!(strict_key(&left, &keys), strict_key(&right, &keys));
        assert_eq!(strict_key(&left, &keys).as_deref(), Some("x\\|y|z"));
    }

    #[test]
    fn test_numeric_and_text_ids_share_a_key() {
        let keys = fields(&["id"]);
        let text = Record::new().with("id", "42");
        let number = Record::new().with("id", 42_i64);
        assert_eq!(strict_key(&text, &keys), strict_key(&number, &keys));
    }
}
