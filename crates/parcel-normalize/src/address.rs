//! Postal address canonicalization.

use std::borrow::Cow;

use parcel_model::{Record, ThresholdConfig};

use crate::street::{standardize_street, street_number};
use crate::text::normalize_string;

/// Number of leading zip characters kept; ZIP+4 extensions are dropped.
pub const ZIP_LENGTH: usize = 5;

/// Separator between the four normalized components.
pub const COMPONENT_SEPARATOR: char = ' ';

/// Build the canonical comparison form of an address.
///
/// Street and city are string-normalized (the street also has its designators
/// abbreviated), the state is trimmed and uppercased, and the zip is cut to
/// its first five characters. Empty components keep their slot in the join.
///
/// # Examples
///
/// ```
/// use parcel_normalize::normalize_address;
///
/// assert_eq!(
///     normalize_address("123 Main Street", "springfield", "il", "62704-1111"),
///     "123 Main St Springfield IL 62704"
/// );
/// ```
pub fn normalize_address(street: &str, city: &str, state: &str, zip: &str) -> String {
    let street = standardize_street(&normalize_string(street));
    let city = normalize_string(city);
    let state = state.trim().to_uppercase();
    let zip = truncate_zip(zip);
    let mut out = String::with_capacity(street.len() + city.len() + state.len() + zip.len() + 3);
    for (idx, part) in [street.as_str(), city.as_str(), state.as_str(), zip].iter().enumerate() {
        if idx > 0 {
            out.push(COMPONENT_SEPARATOR);
        }
        out.push_str(part);
    }
    out
}

/// First five characters of a trimmed zip, counted in chars.
pub fn truncate_zip(zip: &str) -> &str {
    let trimmed = zip.trim();
    match trimmed.char_indices().nth(ZIP_LENGTH) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    }
}

/// The four raw address components of one record.
///
/// Missing and null fields read as empty strings; numbers render through
/// [`FieldValue::as_text`](parcel_model::FieldValue::as_text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts<'a> {
    pub street: Cow<'a, str>,
    pub city: Cow<'a, str>,
    pub state: Cow<'a, str>,
    pub zip: Cow<'a, str>,
}

impl<'a> AddressParts<'a> {
    pub fn from_record(record: &'a Record, config: &ThresholdConfig) -> Self {
        let [street, city, state, zip] = config.address_components();
        let read = |field: &str| record.text(field).unwrap_or(Cow::Borrowed(""));
        Self {
            street: read(street),
            city: read(city),
            state: read(state),
            zip: read(zip),
        }
    }

    pub fn normalize(&self) -> String {
        normalize_address(&self.street, &self.city, &self.state, &self.zip)
    }

    pub fn street_number(&self) -> Option<u64> {
        street_number(&self.street)
    }

    pub fn zip5(&self) -> &str {
        truncate_zip(&self.zip)
    }
}

/// Normalized address of a record, resolved through the source's field names.
pub fn normalize_record_address(record: &Record, config: &ThresholdConfig) -> String {
    AddressParts::from_record(record, config).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_model::FieldValue;

    fn config() -> ThresholdConfig {
        ThresholdConfig::new("test", ["id"], 95, "street").unwrap()
    }

    #[test]
    fn test_zip_truncation_counts_chars() {
        assert_eq!(truncate_zip("99352-1234"), "99352");
        assert_eq!(truncate_zip(" 627 "), "627");
        assert_eq!(truncate_zip("ÄÖÜßéx"), "ÄÖÜßé");
    }

    #[test]
    fn test_state_is_only_uppercased() {
        assert_eq!(normalize_address("", "", " n.y. ", ""), "  N.Y. ");
    }

    #[test]
    fn test_missing_components_keep_their_slot() {
        let record = Record::new()
            .with("street", "5 Oak Rd")
            .with("zip", FieldValue::Null);
        assert_eq!(normalize_record_address(&record, &config()), "5 Oak Rd   ");
    }

    #[test]
    fn test_numeric_zip_is_rendered_as_digits() {
        let record = Record::new()
            .with("street", "5 Oak Rd")
            .with("city", "Salem")
            .with("state", "or")
            .with("zip", 97301_i64);
        let parts = AddressParts::from_record(&record, &config());
        assert_eq!(parts.normalize(), "5 Oak Rd Salem OR 97301");
        assert_eq!(parts.street_number(), Some(5));
        assert_eq!(parts.zip5(), "97301");
    }
}
