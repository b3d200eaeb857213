use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field value as delivered by a source connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value as text.
    ///
    /// Integral numbers render without a fractional part so that numeric zip
    /// codes and parcel numbers compare equal to their text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text.as_str())),
            Self::Number(number) => Some(Cow::Owned(format_number(*number))),
            Self::Null => None,
        }
    }
}

fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One property listing from one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures and connectors alike.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text form of a field; `None` when the field is absent or null.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.fields.get(field).and_then(FieldValue::as_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// An ordered batch of records from a single source.
///
/// `headers` preserves the column order the source delivered, since
/// [`Record`] itself keys fields alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    pub source: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Where each record sits in its file: the line number for CSV, the array
    /// index for JSON. Parallel to `records`; empty when unknown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_rows: Vec<u64>,
}

impl RecordBatch {
    pub fn new(source: impl Into<String>, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            headers,
            records,
            source_rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source_rows(mut self, source_rows: Vec<u64>) -> Self {
        self.source_rows = source_rows;
        self
    }

    /// File location of the record at `position`, if it was recorded.
    pub fn source_row(&self, position: usize) -> Option<u64> {
        self.source_rows.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(FieldValue::Number(62704.0).as_text().as_deref(), Some("62704"));
        assert_eq!(FieldValue::Number(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::Null.as_text(), None);
    }

    #[test]
    fn record_text_skips_nulls() {
        let record = Record::new()
            .with("street", "123 Main St")
            .with("zip", FieldValue::Null);
        assert_eq!(record.text("street").as_deref(), Some("123 Main St"));
        assert_eq!(record.text("zip"), None);
        assert_eq!(record.text("city"), None);
    }

    #[test]
    fn source_rows_are_optional() {
        let batch = RecordBatch::new("county", vec!["apn".to_string()], vec![Record::new()]);
        assert_eq!(batch.source_row(0), None);
        let batch = batch.with_source_rows(vec![4]);
        assert_eq!(batch.source_row(0), Some(4));
        assert_eq!(batch.source_row(1), None);
    }
}
