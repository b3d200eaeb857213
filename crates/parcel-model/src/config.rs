//! Per-source threshold policy.
//!
//! A [`ThresholdConfig`] tells both deduplicators how to treat one source's
//! batch: which identifier fields form the strict key, how similar two
//! normalized addresses must be before they merge, and which fields hold the
//! address components. Values are validated once at construction and are
//! immutable afterwards, so a batch call never observes a half-valid policy.
//!
//! Deserialization goes through [`RawThresholdConfig`] and the same
//! validation, so a source catalog file cannot bypass it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// Upper bound of the similarity scale.
pub const MAX_THRESHOLD: u8 = 100;

/// Field name used for the street component when none is configured.
pub const DEFAULT_STREET_FIELD: &str = "street";

/// Documented production thresholds, by how noisy a source's address text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTier {
    /// Cleanest feeds; only near-identical addresses merge.
    Clean,
    Moderate,
    /// Noisiest feeds; tolerates the most textual variation.
    Noisy,
}

impl DefaultTier {
    pub const fn threshold(self) -> u8 {
        match self {
            Self::Clean => 98,
            Self::Moderate => 96,
            Self::Noisy => 95,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Moderate => "moderate",
            Self::Noisy => "noisy",
        }
    }
}

/// Names of the city, state and zip fields that accompany the street field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressFields {
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Default for AddressFields {
    fn default() -> Self {
        Self {
            city: "city".to_string(),
            state: "state".to_string(),
            zip: "zip".to_string(),
        }
    }
}

/// Unvalidated form of [`ThresholdConfig`], as written in a source catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawThresholdConfig {
    #[serde(rename = "name")]
    pub source: String,
    pub strict_key_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<DefaultTier>,
    #[serde(default = "default_street_field")]
    pub address_field: String,
    #[serde(default)]
    pub address: AddressFields,
}

fn default_street_field() -> String {
    DEFAULT_STREET_FIELD.to_string()
}

/// Validated per-source dedup policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholdConfig", into = "RawThresholdConfig")]
pub struct ThresholdConfig {
    source: String,
    strict_key_fields: Vec<String>,
    fuzzy_threshold: u8,
    address_field: String,
    address: AddressFields,
}

impl ThresholdConfig {
    /// Build a config with the default city/state/zip field names.
    pub fn new<I, S>(
        source: impl Into<String>,
        strict_key_fields: I,
        fuzzy_threshold: i64,
        address_field: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(source)
            .strict_key_fields(strict_key_fields)
            .fuzzy_threshold(fuzzy_threshold)
            .address_field(address_field)
            .build()
    }

    pub fn builder(source: impl Into<String>) -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::new(source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn strict_key_fields(&self) -> &[String] {
        &self.strict_key_fields
    }

    pub fn fuzzy_threshold(&self) -> u8 {
        self.fuzzy_threshold
    }

    /// Name of the street field.
    pub fn address_field(&self) -> &str {
        &self.address_field
    }

    pub fn address_fields(&self) -> &AddressFields {
        &self.address
    }

    /// The four address component field names: street, city, state, zip.
    pub fn address_components(&self) -> [&str; 4] {
        [
            self.address_field.as_str(),
            self.address.city.as_str(),
            self.address.state.as_str(),
            self.address.zip.as_str(),
        ]
    }

    /// Copy of this config with a different threshold, validated the same way.
    pub fn with_fuzzy_threshold(&self, fuzzy_threshold: i64) -> Result<Self> {
        let mut raw = RawThresholdConfig::from(self.clone());
        raw.fuzzy_threshold = Some(fuzzy_threshold);
        raw.tier = None;
        Self::try_from(raw)
    }
}

impl TryFrom<RawThresholdConfig> for ThresholdConfig {
    type Error = ConfigurationError;

    fn try_from(raw: RawThresholdConfig) -> Result<Self> {
        let source = raw.source.trim().to_string();
        if source.is_empty() {
            return Err(ConfigurationError::BlankSourceName);
        }
        let fuzzy_threshold = resolve_threshold(&source, raw.fuzzy_threshold, raw.tier)?;
        let strict_key_fields = validate_key_fields(raw.strict_key_fields)?;
        let address_field = raw.address_field.trim().to_string();
        let address = AddressFields {
            city: raw.address.city.trim().to_string(),
            state: raw.address.state.trim().to_string(),
            zip: raw.address.zip.trim().to_string(),
        };
        validate_address_fields(&address_field, &address)?;
        Ok(Self {
            source,
            strict_key_fields,
            fuzzy_threshold,
            address_field,
            address,
        })
    }
}

impl From<ThresholdConfig> for RawThresholdConfig {
    fn from(config: ThresholdConfig) -> Self {
        Self {
            source: config.source,
            strict_key_fields: config.strict_key_fields,
            fuzzy_threshold: Some(i64::from(config.fuzzy_threshold)),
            tier: None,
            address_field: config.address_field,
            address: config.address,
        }
    }
}

fn resolve_threshold(source: &str, threshold: Option<i64>, tier: Option<DefaultTier>) -> Result<u8> {
    let value = match (threshold, tier) {
        (Some(value), Some(tier)) if value != i64::from(tier.threshold()) => {
            return Err(ConfigurationError::ConflictingThreshold {
                threshold: value,
                tier,
            });
        }
        (Some(value), _) => value,
        (None, Some(tier)) => i64::from(tier.threshold()),
        (None, None) => {
            return Err(ConfigurationError::MissingThreshold {
                source_name: source.to_string(),
            });
        }
    };
    u8::try_from(value)
        .ok()
        .filter(|threshold| *threshold <= MAX_THRESHOLD)
        .ok_or(ConfigurationError::ThresholdOutOfRange { value })
}

fn validate_key_fields(fields: Vec<String>) -> Result<Vec<String>> {
    if fields.is_empty() {
        return Err(ConfigurationError::EmptyKeyFields);
    }
    let mut seen = BTreeSet::new();
    let mut validated = Vec::with_capacity(fields.len());
    for (index, field) in fields.into_iter().enumerate() {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::BlankKeyField { index });
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(ConfigurationError::DuplicateKeyField {
                field: trimmed.to_string(),
            });
        }
        validated.push(trimmed.to_string());
    }
    Ok(validated)
}

fn validate_address_fields(street: &str, address: &AddressFields) -> Result<()> {
    let components = [
        ("street", street),
        ("city", address.city.as_str()),
        ("state", address.state.as_str()),
        ("zip", address.zip.as_str()),
    ];
    let mut seen = BTreeSet::new();
    for (role, field) in components {
        if field.is_empty() {
            return Err(ConfigurationError::InvalidAddressField {
                reason: format!("{role} field name is blank"),
            });
        }
        if !seen.insert(field) {
            return Err(ConfigurationError::InvalidAddressField {
                reason: format!("field '{field}' is mapped to more than one address component"),
            });
        }
    }
    Ok(())
}

/// Incremental constructor for [`ThresholdConfig`]; validation runs in
/// [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ThresholdConfigBuilder {
    raw: RawThresholdConfig,
}

impl ThresholdConfigBuilder {
    fn new(source: impl Into<String>) -> Self {
        Self {
            raw: RawThresholdConfig {
                source: source.into(),
                strict_key_fields: Vec::new(),
                fuzzy_threshold: None,
                tier: None,
                address_field: default_street_field(),
                address: AddressFields::default(),
            },
        }
    }

    #[must_use]
    pub fn strict_key_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw.strict_key_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fuzzy_threshold(mut self, threshold: i64) -> Self {
        self.raw.fuzzy_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn tier(mut self, tier: DefaultTier) -> Self {
        self.raw.tier = Some(tier);
        self
    }

    #[must_use]
    pub fn address_field(mut self, street: impl Into<String>) -> Self {
        self.raw.address_field = street.into();
        self
    }

    #[must_use]
    pub fn address_fields(mut self, address: AddressFields) -> Self {
        self.raw.address = address;
        self
    }

    pub fn build(self) -> Result<ThresholdConfig> {
        ThresholdConfig::try_from(self.raw)
    }
}
