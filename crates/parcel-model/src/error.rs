//! Error types for source configuration.

use thiserror::Error;

use crate::config::DefaultTier;

/// Raised when a [`ThresholdConfig`](crate::ThresholdConfig) fails validation.
///
/// This is the only validation boundary in the dedup core. Malformed record
/// data is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("source name must not be blank")]
    BlankSourceName,

    #[error("fuzzy threshold {value} is outside 0..=100")]
    ThresholdOutOfRange { value: i64 },

    #[error("source '{source_name}' sets neither fuzzy_threshold nor tier")]
    MissingThreshold { source_name: String },

    #[error("fuzzy_threshold {threshold} conflicts with tier {tier:?} ({})", .tier.threshold())]
    ConflictingThreshold { threshold: i64, tier: DefaultTier },

    #[error("strict key field list must not be empty")]
    EmptyKeyFields,

    #[error("strict key field at position {index} is blank")]
    BlankKeyField { index: usize },

    #[error("strict key field '{field}' is listed more than once")]
    DuplicateKeyField { field: String },

    #[error("invalid address field configuration: {reason}")]
    InvalidAddressField { reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::ThresholdOutOfRange { value: 101 };
        assert_eq!(err.to_string(), "fuzzy threshold 101 is outside 0..=100");
    }

    #[test]
    fn test_conflicting_threshold_mentions_tier_value() {
        let err = ConfigurationError::ConflictingThreshold {
            threshold: 90,
            tier: DefaultTier::Noisy,
        };
        assert_eq!(
            err.to_string(),
            "fuzzy_threshold 90 conflicts with tier Noisy (95)"
        );
    }
}
