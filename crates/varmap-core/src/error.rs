//! Error types for varmap-core
//!
//! Normalization and scoring are total functions, so the only failures the
//! engine reports are configuration problems. They are raised before any
//! scoring starts.

use thiserror::Error;

/// Result type alias for configuration-checked operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid resolver or input configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A threshold value outside [0, 1] (or not a number)
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { field: String, value: f64 },

    /// A reuse policy name that is neither `no-reuse` nor `allow-reuse`
    #[error("reuse_policy: unknown policy '{0}' (expected 'no-reuse' or 'allow-reuse')")]
    UnknownReusePolicy(String),

    /// An assignment strategy name that is neither `greedy` nor `optimal`
    #[error("strategy: unknown strategy '{0}' (expected 'greedy' or 'optimal')")]
    UnknownStrategy(String),

    /// A scorer weight that is negative, non-finite or otherwise unusable
    #[error("{field}: invalid weight {value}")]
    InvalidWeight { field: String, value: f64 },

    /// A configured label column that does not exist in its table
    #[error("{field}: column '{column}' not found (available: {})", available.join(", "))]
    ColumnNotFound {
        field: String,
        column: String,
        available: Vec<String>,
    },

    /// A configuration document that could not be parsed
    #[error("config parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Name of the configuration field that caused the error.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::ThresholdOutOfRange { field, .. } => field,
            ConfigError::UnknownReusePolicy(_) => "reuse_policy",
            ConfigError::UnknownStrategy(_) => "strategy",
            ConfigError::InvalidWeight { field, .. } => field,
            ConfigError::ColumnNotFound { field, .. } => field,
            ConfigError::Parse(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        let err = ConfigError::ThresholdOutOfRange {
            field: "threshold".to_string(),
            value: 1.5,
        };
        assert_eq!(err.field(), "threshold");
        assert!(err.to_string().contains("1.5"));

        assert_eq!(
            ConfigError::UnknownReusePolicy("sometimes".into()).field(),
            "reuse_policy"
        );
    }

    #[test]
    fn test_column_not_found_lists_available() {
        let err = ConfigError::ColumnNotFound {
            field: "label_column_source".to_string(),
            column: "trim".to_string(),
            available: vec!["id".to_string(), "variantName".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("label_column_source"));
        assert!(msg.contains("id, variantName"));
    }
}
