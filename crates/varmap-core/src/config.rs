//! Resolver configuration
//!
//! Centralized configuration for the matching run: acceptance threshold,
//! candidate reuse, assignment strategy, scorer weights and the abbreviation
//! table fed to the normalizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::abbreviation::AbbreviationTable;
use crate::error::{ConfigError, Result};

/// Whether a candidate may be selected by more than one source label.
///
/// Settings documents go through `FromStr`, so `allow_reuse` and
/// `ALLOW-REUSE` read the same as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReusePolicy {
    /// A selected candidate leaves the eligible set
    #[default]
    NoReuse,
    /// Every source sees every candidate
    AllowReuse,
}

impl ReusePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoReuse => "no-reuse",
            Self::AllowReuse => "allow-reuse",
        }
    }
}

impl FromStr for ReusePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "no-reuse" => Ok(Self::NoReuse),
            "allow-reuse" => Ok(Self::AllowReuse),
            _ => Err(ConfigError::UnknownReusePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReusePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ReusePolicy {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ReusePolicy> for String {
    fn from(policy: ReusePolicy) -> Self {
        policy.as_str().to_string()
    }
}

/// How competing source labels are assigned under `no-reuse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AssignmentStrategy {
    /// First come, first served in processing order. Not globally optimal.
    #[default]
    Greedy,
    /// Maximum total score over all above-threshold pairs (Kuhn-Munkres)
    Optimal,
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Optimal => "optimal",
        }
    }
}

impl FromStr for AssignmentStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "optimal" => Ok(Self::Optimal),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssignmentStrategy {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AssignmentStrategy> for String {
    fn from(strategy: AssignmentStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Order in which the greedy resolver visits source labels.
///
/// Reports always list results in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceOrder {
    #[default]
    AsGiven,
    /// Longer (more specific) labels pick first; ties keep input order
    LongestFirst,
}

/// Character-level similarity used for the sequence signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceMetric {
    /// Longest common subsequence ratio, `2 * lcs / (|a| + |b|)`
    #[default]
    Lcs,
    /// `1 - levenshtein / max(|a|, |b|)`
    Levenshtein,
    JaroWinkler,
}

/// Relative weights of the three scorer signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Character sequence similarity of the canonical strings
    pub sequence: f64,
    /// Jaccard similarity of the token sets
    pub token_set: f64,
    /// Shared tokens over the smaller token set
    pub containment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sequence: 0.3,
            token_set: 0.3,
            containment: 0.4,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.sequence + self.token_set + self.containment
    }

    /// The sequence weight must be positive: it is the only signal that
    /// separates labels with the same tokens in a different order.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("weights.sequence", self.sequence),
            ("weights.token_set", self.token_set),
            ("weights.containment", self.containment),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.sequence <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                field: "weights.sequence".to_string(),
                value: self.sequence,
            });
        }

        Ok(())
    }
}

/// Full configuration of one resolution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum score for a mapped result
    pub threshold: f64,
    pub reuse_policy: ReusePolicy,
    pub strategy: AssignmentStrategy,
    pub source_order: SourceOrder,
    /// Ranked alternatives kept per result
    pub runner_ups: usize,
    pub sequence_metric: SequenceMetric,
    pub weights: ScoreWeights,
    pub abbreviations: AbbreviationTable,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            reuse_policy: ReusePolicy::NoReuse,
            strategy: AssignmentStrategy::Greedy,
            source_order: SourceOrder::AsGiven,
            runner_ups: 3,
            sequence_metric: SequenceMetric::Lcs,
            weights: ScoreWeights::default(),
            abbreviations: AbbreviationTable::automotive(),
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_reuse_policy(mut self, reuse_policy: ReusePolicy) -> Self {
        self.reuse_policy = reuse_policy;
        self
    }

    pub fn with_strategy(mut self, strategy: AssignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_abbreviations(mut self, abbreviations: AbbreviationTable) -> Self {
        self.abbreviations = abbreviations;
        self
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_toml_table(table)
    }

    /// Load and validate configuration from an already parsed TOML table
    pub fn from_toml_table(table: toml::Table) -> Result<Self> {
        Self::check_names(|key| table.get(key).and_then(toml::Value::as_str))?;
        let config: Self = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::check_names(|key| value.get(key).and_then(serde_json::Value::as_str))?;
        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the policy and strategy names of a raw document up front.
    ///
    /// Deserializers flatten field errors into text; checking the names
    /// first keeps `UnknownReusePolicy` and `UnknownStrategy` intact.
    pub fn check_names<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Result<()> {
        if let Some(policy) = lookup("reuse_policy") {
            policy.parse::<ReusePolicy>()?;
        }
        if let Some(strategy) = lookup("strategy") {
            strategy.parse::<AssignmentStrategy>()?;
        }
        Ok(())
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_threshold("threshold", self.threshold)?;
        self.weights.validate()
    }
}

/// Check that a threshold-like value lies in [0, 1].
pub fn validate_threshold(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
