//! Settings and abbreviation table files
//!
//! A settings file is TOML:
//!
//! ```toml
//! [resolver]
//! threshold = 0.6
//! reuse_policy = "no-reuse"
//! strategy = "optimal"
//!
//! [resolver.abbreviations]
//! dt = "dual tone"
//!
//! [columns]
//! source = "variantName"
//! candidate = "variantName"
//! ```
//!
//! Column names may also be given as top-level `label_column_source` and
//! `label_column_candidate` keys, or under those names inside `[columns]`.
//!
//! Abbreviation tables may also live on their own as a flat TOML or JSON
//! map of `abbreviation = "expansion"` pairs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use varmap_core::{AbbreviationTable, ConfigError, ResolverConfig};

use crate::reader::{IoError, IoResult};

/// Label column overrides for the source and candidate tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    #[serde(alias = "label_column_source")]
    pub source: Option<String>,
    #[serde(alias = "label_column_candidate")]
    pub candidate: Option<String>,
}

/// Full settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverConfig,
    pub columns: ColumnSettings,
}

impl Settings {
    /// Parse and validate a TOML settings document
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let parse = |e: toml::de::Error| ConfigError::Parse(e.to_string());
        let mut table: toml::Table = toml::from_str(toml_str).map_err(parse)?;

        let resolver = match table.remove("resolver") {
            Some(toml::Value::Table(resolver)) => ResolverConfig::from_toml_table(resolver)?,
            Some(other) => {
                return Err(ConfigError::Parse(format!(
                    "resolver must be a table, got {}",
                    other.type_str()
                )))
            }
            None => ResolverConfig::default(),
        };

        let top_source = take_string(&mut table, "label_column_source")?;
        let top_candidate = take_string(&mut table, "label_column_candidate")?;
        let mut settings: Settings = toml::Value::Table(table).try_into().map_err(parse)?;
        settings.resolver = resolver;

        // [columns] wins over the top-level keys
        if settings.columns.source.is_none() {
            settings.columns.source = top_source;
        }
        if settings.columns.candidate.is_none() {
            settings.columns.candidate = top_candidate;
        }
        Ok(settings)
    }

    /// Load a settings file
    pub fn load(path: &Path) -> IoResult<Self> {
        let content = read_file(path)?;
        let settings = Self::from_toml(&content)?;
        debug!(path = %path.display(), threshold = settings.resolver.threshold, "loaded settings");
        Ok(settings)
    }
}

/// Load an abbreviation table from a `.toml` or `.json` file.
///
/// The loaded table replaces the built-in one entirely.
pub fn load_abbreviations(path: &Path) -> IoResult<AbbreviationTable> {
    let content = read_file(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let table: AbbreviationTable = if is_json {
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
    } else {
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
    };

    debug!(path = %path.display(), entries = table.len(), "loaded abbreviation table");
    Ok(table)
}

fn take_string(table: &mut toml::Table, key: &str) -> Result<Option<String>, ConfigError> {
    match table.remove(key) {
        None => Ok(None),
        Some(toml::Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(ConfigError::Parse(format!(
            "{key} must be a string, got {}",
            other.type_str()
        ))),
    }
}

fn read_file(path: &Path) -> IoResult<String> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path)
        .map_err(|e| IoError::OpenFailed(format!("{}: {e}", path.display())))
}
