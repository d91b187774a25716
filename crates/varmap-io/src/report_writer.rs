//! Report persistence
//!
//! Reports are serialized in full before anything touches the destination,
//! then written to a temporary file in the same directory and renamed over
//! the target. A failed run never leaves a truncated mapping behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::info;
use varmap_core::ResolutionReport;

use crate::reader::{IoError, IoResult};

/// Output layout for a written report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `{ mapped, unmapped, unused }`, lossless
    #[default]
    Full,
    /// `{ "<source>": { "specification": ..., "confidence": ... } }`
    Legacy,
}

/// Write a report as JSON to `path`, creating parent directories.
pub fn write_report(path: &Path, report: &ResolutionReport, format: ReportFormat) -> IoResult<()> {
    let json = match format {
        ReportFormat::Full => report.to_json(),
        ReportFormat::Legacy => serde_json::to_string_pretty(&legacy_value(report)),
    }
    .map_err(|e| IoError::Serialize(e.to_string()))?;

    write_atomic(path, json.as_bytes())?;
    info!(
        path = %path.display(),
        mapped = report.mapped.len(),
        unmapped = report.unmapped.len(),
        "wrote mapping"
    );
    Ok(())
}

/// Read a report previously written in the full format.
pub fn read_report(path: &Path) -> IoResult<ResolutionReport> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| IoError::OpenFailed(format!("{}: {e}", path.display())))?;
    ResolutionReport::from_json(&content)
        .map_err(|e| IoError::InvalidFormat(format!("{}: {e}", path.display())))
}

/// Flat per-source object consumed by existing spreadsheet tooling.
///
/// Every source label appears; unmapped ones carry a `null` specification.
/// Confidence is rounded to three decimals.
pub fn legacy_value(report: &ResolutionReport) -> Value {
    let mut entries = Map::new();
    for result in report.mapped.iter().chain(report.unmapped.iter()) {
        let mut entry = Map::new();
        entry.insert(
            "specification".to_string(),
            result
                .candidate
                .as_ref()
                .map_or(Value::Null, |c| Value::String(c.clone())),
        );
        entry.insert(
            "confidence".to_string(),
            Value::from((result.score * 1000.0).round() / 1000.0),
        );
        entries.insert(result.source.clone(), Value::Object(entry));
    }
    Value::Object(entries)
}

/// Write bytes to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> IoResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| IoError::write(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| IoError::write(path, e))?;
    tmp.write_all(contents).map_err(|e| IoError::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| IoError::write(path, e))?;
    tmp.persist(path).map_err(|e| IoError::write(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use varmap_core::MatchResult;

    fn sample() -> ResolutionReport {
        ResolutionReport {
            mapped: vec![MatchResult {
                source: "Asta".to_string(),
                candidate: Some("Asta 1.2 MT".to_string()),
                score: 0.876_54,
                alternatives: vec![],
            }],
            unmapped: vec![MatchResult {
                source: "Magna".to_string(),
                candidate: None,
                score: 0.1234,
                alternatives: vec![],
            }],
            unused: vec!["Era 1.2 MT".to_string()],
        }
    }

    #[test]
    fn test_legacy_value() {
        let value = legacy_value(&sample());
        assert_eq!(value["Asta"]["specification"], "Asta 1.2 MT");
        assert_eq!(value["Asta"]["confidence"], 0.877);
        assert!(value["Magna"]["specification"].is_null());
        assert_eq!(value["Magna"]["confidence"], 0.123);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Hyundai").join("i20").join("variants_mapping.json");
        write_report(&path, &sample(), ReportFormat::Full).unwrap();
        assert_eq!(read_report(&path).unwrap(), sample());
    }
}
