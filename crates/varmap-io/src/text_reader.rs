//! Headerless label readers: plain text and JSON
//!
//! Neither format has columns. A plain text file holds one label per line;
//! a JSON file holds either an array of strings or an object whose keys are
//! the labels.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::reader::{clean_labels, IoError, IoResult, LabelReader};

fn read_to_string(path: &Path) -> IoResult<String> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|e| IoError::OpenFailed(format!("{}: {e}", path.display())))
}

fn ignore_column(path: &str, column: Option<&str>, field: &str) {
    if let Some(column) = column {
        warn!(path, column, field, "file has no columns, using every label");
    }
}

/// Plain text reader, one label per line with no header row
pub struct TextLabelReader {
    path: String,
    lines: Vec<String>,
}

impl TextLabelReader {
    pub fn open(path: &Path) -> IoResult<Self> {
        let contents = read_to_string(path)?;
        Ok(Self {
            path: path.display().to_string(),
            lines: contents.lines().map(str::to_string).collect(),
        })
    }
}

impl LabelReader for TextLabelReader {
    fn headers(&self) -> &[String] {
        &[]
    }

    fn read_labels(&self, column: Option<&str>, field: &str) -> IoResult<Vec<String>> {
        ignore_column(&self.path, column, field);
        debug!(path = %self.path, rows = self.lines.len(), "read text labels");
        Ok(clean_labels(&self.lines, &self.path))
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "Text"
    }
}

/// JSON reader for a string array or the keys of an object
pub struct JsonLabelReader {
    path: String,
    labels: Vec<String>,
}

impl JsonLabelReader {
    pub fn open(path: &Path) -> IoResult<Self> {
        let contents = read_to_string(path)?;
        let display = path.display().to_string();
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| IoError::InvalidFormat(format!("{display}: {e}")))?;
        let labels = labels_from_value(value)
            .map_err(|message| IoError::InvalidFormat(format!("{display}: {message}")))?;

        Ok(Self {
            path: display,
            labels,
        })
    }
}

fn labels_from_value(value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(label) => Ok(label),
                other => Err(format!("element {i} is not a string: {other}")),
            })
            .collect(),
        // serde_json keeps object keys sorted unless preserve_order is on
        Value::Object(map) => Ok(map.into_iter().map(|(key, _)| key).collect()),
        _ => Err("expected an array of labels or an object keyed by label".to_string()),
    }
}

impl LabelReader for JsonLabelReader {
    fn headers(&self) -> &[String] {
        &[]
    }

    fn read_labels(&self, column: Option<&str>, field: &str) -> IoResult<Vec<String>> {
        ignore_column(&self.path, column, field);
        debug!(path = %self.path, rows = self.labels.len(), "read json labels");
        Ok(clean_labels(&self.labels, &self.path))
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "JSON"
    }
}
