//! Label reader trait and common types
//!
//! A `LabelReader` exposes one label column of a file as a clean
//! list: values trimmed, blanks dropped, duplicates removed keeping the
//! first occurrence.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::warn;
use varmap_core::ConfigError;

use crate::text_reader::{JsonLabelReader, TextLabelReader};

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IoError {
    /// True when the failure is a configuration problem rather than a
    /// filesystem or format problem.
    pub fn is_config(&self) -> bool {
        matches!(self, IoError::Config(_))
    }

    pub(crate) fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        IoError::Write {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading label columns from tabular files
pub trait LabelReader: Send + Sync {
    /// Column headers in file order
    fn headers(&self) -> &[String];

    /// Read the cleaned labels of one column.
    ///
    /// `column` selects a header by name; `None` infers the label column.
    /// `field` names the setting the column came from, for error messages.
    fn read_labels(&self, column: Option<&str>, field: &str) -> IoResult<Vec<String>>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn LabelReader>;

/// Open a table and return an appropriate reader
///
/// The format is detected from the file extension: `csv`, `tsv`/`tab`,
/// `txt` (one label per line) or `json`. Anything else is rejected.
pub fn open_table(path: &Path) -> IoResult<BoxedReader> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" => {
            use crate::csv_reader::CsvLabelReader;
            Ok(Box::new(CsvLabelReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        "tsv" | "tab" => {
            use crate::csv_reader::CsvLabelReader;
            Ok(Box::new(CsvLabelReader::open_with_delimiter(path, b'\t')?))
        }

        "txt" => Ok(Box::new(TextLabelReader::open(path)?)),
        "json" => Ok(Box::new(JsonLabelReader::open(path)?)),

        _ => Err(IoError::InvalidFormat(format!(
            "No reader for '{}' (supported: {})",
            path.display(),
            supported_extensions().join(", ")
        ))),
    }
}

/// Load the cleaned labels of one column from a table file.
pub fn load_labels(path: &Path, column: Option<&str>, field: &str) -> IoResult<Vec<String>> {
    open_table(path)?.read_labels(column, field)
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
        extensions.push("tab");
    }
    extensions.push("txt");
    extensions.push("json");

    extensions
}

/// Trim values, drop blanks and de-duplicate keeping first occurrences.
pub fn clean_labels<I, S>(values: I, origin: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    let mut blank = 0usize;
    let mut duplicates = 0usize;

    for value in values {
        let label = value.as_ref().trim();
        if label.is_empty() {
            blank += 1;
        } else if seen.insert(label.to_string()) {
            labels.push(label.to_string());
        } else {
            duplicates += 1;
        }
    }

    if blank > 0 {
        warn!(origin, count = blank, "skipped blank labels");
    }
    if duplicates > 0 {
        warn!(origin, count = duplicates, "dropped duplicate labels");
    }

    labels
}

/// Whether a header names an identifier or link column rather than labels.
pub fn is_identifier_column(header: &str) -> bool {
    let trimmed = header.trim();
    if trimmed.ends_with("Id") {
        return true;
    }

    let lower = trimmed.to_lowercase();
    if lower.ends_with("_id") {
        return true;
    }
    matches!(
        lower.as_str(),
        "id" | "url" | "link" | "index" | "sno" | "s no" | "s.no" | "s_no"
    )
}

/// Pick the label column among `headers`.
///
/// An explicit name must match a header exactly (falling back to a
/// case-insensitive match). Without one, the first non-identifier column
/// is used, or column 0 when every column looks like an identifier.
pub fn select_column(headers: &[String], column: Option<&str>, field: &str) -> IoResult<usize> {
    match column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .or_else(|| {
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
            })
            .ok_or_else(|| {
                ConfigError::ColumnNotFound {
                    field: field.to_string(),
                    column: name.to_string(),
                    available: headers.to_vec(),
                }
                .into()
            }),
        None => Ok(headers
            .iter()
            .position(|h| !is_identifier_column(h))
            .unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_supported_extensions() {
        let extensions = supported_extensions();
        #[cfg(feature = "csv")]
        assert!(extensions.contains(&"csv"));
        #[cfg(not(feature = "csv"))]
        assert!(!extensions.contains(&"csv"));
        assert!(extensions.contains(&"txt"));
        assert!(extensions.contains(&"json"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        for name in ["Variants.xlsx", "Variants"] {
            let err = open_table(Path::new(name)).err().unwrap();
            assert!(matches!(err, IoError::InvalidFormat(_)), "{name}: {err}");
        }
    }

    #[test]
    fn test_clean_labels() {
        let labels = clean_labels(["  Asta ", "", "Sportz", "Asta", "   ", "Era"], "test");
        assert_eq!(labels, vec!["Asta", "Sportz", "Era"]);
    }

    #[test]
    fn test_identifier_columns() {
        assert!(is_identifier_column("id"));
        assert!(is_identifier_column("variant_id"));
        assert!(is_identifier_column("variantId"));
        assert!(is_identifier_column("URL"));
        assert!(is_identifier_column("S No"));
        assert!(!is_identifier_column("variantName"));
        assert!(!is_identifier_column("Android"));
    }

    #[test]
    fn test_select_column_inference() {
        assert_eq!(select_column(&headers(&["id", "url", "variantName"]), None, "f").unwrap(), 2);
        assert_eq!(select_column(&headers(&["id", "link"]), None, "f").unwrap(), 0);
        assert_eq!(select_column(&[], None, "f").unwrap(), 0);
    }

    #[test]
    fn test_select_column_explicit() {
        let h = headers(&["id", "variantName", "price"]);
        assert_eq!(select_column(&h, Some("variantName"), "f").unwrap(), 1);
        assert_eq!(select_column(&h, Some("VARIANTNAME"), "f").unwrap(), 1);

        let err = select_column(&h, Some("trim"), "label_column_source").unwrap_err();
        match err {
            IoError::Config(ConfigError::ColumnNotFound { field, available, .. }) => {
                assert_eq!(field, "label_column_source");
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
