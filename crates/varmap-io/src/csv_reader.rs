//! CSV label reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::reader::{clean_labels, select_column, IoError, IoResult, LabelReader};

/// CSV file reader
///
/// The first row is the header. Rows may have differing field counts; a
/// row too short for the selected column contributes no label.
pub struct CsvLabelReader {
    path: String,
    headers: Vec<String>,
    delimiter: u8,
}

impl CsvLabelReader {
    /// Open a comma-separated file
    pub fn open(path: &Path) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file, reading only its header row
    pub fn open_with_delimiter(path: &Path, delimiter: u8) -> IoResult<Self> {
        let mut reader = Self::csv_reader(path, delimiter)?;
        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(format!("{}: {e}", path.display())))?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            path: path.display().to_string(),
            headers,
            delimiter,
        })
    }

    fn csv_reader(path: &Path, delimiter: u8) -> IoResult<csv::Reader<BufReader<File>>> {
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)
            .map_err(|e| IoError::OpenFailed(format!("{}: {e}", path.display())))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file)))
    }
}

impl LabelReader for CsvLabelReader {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn read_labels(&self, column: Option<&str>, field: &str) -> IoResult<Vec<String>> {
        let index = select_column(&self.headers, column, field)?;
        let mut reader = Self::csv_reader(Path::new(&self.path), self.delimiter)?;

        let mut values = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(format!("{}: {e}", self.path)))?;
            if let Some(value) = record.get(index) {
                values.push(value.to_string());
            }
        }

        debug!(
            path = %self.path,
            column = self.headers.get(index).map(String::as_str).unwrap_or("<none>"),
            rows = values.len(),
            "read label column"
        );

        Ok(clean_labels(values, &self.path))
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_inferred_column() {
        let file = table("id,variantName\n1,Asta\n2, Sportz \n3,Asta\n4,\n");
        let reader = CsvLabelReader::open(file.path()).unwrap();
        assert_eq!(reader.headers(), ["id", "variantName"]);
        assert_eq!(
            reader.read_labels(None, "label_column_source").unwrap(),
            vec!["Asta", "Sportz"]
        );
    }

    #[test]
    fn test_quoted_fields_and_short_rows() {
        let file = table("variantName,price\n\"SX (O), Turbo\",10\nEra\n");
        let reader = CsvLabelReader::open(file.path()).unwrap();
        assert_eq!(
            reader.read_labels(Some("variantName"), "f").unwrap(),
            vec!["SX (O), Turbo", "Era"]
        );
        assert_eq!(reader.read_labels(Some("price"), "f").unwrap(), vec!["10"]);
    }

    #[test]
    fn test_tab_delimiter() {
        let file = table("name\tid\nAsta 1.2 MT\t7\n");
        let reader = CsvLabelReader::open_with_delimiter(file.path(), b'\t').unwrap();
        assert_eq!(reader.read_labels(None, "f").unwrap(), vec!["Asta 1.2 MT"]);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvLabelReader::open(Path::new("/nonexistent/Variants.csv"));
        assert!(matches!(result, Err(IoError::FileNotFound(_))));
    }
}
