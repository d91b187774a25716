//! varmap-io - file I/O around the varmap resolver
//!
//! - **Label tables**: CSV/TSV readers with label-column inference,
//!   plus headerless TXT and JSON label lists
//! - **Settings**: TOML settings files and standalone abbreviation tables
//! - **Reports**: atomic JSON output in full or legacy flat form
//! - **Layout**: discovery of `<brand>/<model>` directories for batch runs
//!
//! # Design
//!
//! All table readers implement the `LabelReader` trait. Column problems
//! surface as `varmap_core::ConfigError` wrapped in `IoError::Config`, so
//! callers can tell a bad setting apart from a bad file.

pub mod config_file;
pub mod layout;
pub mod reader;
pub mod report_writer;
pub mod text_reader;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use config_file::{load_abbreviations, ColumnSettings, Settings};
pub use layout::{discover_models, ModelDir, MAPPING_FILE, SPECIFICATIONS_FILE, VARIANTS_FILE};
pub use reader::*;
pub use report_writer::{legacy_value, read_report, write_atomic, write_report, ReportFormat};
pub use text_reader::{JsonLabelReader, TextLabelReader};
