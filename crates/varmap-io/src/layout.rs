//! Brand/model directory layout for batch runs
//!
//! ```text
//! <root>/
//!   Hyundai/
//!     i20/
//!       Variants.csv           source labels
//!       Specifications.csv     candidate labels
//!       variants_mapping.json  written report
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use varmap_core::ModelJob;

use crate::reader::{load_labels, IoError, IoResult};

pub const VARIANTS_FILE: &str = "Variants.csv";
pub const SPECIFICATIONS_FILE: &str = "Specifications.csv";
pub const MAPPING_FILE: &str = "variants_mapping.json";

/// One model directory holding both label tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDir {
    pub brand: String,
    pub model: String,
    pub dir: PathBuf,
}

impl ModelDir {
    /// `"<brand>/<model>"`
    pub fn name(&self) -> String {
        format!("{}/{}", self.brand, self.model)
    }

    pub fn variants_path(&self) -> PathBuf {
        self.dir.join(VARIANTS_FILE)
    }

    pub fn specifications_path(&self) -> PathBuf {
        self.dir.join(SPECIFICATIONS_FILE)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.dir.join(MAPPING_FILE)
    }

    /// Load both tables into a resolution job.
    pub fn load_job(
        &self,
        source_column: Option<&str>,
        candidate_column: Option<&str>,
    ) -> IoResult<ModelJob> {
        let sources = load_labels(&self.variants_path(), source_column, "label_column_source")?;
        let candidates = load_labels(
            &self.specifications_path(),
            candidate_column,
            "label_column_candidate",
        )?;
        Ok(ModelJob::new(self.name(), sources, candidates))
    }
}

/// Find every `<brand>/<model>` directory under `root` that has both tables.
///
/// Results are sorted by brand then model. Model directories missing either
/// table are skipped with a warning.
pub fn discover_models(root: &Path) -> IoResult<Vec<ModelDir>> {
    if !root.is_dir() {
        return Err(IoError::FileNotFound(root.display().to_string()));
    }

    let mut models = Vec::new();
    for brand_dir in subdirectories(root)? {
        let brand = file_name(&brand_dir);
        for model_dir in subdirectories(&brand_dir)? {
            let model = ModelDir {
                brand: brand.clone(),
                model: file_name(&model_dir),
                dir: model_dir,
            };

            if model.variants_path().is_file() && model.specifications_path().is_file() {
                debug!(model = %model.name(), "found model directory");
                models.push(model);
            } else {
                warn!(model = %model.name(), "skipping directory without both label tables");
            }
        }
    }

    models.sort_by(|a, b| (&a.brand, &a.model).cmp(&(&b.brand, &b.model)));
    Ok(models)
}

fn subdirectories(dir: &Path) -> IoResult<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|e| IoError::OpenFailed(format!("{}: {e}", dir.display())))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IoError::OpenFailed(format!("{}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let model = ModelDir {
            brand: "Hyundai".to_string(),
            model: "i20".to_string(),
            dir: PathBuf::from("/data/Hyundai/i20"),
        };
        assert_eq!(model.name(), "Hyundai/i20");
        assert_eq!(
            model.mapping_path(),
            PathBuf::from("/data/Hyundai/i20/variants_mapping.json")
        );
    }

    #[test]
    fn test_missing_root() {
        let result = discover_models(Path::new("/nonexistent/Output"));
        assert!(matches!(result, Err(IoError::FileNotFound(_))));
    }
}
