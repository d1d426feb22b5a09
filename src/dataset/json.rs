//! JSON file datasets and selection export.
//!
//! Reads are whole-file. Exports use atomic writes (write-to-temp + rename) so
//! a crash never leaves a half-written file behind.

use crate::dataset::models::Dataset;
use crate::dataset::source::DatasetSource;
use crate::domain::error::{Result, TabulaError};
use crate::domain::Record;
use std::path::{Path, PathBuf};

/// Dataset stored in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    path: PathBuf,
}

impl JsonDataset {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for JsonDataset {
    fn describe(&self) -> String {
        crate::infrastructure::strip_host_prefix(&self.path.to_string_lossy())
    }

    fn load(&self) -> Result<Dataset> {
        let _span = tracing::debug_span!("json_dataset_load", path = ?self.path).entered();

        let contents = std::fs::read_to_string(&self.path)?;
        let dataset = Dataset::from_json(&contents).map_err(|e| match e {
            TabulaError::Json(err) => {
                TabulaError::Dataset(format!("failed to parse {}: {err}", self.path.display()))
            }
            other => other,
        })?;

        tracing::debug!(
            rows = dataset.rows.len(),
            columns = dataset.columns.len(),
            row_key = ?dataset.row_key,
            "dataset loaded"
        );
        Ok(dataset)
    }
}

/// Writes `rows` to `path` as a pretty-printed JSON array.
///
/// Parent directories are created as needed. Returns the number of rows
/// written.
///
/// # Errors
///
/// Returns an error if the directory, the temporary file or the final rename
/// cannot be written.
pub fn export_selection(path: &Path, rows: &[Record]) -> Result<usize> {
    let _span = tracing::debug_span!("export_selection", path = ?path, count = rows.len()).entered();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(rows)?;
    let tmp_path = path.with_extension("tmp");

    tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;

    tracing::debug!("selection exported");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_dataset_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.json");
        std::fs::write(&path, r#"[{"name": "Ada"}, {"name": "Grace"}]"#).unwrap();

        let dataset = JsonDataset::new(&path).load().unwrap();
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.column_specs()[0].key, "name");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = JsonDataset::new(dir.path().join("nope.json")).load().unwrap_err();
        assert!(matches!(err, TabulaError::Io(_)));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonDataset::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn export_writes_array_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("selected.json");
        let rows = vec![Record::new().with("name", "Ada").with("id", 1)];

        assert_eq!(export_selection(&path, &rows).unwrap(), 1);

        let written: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, rows);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn exporting_nothing_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("selected.json");
        export_selection(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
