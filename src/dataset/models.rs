//! Dataset file model.
//!
//! A dataset travels from disk to the worker and from the worker to the plugin
//! as JSON. Two file shapes are accepted:
//!
//! ```json
//! {
//!   "row_key": "id",
//!   "columns": [
//!     { "key": "name", "title": "Name" },
//!     { "key": "salary", "title": "Salary", "format": "currency" }
//!   ],
//!   "rows": [
//!     { "id": 1, "name": "John Doe", "salary": 75000 }
//!   ]
//! }
//! ```
//!
//! or a bare array of row objects, whose columns are inferred.

use crate::domain::{Column, ColumnSpec, Record, Result, TabulaError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rows plus the columns that describe them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Column descriptions. Empty means "infer from the first row".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSpec>,

    /// Records in dataset order.
    #[serde(default)]
    pub rows: Vec<Record>,

    /// Field used as stable row identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_key: Option<String>,
}

/// Accepted top-level shapes of a dataset file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Table(Dataset),
    Rows(Vec<Record>),
}

impl Dataset {
    /// Creates a dataset from explicit columns and rows.
    #[must_use]
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Record>) -> Self {
        Self {
            columns,
            rows,
            row_key: None,
        }
    }

    /// Sets the row key field.
    #[must_use]
    pub fn with_row_key(mut self, field: impl Into<String>) -> Self {
        self.row_key = Some(field.into());
        self
    }

    /// Parses and validates dataset JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Json`] for malformed JSON or rows that are not
    /// objects, and [`TabulaError::Dataset`] for duplicate column keys.
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset = match serde_json::from_str::<DatasetFile>(json) {
            Ok(DatasetFile::Table(dataset)) => dataset,
            Ok(DatasetFile::Rows(rows)) => Self::new(Vec::new(), rows),
            // Untagged errors are opaque; reparse strictly for a useful message.
            Err(_) => serde_json::from_str::<Self>(json)?,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks that column keys are unique.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Dataset`] naming the first duplicate key.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.columns {
            if !seen.insert(spec.key.as_str()) {
                return Err(TabulaError::Dataset(format!("duplicate column key: {}", spec.key)));
            }
        }
        Ok(())
    }

    /// Explicit column specs, or one text column per field of the first row.
    #[must_use]
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        self.rows
            .first()
            .map(|row| row.field_names().map(ColumnSpec::new).collect())
            .unwrap_or_default()
    }

    /// Runtime columns for a table.
    #[must_use]
    pub fn table_columns(&self) -> Vec<Column> {
        self.column_specs().into_iter().map(ColumnSpec::into_column).collect()
    }
}
