//! Error types for the Tabula plugin.
//!
//! This module defines the centralized error type [`TabulaError`] and a type alias
//! [`Result`] used throughout the crate. The table engine itself never fails: stale
//! sort keys and disabled selection are silent no-ops. Errors only arise at the
//! edges, when datasets are read or written, themes are parsed, or the worker
//! channel misbehaves.

use thiserror::Error;

/// The main error type for Tabula operations.
///
/// # Examples
///
/// ```
/// use tabula::domain::TabulaError;
///
/// fn require_rows(count: usize) -> Result<(), TabulaError> {
///     if count == 0 {
///         return Err(TabulaError::Dataset("dataset has no rows".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(require_rows(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum TabulaError {
    /// A dataset file is structurally invalid.
    ///
    /// Raised when the file parses as JSON but does not describe a table, for
    /// example when `rows` contains something other than objects.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;
