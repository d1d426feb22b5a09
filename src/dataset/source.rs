//! Dataset source abstraction.
//!
//! The worker loads datasets through [`DatasetSource`] so that file-backed and
//! built-in datasets share one code path.

use crate::dataset::models::Dataset;
use crate::domain::error::Result;

/// Somewhere a dataset can be loaded from.
///
/// # Implementations
///
/// - [`JsonDataset`](crate::dataset::JsonDataset): a JSON file
/// - [`SampleDataset`](crate::dataset::SampleDataset): the built-in demo users
///
/// # Examples
///
/// ```
/// use tabula::dataset::{DatasetSource, SampleDataset};
///
/// let dataset = SampleDataset.load()?;
/// assert_eq!(dataset.rows.len(), 5);
/// # Ok::<(), tabula::domain::TabulaError>(())
/// ```
pub trait DatasetSource: Send {
    /// Short human-readable origin, used in logs and the status line.
    fn describe(&self) -> String;

    /// Loads the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not a valid
    /// dataset.
    fn load(&self) -> Result<Dataset>;
}
