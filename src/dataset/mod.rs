//! Datasets: file model, sources and selection export.
//!
//! # Modules
//!
//! - `models`: the [`Dataset`] file model
//! - `source`: the [`DatasetSource`] trait
//! - `json`: JSON file source and atomic selection export
//! - `sample`: built-in demo users

pub mod json;
pub mod models;
pub mod sample;
pub mod source;

pub use json::{export_selection, JsonDataset};
pub use models::Dataset;
pub use sample::{sample_users, SampleDataset};
pub use source::DatasetSource;

/// Source for an optional configured path: the file when given, the sample
/// users otherwise.
#[must_use]
pub fn source_for(path: Option<&str>) -> Box<dyn DatasetSource> {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => Box::new(JsonDataset::new(path)),
        None => Box::new(SampleDataset),
    }
}
