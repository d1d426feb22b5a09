//! Domain layer for Tabula.
//!
//! Core types shared by the table engine, the dataset loader and the UI,
//! independent of Zellij APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`value`]: Cell values, records and row keys
//! - [`column`]: Column descriptors and built-in cell formats
//!
//! # Examples
//!
//! ```
//! use tabula::domain::{Column, Record};
//!
//! let name = Column::field("name", "Name", "name");
//! let record = Record::new().with("name", "Jane Smith");
//! assert_eq!(name.display(&record, 0), "Jane Smith");
//! ```

pub mod column;
pub mod error;
pub mod value;

pub use column::{CellFormat, CellRenderer, Column, ColumnSpec};
pub use error::{Result, TabulaError};
pub use value::{CellValue, Record, RowKey};
