//! Column descriptors.
//!
//! A [`Column`] tells the table where a column's values come from (its
//! accessor), whether clicking its header sorts, and how its cells are turned
//! into display text. Columns are plain values carrying function-valued
//! fields; there is no renderer trait hierarchy.
//!
//! Dataset files and worker messages describe columns with the serializable
//! [`ColumnSpec`], which is converted into a [`Column`] with
//! [`ColumnSpec::into_column`].
//!
//! # Example
//!
//! ```
//! use tabula::domain::{CellFormat, Column, Record};
//!
//! let salary = Column::field("salary", "Salary", "salary").with_format(CellFormat::Currency);
//! let record = Record::new().with("salary", 75000);
//! assert_eq!(salary.display(&record, 0), "$75,000");
//! ```

use super::value::{CellValue, Record};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Extracts the sortable value of a column from a record.
pub type Accessor = Arc<dyn Fn(&Record) -> CellValue + Send + Sync>;

/// Formats a cell from its value, the whole record, and the row position in
/// the current view.
pub type CellRenderer = Arc<dyn Fn(&CellValue, &Record, usize) -> String + Send + Sync>;

/// Static description of one table column.
#[derive(Clone)]
pub struct Column {
    /// Unique identifier, used as the sort key.
    pub key: String,
    /// Header text.
    pub title: String,
    /// Whether clicking the header changes the sort.
    pub sortable: bool,
    /// Preferred width in terminal cells. `None` lets the layout decide.
    pub width: Option<usize>,
    accessor: Accessor,
    render: Option<CellRenderer>,
}

impl Column {
    /// Creates a column with a custom accessor.
    pub fn new<F>(key: impl Into<String>, title: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Record) -> CellValue + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            title: title.into(),
            sortable: false,
            width: None,
            accessor: Arc::new(accessor),
            render: None,
        }
    }

    /// Creates a sortable column reading the record field `field`.
    pub fn field(key: impl Into<String>, title: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(key, title, move |record: &Record| record.get(&field).clone()).sortable(true)
    }

    /// Sets whether the column is sortable.
    #[must_use]
    pub const fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the preferred width.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Installs a custom cell renderer.
    #[must_use]
    pub fn with_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellValue, &Record, usize) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Installs the renderer of a built-in [`CellFormat`].
    #[must_use]
    pub fn with_format(mut self, format: CellFormat) -> Self {
        self.render = format.renderer();
        self
    }

    /// Reads this column's value from `record`.
    #[must_use]
    pub fn value(&self, record: &Record) -> CellValue {
        (self.accessor)(record)
    }

    /// Produces the display text of this column's cell for `record` at view
    /// position `position`.
    #[must_use]
    pub fn display(&self, record: &Record, position: usize) -> String {
        let value = self.value(record);
        match &self.render {
            Some(render) => render(&value, record, position),
            None => value.display_string(),
        }
    }

    /// Returns `true` if a custom renderer is installed.
    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("has_renderer", &self.render.is_some())
            .finish_non_exhaustive()
    }
}

/// Built-in cell formats available to dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Default stringification.
    #[default]
    Text,
    /// `$` followed by the thousands-grouped number, e.g. `$75,000`.
    Currency,
    /// ISO `YYYY-MM-DD` rendered as `M/D/YYYY`.
    Date,
    /// Value wrapped in brackets, e.g. `[Admin]`.
    Badge,
}

impl CellFormat {
    /// Returns the renderer for this format, `None` for plain text.
    #[must_use]
    pub fn renderer(self) -> Option<CellRenderer> {
        let render: CellRenderer = match self {
            Self::Text => return None,
            Self::Currency => Arc::new(|value: &CellValue, _: &Record, _: usize| format_currency(value)),
            Self::Date => Arc::new(|value: &CellValue, _: &Record, _: usize| format_date(value)),
            Self::Badge => Arc::new(|value: &CellValue, _: &Record, _: usize| {
                if value.is_null() {
                    String::new()
                } else {
                    format!("[{value}]")
                }
            }),
        };
        Some(render)
    }
}

/// Formats a number with `,` thousands separators and at most three fraction
/// digits. Non-numeric values fall back to their display string.
#[must_use]
pub fn group_thousands(value: &CellValue) -> String {
    let Some(n) = value.as_number().filter(|n| n.is_finite()) else {
        return value.display_string();
    };

    let rounded = format!("{:.3}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if n < 0.0 && !rounded.trim_matches(|c| c == '0' || c == '.').is_empty() {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn format_currency(value: &CellValue) -> String {
    if value.is_null() {
        return String::new();
    }
    format!("${}", group_thousands(value))
}

fn format_date(value: &CellValue) -> String {
    let Some(text) = value.as_text() else {
        return value.display_string();
    };
    chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_or_else(|_| text.to_string(), |date| date.format("%-m/%-d/%Y").to_string())
}

/// Serializable column description used by dataset files.
///
/// ```json
/// { "key": "salary", "title": "Salary", "field": "salary", "format": "currency", "width": 12 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Unique column identifier.
    pub key: String,
    /// Header text. Defaults to the key.
    #[serde(default)]
    pub title: Option<String>,
    /// Record field to read. Defaults to the key.
    #[serde(default)]
    pub field: Option<String>,
    /// Whether the header sorts. Defaults to `true`.
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    /// Preferred width in terminal cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Cell format.
    #[serde(default)]
    pub format: CellFormat,
}

const fn default_sortable() -> bool {
    true
}

impl ColumnSpec {
    /// Creates a sortable text column spec reading the field named `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            field: None,
            sortable: true,
            width: None,
            format: CellFormat::Text,
        }
    }

    /// Builds the runtime [`Column`].
    #[must_use]
    pub fn into_column(self) -> Column {
        let title = self.title.unwrap_or_else(|| self.key.clone());
        let field = self.field.unwrap_or_else(|| self.key.clone());
        let mut column = Column::field(self.key, title, field)
            .sortable(self.sortable)
            .with_format(self.format);
        column.width = self.width;
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(&CellValue::Number(75000.0)), "$75,000");
        assert_eq!(format_currency(&CellValue::Number(1_234_567.891)), "$1,234,567.891");
        assert_eq!(format_currency(&CellValue::Number(999.5)), "$999.5");
        assert_eq!(format_currency(&CellValue::Number(-1200.0)), "$-1,200");
        assert_eq!(format_currency(&CellValue::Null), "");
    }

    #[test]
    fn dates_render_month_first() {
        assert_eq!(format_date(&CellValue::from("2024-01-15")), "1/15/2024");
        assert_eq!(format_date(&CellValue::from("2023-12-10")), "12/10/2023");
        assert_eq!(format_date(&CellValue::from("soon")), "soon");
    }

    #[test]
    fn renderer_receives_record_and_position() {
        let column = Column::field("name", "Name", "name")
            .with_renderer(|value, record, position| format!("{position}:{value}:{}", record.get("id")));
        let record = Record::new().with("name", "Ada").with("id", 7);
        assert_eq!(column.display(&record, 2), "2:Ada:7");
    }

    #[test]
    fn spec_defaults_fill_title_and_field() {
        let spec: ColumnSpec = serde_json::from_str(r#"{"key":"role","format":"badge"}"#).unwrap();
        assert!(spec.sortable);
        let column = spec.into_column();
        assert_eq!(column.title, "role");
        let record = Record::new().with("role", "Admin");
        assert_eq!(column.display(&record, 0), "[Admin]");
    }
}
