//! Cell values and records.
//!
//! A [`Record`] is an opaque mapping from field name to [`CellValue`]. Records
//! have no declared identity; the table engine assigns each one a [`RowKey`]
//! when a dataset is installed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar value stored in a record field.
///
/// JSON arrays and objects are not scalars; they are kept as their JSON text so
/// they still render and compare as strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent or `null` value. Always sorts after present values (before them
    /// in descending order).
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value. JSON integers and floats both land here.
    Number(f64),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text of a [`CellValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number of a [`CellValue::Number`].
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Default stringification used for cells without a custom renderer and for
    /// comparing values of mixed types.
    ///
    /// Integral numbers print without a fractional part (`62000`, not
    /// `62000.0`). `Null` renders as the empty string.
    ///
    /// ```
    /// use tabula::domain::CellValue;
    ///
    /// assert_eq!(CellValue::Number(62000.0).display_string(), "62000");
    /// assert_eq!(CellValue::Number(1.5).display_string(), "1.5");
    /// assert_eq!(CellValue::Null.display_string(), "");
    /// ```
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        // f64's Display never uses exponent notation and drops a zero fraction
        format!("{n}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Text(other.to_string()),
        }
    }
}

impl From<&CellValue> for serde_json::Value {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Null => Self::Null,
            CellValue::Bool(b) => Self::Bool(*b),
            CellValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Self::Null, |num| {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    Self::from(*n as i64)
                } else {
                    Self::Number(num)
                }
            }),
            CellValue::Text(s) => Self::String(s.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        Self::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// One row of a dataset: field name to value.
///
/// Fields missing from a record read as [`CellValue::Null`].
///
/// ```
/// use tabula::domain::{CellValue, Record};
///
/// let record = Record::new().with("name", "Alice").with("salary", 62000);
/// assert_eq!(record.get("name").as_text(), Some("Alice"));
/// assert!(record.get("email").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, CellValue>,
}

/// Shared `Null` returned for missing fields.
static NULL: CellValue = CellValue::Null;

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mainly for tests and the sample dataset.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets `field` to `value`, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Option<CellValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns the value of `field`, or `Null` if the field is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &CellValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Iterates field names in lexical order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Stable identity of a record inside one table.
///
/// Selection is keyed by `RowKey` so that re-sorting or filtering never changes
/// *which* records are selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// Position of the record in the dataset as installed (arena index).
    Index(usize),
    /// Display string of the configured key field.
    Field(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_convert_to_cell_values() {
        let record: Record = serde_json::from_str(
            r#"{"name":"Bob","salary":70000,"active":true,"manager":null,"tags":["a"]}"#,
        )
        .unwrap();

        assert_eq!(record.get("name"), &CellValue::Text("Bob".into()));
        assert_eq!(record.get("salary"), &CellValue::Number(70000.0));
        assert_eq!(record.get("active"), &CellValue::Bool(true));
        assert!(record.get("manager").is_null());
        assert_eq!(record.get("tags"), &CellValue::Text(r#"["a"]"#.into()));
        assert!(record.get("missing").is_null());
    }

    #[test]
    fn records_serialize_integers_without_fraction() {
        let record = Record::new().with("id", 3).with("ratio", 0.25);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":3,"ratio":0.25}"#);
    }

    #[test]
    fn display_string_matches_script_stringification() {
        assert_eq!(CellValue::Number(-4.0).display_string(), "-4");
        assert_eq!(CellValue::Number(f64::NAN).display_string(), "NaN");
        assert_eq!(CellValue::Bool(false).display_string(), "false");
        assert_eq!(CellValue::from(None::<&str>), CellValue::Null);
    }
}
