//! Data structures shared by the reader and the trial builder.
//!
//! - [`CellValue`] - One typed cell of the stimulus file
//! - [`RowRecord`] - One data row, column name to cell, in column order

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Cell Value
// =============================================================================

/// A single cell after column type inference.
///
/// Serialized untagged, so JSON output shows plain `null`, numbers,
/// booleans and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell (or missing trailing cell).
    Empty,
    /// Cell of a column where every value is an integer.
    Integer(i64),
    /// Cell of a column where every value is numeric.
    Float(f64),
    /// Cell of a column where every value is a boolean literal.
    Bool(bool),
    /// Literal text.
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// =============================================================================
// Row Record
// =============================================================================

/// One data row of the stimulus file.
///
/// Keys are unique and kept in the file's column order. Records are built
/// by the reader and only exposed read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord {
    fields: Vec<(String, CellValue)>,
}

impl RowRecord {
    /// Build from already-unique `(column, value)` pairs.
    pub(crate) fn from_fields(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a RowRecord {
    type Item = (&'a str, &'a CellValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a CellValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowRecord {
        RowRecord::from_fields(vec![
            ("target".into(), CellValue::from("M5K.png")),
            ("position".into(), CellValue::Integer(2)),
            ("note".into(), CellValue::Empty),
        ])
    }

    #[test]
    fn test_row_lookup_and_order() {
        let row = sample();
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("target"), Some(&CellValue::from("M5K.png")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["target", "position", "note"]);
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"target":"M5K.png","position":2,"note":null}"#);
    }

    #[test]
    fn test_cell_accessors() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Float(0.5).as_i64(), None);
        assert_eq!(CellValue::from("z").as_str(), Some("z"));
        assert_eq!(CellValue::Bool(true).as_bool(), Some(true));
        assert!(CellValue::Empty.is_empty());
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
    }
}
