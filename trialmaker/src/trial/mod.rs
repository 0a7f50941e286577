//! Trial records.
//!
//! A [`Trial`] holds every variable of one experimental trial, looked up by
//! name, plus `vars_list`: the names in the order they were assigned.
//!
//! ```rust,ignore
//! use trialmaker::{make_trial_list, Trial};
//!
//! let trials = make_trial_list("stimulus_list.csv")?;
//! println!("{:?}", trials[1].vars_list());
//! println!("{}", trials[0].get("target").unwrap());
//! ```

pub mod list;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{TrialError, TrialResult};
use crate::models::{CellValue, RowRecord};

pub use list::*;

/// One trial: named attributes plus their assignment history.
///
/// The history lives beside the attributes, so a column called
/// `vars_list` is stored like any other attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trial {
    attributes: Vec<(String, CellValue)>,
    vars_list: Vec<String>,
}

impl Trial {
    /// Empty trial with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trial built from a single row.
    pub fn from_row(row: &RowRecord) -> Self {
        Self::from_records(std::iter::once(row), std::iter::empty::<(String, CellValue)>())
    }

    /// Trial built from several rows, then extra named values.
    ///
    /// Rows are applied in order, then extras in order. Later values
    /// overwrite earlier ones; every assignment is recorded in `vars_list`.
    pub fn from_records<'a, R, E, K, V>(rows: R, extras: E) -> Self
    where
        R: IntoIterator<Item = &'a RowRecord>,
        E: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut trial = Self::new();
        for row in rows {
            for (name, value) in row.iter() {
                trial.set(name, value.clone());
            }
        }
        for (name, value) in extras {
            trial.set(name, value);
        }
        trial
    }

    /// Assign an attribute, overwriting any previous value.
    ///
    /// The name is appended to `vars_list` even when it was already set.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.clone(), value)),
        }
        self.vars_list.push(name);
    }

    /// Builder form of [`Trial::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Like [`Trial::get`] but an error when the attribute is absent.
    pub fn require(&self, name: &str) -> TrialResult<&CellValue> {
        self.get(name)
            .ok_or_else(|| TrialError::MissingAttribute(name.to_string()))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(CellValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(CellValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(CellValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(CellValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attributes in first-assignment order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Every assigned name, in order, repeats included.
    pub fn vars_list(&self) -> &[String] {
        &self.vars_list
    }

    /// Number of distinct attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl From<&RowRecord> for Trial {
    fn from(row: &RowRecord) -> Self {
        Trial::from_row(row)
    }
}

/// Attributes as a JSON object, in assignment order.
struct AttributesView<'a>(&'a [(String, CellValue)]);

impl Serialize for AttributesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct TrialView<'a> {
    attributes: AttributesView<'a>,
    vars_list: &'a [String],
}

impl Serialize for Trial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TrialView {
            attributes: AttributesView(&self.attributes),
            vars_list: &self.vars_list,
        }
        .serialize(serializer)
    }
}
