//! Domain models for one row of target data.
//!
//! A [`Record`] is an ordered mapping from target column name to a
//! [`FieldValue`]. Values stay strings all the way through: the tag only says
//! where the text came from.

use std::fmt;

/// Value of one target column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// No source columns and no default value
    #[default]
    Absent,
    /// Produced by composition
    Composed(String),
    /// Rewritten by a validation rule
    Normalized(String),
}

impl FieldValue {
    /// Text of the value; absent values read as the empty string
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Absent => "",
            FieldValue::Composed(s) | FieldValue::Normalized(s) => s,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, FieldValue::Normalized(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Composed)
    }
}

/// One row of target values, in schema order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    entries: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set a column, replacing any previous value in place
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Text of a column, if the column exists
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).map(FieldValue::as_str)
    }

    /// Replace a column's value with a normalized one.
    ///
    /// Returns false when the column does not exist.
    pub fn normalize(&mut self, column: &str, value: String) -> bool {
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => {
                *slot = FieldValue::Normalized(value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Value texts in column order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}
