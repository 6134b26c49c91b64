//! Column specification
//!
//! A [`ColumnSpec`] describes how one target column is built from the source
//! row and which rule its value must satisfy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation rule selected for a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Free text, optionally constrained by a pattern
    #[serde(rename = "string")]
    String,

    /// Base-10 signed 32-bit integer
    #[serde(rename = "integer", alias = "int")]
    Integer,

    /// Positive decimal with optional thousands separators
    #[serde(
        rename = "bigDecimal",
        alias = "big decimal",
        alias = "bigdecimal",
        alias = "big_decimal"
    )]
    BigDecimal,

    /// Date or date/time, rewritten to the canonical form
    #[serde(rename = "datetime")]
    Datetime,
}

impl DataType {
    /// All data types, in documentation order
    pub const ALL: [DataType; 4] = [
        DataType::String,
        DataType::Integer,
        DataType::BigDecimal,
        DataType::Datetime,
    ];

    /// Name used in mapping documents
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::BigDecimal => "bigDecimal",
            DataType::Datetime => "datetime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction and validation rule for a single target column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Output header and record key, unique within a schema
    pub target_column: String,

    /// Validation rule applied to the composed value
    pub target_data_type: DataType,

    /// Reserved flag, carried through untouched
    #[serde(default)]
    pub new_column: bool,

    /// Source fields concatenated in order
    #[serde(default)]
    pub source_columns: Vec<String>,

    /// Inserted between concatenated source values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Regex the value must contain (string columns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Value used when `source_columns` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ColumnSpec {
    /// Create a column copied from a single source field
    pub fn from_source(target: &str, data_type: DataType, source: &str) -> Self {
        Self::from_sources(target, data_type, vec![source.to_string()])
    }

    /// Create a column concatenating several source fields
    pub fn from_sources(target: &str, data_type: DataType, sources: Vec<String>) -> Self {
        Self {
            target_column: target.to_string(),
            target_data_type: data_type,
            new_column: false,
            source_columns: sources,
            separator: None,
            pattern: None,
            default_value: None,
        }
    }

    /// Create a column that always takes the given value
    pub fn constant(target: &str, data_type: DataType, value: &str) -> Self {
        Self::from_sources(target, data_type, Vec::new()).with_default(value)
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = Some(separator.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Mark as a column that has no counterpart in the source
    pub fn new_column(mut self) -> Self {
        self.new_column = true;
        self
    }

    /// True when the value comes from `default_value` rather than the source
    pub fn uses_default(&self) -> bool {
        self.source_columns.is_empty()
    }
}
