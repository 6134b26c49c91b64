//! Target schema: the ordered column mapping that drives composition and
//! validation.
//!
//! - `column`: [`ColumnSpec`] and [`DataType`], the serialized form
//! - `loader`: reading a mapping document from JSON
//!
//! A [`Schema`] is the compiled form of a mapping document. Building one
//! checks that target names are unique and compiles every string pattern, so
//! the per-row code never fails on schema problems.

pub mod column;
pub mod loader;

pub use column::{ColumnSpec, DataType};
pub use loader::{load_schema, parse_schema, MappingDocument};

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::error::{ComposeError, ComposeResult, SchemaError, SchemaResult};

/// A column together with its compiled pattern
#[derive(Debug, Clone)]
pub struct Column {
    spec: ColumnSpec,
    matcher: Option<Regex>,
}

impl Column {
    fn compile(spec: ColumnSpec) -> SchemaResult<Self> {
        let matcher = match (&spec.target_data_type, &spec.pattern) {
            (DataType::String, Some(pattern)) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| SchemaError::InvalidPattern {
                        column: spec.target_column.clone(),
                        source,
                    })?,
            ),
            _ => None,
        };

        Ok(Self { spec, matcher })
    }

    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.target_column
    }

    pub fn data_type(&self) -> DataType {
        self.spec.target_data_type
    }

    /// Compiled, case-insensitive pattern for string columns
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }
}

/// Ordered, validated list of target columns
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from column specs, in output order
    pub fn new(specs: Vec<ColumnSpec>) -> SchemaResult<Self> {
        if specs.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.target_column.as_str()) {
                return Err(SchemaError::DuplicateColumn(spec.target_column.clone()));
            }
        }

        let columns = specs
            .into_iter()
            .map(Column::compile)
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Output header, in schema order
    pub fn target_columns(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// All source fields referenced, deduplicated, in first-use order
    pub fn source_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .flat_map(|c| c.spec.source_columns.iter())
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Every (source field, target column) pair whose field is not in `headers`
    pub fn missing_sources(&self, headers: &[String]) -> Vec<(String, String)> {
        self.columns
            .iter()
            .flat_map(|c| {
                c.spec
                    .source_columns
                    .iter()
                    .filter(|field| !headers.iter().any(|h| h == *field))
                    .map(move |field| (field.clone(), c.spec.target_column.clone()))
            })
            .collect()
    }

    /// Check that the source header covers every referenced field
    pub fn validate_headers(&self, headers: &[String]) -> ComposeResult<()> {
        match self.missing_sources(headers).into_iter().next() {
            Some((field, column)) => Err(ComposeError::MissingSourceField { field, column }),
            None => Ok(()),
        }
    }

    /// The serializable form of this schema
    pub fn to_document(&self) -> MappingDocument {
        MappingDocument {
            columns: self.columns.iter().map(|c| c.spec.clone()).collect(),
        }
    }
}

/// Generate an example mapping document for documentation
pub fn example_schema() -> MappingDocument {
    MappingDocument {
        columns: vec![
            ColumnSpec::from_sources(
                "fullName",
                DataType::String,
                vec!["first".to_string(), "last".to_string()],
            )
            .with_separator(" "),
            ColumnSpec::from_source("age", DataType::Integer, "age"),
            ColumnSpec::from_source("email", DataType::String, "email")
                .with_pattern(r"^[^@\s]+@[^@\s]+\.[a-z]+$"),
            ColumnSpec::from_source("balance", DataType::BigDecimal, "balance"),
            ColumnSpec::from_source("joined", DataType::Datetime, "signup_date"),
            ColumnSpec::constant("source", DataType::String, "legacy-crm").new_column(),
        ],
    }
}
