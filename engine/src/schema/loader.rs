//! Mapping document loading.
//!
//! A mapping document is a JSON object holding a single `columns` array of
//! [`ColumnSpec`] entries. Documents are checked against the embedded JSON
//! Schema (draft 7) before deserialization so that every structural problem is
//! reported at once, then compiled into a [`Schema`].
//!
//! # Example
//!
//! ```ignore
//! use csvshape::schema::parse_schema;
//!
//! let schema = parse_schema(r#"{
//!     "columns": [
//!         { "targetColumn": "age", "targetDataType": "integer", "sourceColumns": ["Age"] }
//!     ]
//! }"#)?;
//! assert_eq!(schema.target_columns(), vec!["age"]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::{ColumnSpec, Schema};
use crate::error::{SchemaError, SchemaResult};

/// JSON Schema describing the mapping document format
const MAPPING_DOCUMENT_SCHEMA: &str = include_str!("../../schemas/mapping.schema.json");

/// Serialized form of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(alias = "Columns")]
    pub columns: Vec<ColumnSpec>,
}

impl MappingDocument {
    /// Serialize to a pretty JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Compile into a [`Schema`]
    pub fn into_schema(self) -> SchemaResult<Schema> {
        Schema::new(self.columns)
    }
}

/// Check a JSON value against the mapping document structure.
///
/// Returns every violation found, not just the first one.
pub fn check_structure(document: &Value) -> SchemaResult<()> {
    let schema: Value = serde_json::from_str(MAPPING_DOCUMENT_SCHEMA)?;
    let validator = jsonschema::draft7::new(&schema).map_err(|e| SchemaError::Structure {
        errors: vec![format!("embedded mapping schema is invalid: {}", e)],
    })?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Structure { errors })
    }
}

/// Parse and compile a schema from a JSON value
pub fn schema_from_value(document: Value) -> SchemaResult<Schema> {
    check_structure(&document)?;
    let document: MappingDocument = serde_json::from_value(document)?;
    document.into_schema()
}

/// Parse and compile a schema from a JSON string
pub fn parse_schema(json: &str) -> SchemaResult<Schema> {
    let document: Value = serde_json::from_str(json)?;
    schema_from_value(document)
}

/// Load and compile a schema from a mapping file
pub fn load_schema<P: AsRef<Path>>(path: P) -> SchemaResult<Schema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let schema = parse_schema(&content)?;
    debug!(path = %path.display(), columns = schema.len(), "Loaded schema");
    Ok(schema)
}
