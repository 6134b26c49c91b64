//! Record composition
//!
//! Builds one target [`Record`] from one source row by walking the schema in
//! order. Composition is pure: the same schema and row always give the same
//! record.

use crate::error::{ComposeError, ComposeResult};
use crate::models::{FieldValue, Record};
use crate::parser::SourceFields;
use crate::schema::{ColumnSpec, Schema};

/// Compose a target record from a source row
///
/// # Errors
/// Returns [`ComposeError::MissingSourceField`] when a column references a
/// field the row does not have.
pub fn compose<S>(schema: &Schema, row: &S) -> ComposeResult<Record>
where
    S: SourceFields + ?Sized,
{
    let mut record = Record::with_capacity(schema.len());

    for column in schema.columns() {
        let spec = column.spec();
        record.insert(spec.target_column.as_str(), compose_column(spec, row)?);
    }

    Ok(record)
}

/// Compose the value of a single column
fn compose_column<S>(spec: &ColumnSpec, row: &S) -> ComposeResult<FieldValue>
where
    S: SourceFields + ?Sized,
{
    if spec.uses_default() {
        return Ok(FieldValue::from(spec.default_value.clone()));
    }

    let mut value = String::new();
    for (i, field) in spec.source_columns.iter().enumerate() {
        if i > 0 {
            if let Some(separator) = &spec.separator {
                value.push_str(separator);
            }
        }

        let part = row
            .field(field)
            .ok_or_else(|| ComposeError::MissingSourceField {
                field: field.clone(),
                column: spec.target_column.clone(),
            })?;
        value.push_str(part);
    }

    Ok(FieldValue::Composed(value))
}
