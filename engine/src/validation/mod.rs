//! Record validation against per-column type rules.
//!
//! Every column of a composed [`Record`] is checked against the rule selected
//! by its [`DataType`]. Checking never stops early: a record reports one
//! [`ValidationProblem`] per failing column, and is valid only when it reports
//! none.
//!
//! | Type | Rule |
//! |------|------|
//! | `string` | matches `pattern` anywhere in the value, ignoring case |
//! | `integer` | signed 32-bit integer |
//! | `bigDecimal` | positive decimal once `,` separators are removed |
//! | `datetime` | parseable date/time, rewritten to `MM/dd/yyyy HH:mm:ss` |
//!
//! Validation has no side channel: problems are returned to the caller, which
//! decides where to report them (see [`crate::diagnostics`]).
//!
//! # Example
//!
//! ```ignore
//! use csvshape::validation::validate_record;
//!
//! let outcome = validate_record(&schema, record, 1);
//! if outcome.is_valid() {
//!     writer.write_record(&outcome.record)?;
//! }
//! ```

pub mod datetime;
pub mod rules;

pub use rules::data_types_description;

use serde::Serialize;
use std::fmt;

use crate::models::Record;
use crate::schema::{Column, DataType, Schema};
use rules::Normalized;

/// Why a value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// String value does not match the column pattern
    PatternMismatch,
    InvalidInteger,
    InvalidBigDecimal,
    InvalidDatetime,
}

impl ProblemKind {
    fn label(&self) -> &'static str {
        match self {
            ProblemKind::PatternMismatch => "format",
            ProblemKind::InvalidInteger => "integer",
            ProblemKind::InvalidBigDecimal => "big decimal",
            ProblemKind::InvalidDatetime => "datetime",
        }
    }
}

/// A single column failing its rule in a single row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationProblem {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub column: String,
    pub data_type: DataType,
    /// Value as it stood when the rule rejected it
    pub value: String,
    pub kind: ProblemKind,
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} for {}. Record Number: {}",
            self.kind.label(),
            self.column,
            self.row
        )
    }
}

/// Result of validating one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// The record after normalization
    pub record: Record,
    pub problems: Vec<ValidationProblem>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Validate and normalize a composed record.
///
/// `row` is the 1-based data row number used in problem reports.
pub fn validate_record(schema: &Schema, mut record: Record, row: usize) -> ValidationOutcome {
    let mut problems = Vec::new();

    for column in schema.columns() {
        if let Some(kind) = check_column(column, &mut record) {
            problems.push(ValidationProblem {
                row,
                column: column.name().to_string(),
                data_type: column.data_type(),
                value: record.text(column.name()).unwrap_or_default().to_string(),
                kind,
            });
        }
    }

    ValidationOutcome { record, problems }
}

/// Apply one column's rule, normalizing in place
fn check_column(column: &Column, record: &mut Record) -> Option<ProblemKind> {
    let name = column.name();
    let value = record.text(name).unwrap_or_default();

    match column.data_type() {
        DataType::String => match column.matcher() {
            Some(matcher) if !rules::matches_pattern(matcher, value) => {
                Some(ProblemKind::PatternMismatch)
            }
            _ => None,
        },
        DataType::Integer => {
            (!rules::is_integer(value)).then_some(ProblemKind::InvalidInteger)
        }
        DataType::BigDecimal => match rules::normalize_big_decimal(value) {
            Normalized::Valid(text) => {
                record.normalize(name, text);
                None
            }
            Normalized::Invalid(rewritten) => {
                if let Some(text) = rewritten {
                    record.normalize(name, text);
                }
                Some(ProblemKind::InvalidBigDecimal)
            }
        },
        DataType::Datetime => match rules::normalize_datetime(value) {
            Normalized::Valid(text) => {
                record.normalize(name, text);
                None
            }
            Normalized::Invalid(_) => Some(ProblemKind::InvalidDatetime),
        },
    }
}
