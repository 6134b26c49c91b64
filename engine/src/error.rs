//! Error types for the csvshape transformation pipeline.
//!
//! Fatal errors form a small hierarchy:
//!
//! - [`SchemaError`] - mapping document loading and compilation
//! - [`SourceError`] - reading and decoding the source file
//! - [`ComposeError`] - building a target record from a source row
//! - [`SinkError`] - writing the destination file
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Conversion is automatic via `From` implementations so `?` works across
//! layers. Row-level validation failures are not errors: they are
//! [`crate::validation::ValidationProblem`] values.

use thiserror::Error;

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors while loading or compiling a mapping document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Failed to read the mapping file.
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not valid JSON or does not deserialize.
    #[error("Malformed schema document: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document violates the mapping document structure.
    #[error("Schema document is invalid: {}", .errors.join("; "))]
    Structure { errors: Vec<String> },

    /// Two columns share the same target name.
    #[error("Duplicate target column: {0}")]
    DuplicateColumn(String),

    /// A column declares a pattern that does not compile.
    #[error("Invalid pattern for column '{column}': {source}")]
    InvalidPattern {
        column: String,
        #[source]
        source: regex::Error,
    },

    /// The schema declares no columns at all.
    #[error("Schema declares no columns")]
    Empty,
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while reading the source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to open or read the file.
    #[error("Failed to read source: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV framing (unequal row lengths, bad quoting, invalid UTF-8).
    #[error("Invalid CSV in source: {0}")]
    Csv(#[from] csv::Error),

    /// The requested text encoding is not supported.
    #[error("Unsupported source encoding: {0}")]
    UnsupportedEncoding(String),

    /// The source has no header row.
    #[error("Source file has no header row")]
    NoHeaders,
}

// =============================================================================
// Composition Errors
// =============================================================================

/// Errors while composing a target record.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A `sourceColumns` entry names a field the source does not have.
    #[error("Missing source field '{field}' required by column '{column}'")]
    MissingSourceField { field: String, column: String },
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors while writing the destination file.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to create, truncate or flush the file.
    #[error("Failed to write destination: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV writer rejected a record.
    #[error("Failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::TransformPipeline`].
/// Every variant aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Schema loading error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Source reading error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Composition error.
    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    /// Destination writing error.
    #[error("Destination error: {0}")]
    Sink(#[from] SinkError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for composition.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Result type for destination operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
