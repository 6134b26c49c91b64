//! # csvshape - declarative CSV reshaping with per-column validation
//!
//! csvshape reads a delimited source file, builds each output column from one
//! or more source fields (or a constant default), validates the result against
//! the column's declared type and writes the accepted rows to a new CSV file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Source CSV │────▶│   Compose   │────▶│  Validate   │────▶│  Dest CSV   │
//! │ (UTF-8/...) │     │  (schema)   │     │ (normalize) │     │ (valid rows)│
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         DiagnosticsSink
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvshape::{transform_csv, TransformOptions};
//! use std::path::Path;
//!
//! let summary = transform_csv(
//!     Path::new("mapping.json"),
//!     Path::new("input.csv"),
//!     Path::new("output.csv"),
//!     TransformOptions::default(),
//! )?;
//! println!("{} written, {} rejected", summary.rows_written, summary.rows_rejected);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Composed records and field values
//! - [`schema`] - Column mapping definitions and loading
//! - [`parser`] - Source CSV reading and decoding
//! - [`transform`] - Composition and the pipeline
//! - [`validation`] - Per-type rules and normalization
//! - [`diagnostics`] - Row-level problem sinks
//! - [`writer`] - Destination CSV writing
//! - [`logging`] - `tracing` subscriber setup

// Core modules
pub mod error;
pub mod models;

// Schema
pub mod schema;

// Reading and writing
pub mod parser;
pub mod writer;

// Transformation
pub mod transform;

// Validation
pub mod validation;
pub mod diagnostics;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ComposeError,
    PipelineError,
    PipelineResult,
    SchemaError,
    SchemaResult,
    SinkError,
    SourceError,
    SourceResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{FieldValue, Record};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{
    example_schema,
    load_schema,
    parse_schema,
    ColumnSpec,
    DataType,
    MappingDocument,
    Schema,
};

// =============================================================================
// Re-exports - Parsing and writing
// =============================================================================

pub use parser::{SourceEncoding, SourceFields, SourceReader, SourceRow};
pub use writer::DestinationWriter;

// =============================================================================
// Re-exports - Validation and diagnostics
// =============================================================================

pub use validation::{
    data_types_description,
    validate_record,
    ProblemKind,
    ValidationOutcome,
    ValidationProblem,
};
pub use diagnostics::{CollectingSink, DiagnosticsSink, TracingSink};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    compose,
    transform_csv,
    TransformOptions,
    TransformPipeline,
    TransformSummary,
};
