//! High-level pipeline API for reshaping a CSV file.
//!
//! The pipeline ties the steps together:
//!
//! 1. Open the source and check its header covers the schema
//! 2. Create (truncate) the destination and write the schema header
//! 3. For every data row: compose, validate, append if valid
//! 4. Flush the destination and return a [`TransformSummary`]
//!
//! Invalid rows are skipped and their problems handed to the caller's
//! [`DiagnosticsSink`]. Anything else (I/O, CSV framing, a missing source
//! field) aborts the run; rows already appended stay in the destination.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvshape::transform::{transform_csv, TransformOptions};
//! use std::path::Path;
//!
//! let summary = transform_csv(
//!     Path::new("mapping.json"),
//!     Path::new("people.csv"),
//!     Path::new("people-clean.csv"),
//!     TransformOptions::default(),
//! )?;
//! println!("{} rows written", summary.rows_written);
//! ```

use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, info_span, trace};

use super::compose::compose;
use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::PipelineResult;
use crate::parser::{SourceEncoding, SourceReader};
use crate::schema::{load_schema, Schema};
use crate::validation::validate_record;
use crate::writer::DestinationWriter;

/// Options for the transformation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Source field delimiter
    pub delimiter: u8,

    /// Destination field delimiter (defaults to the source delimiter)
    pub output_delimiter: Option<u8>,

    /// Source text encoding
    pub encoding: SourceEncoding,

    /// Flush the destination after every appended row
    pub flush_each_row: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            output_delimiter: None,
            encoding: SourceEncoding::Utf8,
            flush_each_row: true,
        }
    }
}

impl TransformOptions {
    fn destination_delimiter(&self) -> u8 {
        self.output_delimiter.unwrap_or(self.delimiter)
    }
}

/// Counts from a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    /// Data rows read from the source
    pub rows_read: usize,
    /// Rows appended to the destination
    pub rows_written: usize,
    /// Rows skipped because at least one column failed
    pub rows_rejected: usize,
    /// Total failing columns across all rows
    pub problems: usize,
}

/// Schema-driven CSV reshaping
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    schema: Schema,
    options: TransformOptions,
}

impl TransformPipeline {
    pub fn new(schema: Schema, options: TransformOptions) -> Self {
        Self { schema, options }
    }

    /// Load the schema from a mapping file
    pub fn from_schema_file<P: AsRef<Path>>(path: P, options: TransformOptions) -> PipelineResult<Self> {
        Ok(Self::new(load_schema(path)?, options))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform a source file into a destination file
    pub fn run(
        &self,
        source: &Path,
        destination: &Path,
        sink: &mut dyn DiagnosticsSink,
    ) -> PipelineResult<TransformSummary> {
        let span = info_span!(
            "transform",
            source = %source.display(),
            destination = %destination.display()
        );
        let _guard = span.enter();

        let mut reader = SourceReader::open(source, self.options.delimiter, self.options.encoding)?;
        self.schema.validate_headers(reader.headers())?;

        let writer = DestinationWriter::create(
            destination,
            self.options.destination_delimiter(),
            self.options.flush_each_row,
        )?;

        let (summary, _) = self.process(&mut reader, writer, sink)?;
        Ok(summary)
    }

    /// Transform between arbitrary streams; returns the destination when done
    pub fn run_streams<R: Read, W: Write>(
        &self,
        source: R,
        destination: W,
        sink: &mut dyn DiagnosticsSink,
    ) -> PipelineResult<(TransformSummary, W)> {
        let mut reader =
            SourceReader::decoding(source, self.options.delimiter, self.options.encoding)?;
        self.schema.validate_headers(reader.headers())?;

        let writer = DestinationWriter::from_writer(
            destination,
            self.options.destination_delimiter(),
            self.options.flush_each_row,
        );

        self.process(&mut reader, writer, sink)
    }

    /// Header, then compose/validate/append for every row
    fn process<R: Read, W: Write>(
        &self,
        reader: &mut SourceReader<R>,
        mut writer: DestinationWriter<W>,
        sink: &mut dyn DiagnosticsSink,
    ) -> PipelineResult<(TransformSummary, W)> {
        writer.write_header(&self.schema)?;
        info!(columns = self.schema.len(), "Header written");

        let mut summary = TransformSummary::default();

        while let Some(row) = reader.next_row()? {
            summary.rows_read += 1;
            let row_number = summary.rows_read;

            let record = compose(&self.schema, &row)?;
            let outcome = validate_record(&self.schema, record, row_number);

            if outcome.is_valid() {
                writer.write_record(&outcome.record)?;
                trace!(row = row_number, "Row appended");
            } else {
                summary.rows_rejected += 1;
                summary.problems += outcome.problems.len();
                for problem in &outcome.problems {
                    sink.report(problem);
                }
                debug!(
                    row = row_number,
                    line = row.line(),
                    problems = outcome.problems.len(),
                    "Row skipped"
                );
            }
        }

        summary.rows_written = writer.rows_written();
        let destination = writer.finish()?;

        info!(
            read = summary.rows_read,
            written = summary.rows_written,
            rejected = summary.rows_rejected,
            "Transform complete"
        );

        Ok((summary, destination))
    }
}

/// Transform a CSV file using a mapping file, reporting problems via `tracing`
pub fn transform_csv(
    schema_path: &Path,
    source: &Path,
    destination: &Path,
    options: TransformOptions,
) -> PipelineResult<TransformSummary> {
    let pipeline = TransformPipeline::from_schema_file(schema_path, options)?;
    pipeline.run(source, destination, &mut TracingSink)
}
