//! Destination CSV writing.
//!
//! One [`DestinationWriter`] holds the destination open for the whole run.
//! Creating it truncates the file; the header goes first, then one row per
//! accepted record in the order they are written.
//!
//! Fields are quoted only when needed. A row made of a single empty field is
//! written as `""`, since a bare empty line would read back as no row at all.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{SinkError, SinkResult};
use crate::models::Record;
use crate::schema::Schema;

/// Scoped CSV writer for the destination file
pub struct DestinationWriter<W: Write> {
    inner: csv::Writer<W>,
    flush_each_row: bool,
    rows_written: usize,
}

impl DestinationWriter<File> {
    /// Create or truncate the destination file
    pub fn create<P: AsRef<Path>>(path: P, delimiter: u8, flush_each_row: bool) -> SinkResult<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::from_writer(file, delimiter, flush_each_row))
    }
}

impl<W: Write> DestinationWriter<W> {
    pub fn from_writer(writer: W, delimiter: u8, flush_each_row: bool) -> Self {
        let inner = WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        Self {
            inner,
            flush_each_row,
            rows_written: 0,
        }
    }

    /// Write the target column names as the header row
    pub fn write_header(&mut self, schema: &Schema) -> SinkResult<()> {
        self.inner.write_record(schema.target_columns())?;
        self.inner.flush()?;
        Ok(())
    }

    /// Append one record's values in column order
    pub fn write_record(&mut self, record: &Record) -> SinkResult<()> {
        self.inner.write_record(record.values())?;
        if self.flush_each_row {
            self.inner.flush()?;
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Data rows written so far (the header is not counted)
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> SinkResult<W> {
        self.inner
            .into_inner()
            .map_err(|e| SinkError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }
}
