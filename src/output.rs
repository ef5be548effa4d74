//! Row sinks: where the pipeline's cleaned rows go.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::PipelineResult;
use crate::types::{Header, Row};

/// Receives cleaned rows in order, one chunk at a time.
pub trait RowSink {
    fn write_rows(&mut self, rows: Vec<Row>) -> PipelineResult<()>;
}

impl RowSink for Vec<Row> {
    fn write_rows(&mut self, rows: Vec<Row>) -> PipelineResult<()> {
        self.extend(rows);
        Ok(())
    }
}

/// Writes rows as CSV. The header is written on construction, so an empty run still produces a
/// valid file.
pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvRowSink<File> {
    /// Create (or truncate) `path`, creating parent directories.
    pub fn from_path(path: impl AsRef<Path>, header: &Header, delimiter: u8) -> PipelineResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::from_writer(File::create(path)?, header, delimiter)
    }
}

impl<W: Write> CsvRowSink<W> {
    pub fn from_writer(writer: W, header: &Header, delimiter: u8) -> PipelineResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(writer);
        writer.write_record(header.column_names())?;
        Ok(Self { writer })
    }

    /// Flush buffered output and return the underlying writer.
    pub fn finish(mut self) -> PipelineResult<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| crate::error::PipelineError::Io(e.into_error()))
    }
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write_rows(&mut self, rows: Vec<Row>) -> PipelineResult<()> {
        for row in rows {
            self.writer.write_record(row.values())?;
        }
        Ok(())
    }
}
