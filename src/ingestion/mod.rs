//! Row sources: where the pipeline pulls rows from.
//!
//! The pipeline only needs [`RowSource`], which hands out at most `max_rows` rows per pull. Any
//! iterator of `PipelineResult<Row>` is a row source, so in-memory vectors work as well as
//! [`csv::CsvRowSource`], which reads a CSV file lazily.

pub mod csv;

use crate::error::PipelineResult;
use crate::types::Row;

pub use self::csv::CsvRowSource;

/// Pull-based, chunk-at-a-time producer of rows.
///
/// Rows must come out in a deterministic order. A read failure is returned as an error and ends
/// the run.
pub trait RowSource {
    /// Return up to `max_rows` rows, or `None` once the source is exhausted.
    fn next_chunk(&mut self, max_rows: usize) -> PipelineResult<Option<Vec<Row>>>;
}

impl<I> RowSource for I
where
    I: Iterator<Item = PipelineResult<Row>>,
{
    fn next_chunk(&mut self, max_rows: usize) -> PipelineResult<Option<Vec<Row>>> {
        let mut rows = Vec::with_capacity(max_rows.min(4_096));
        while rows.len() < max_rows {
            match self.next() {
                Some(row) => rows.push(row?),
                None => break,
            }
        }
        Ok((!rows.is_empty()).then_some(rows))
    }
}
