//! Dropping sparsely filled rows.

use crate::error::{PipelineError, PipelineResult};
use crate::types::Row;

/// Drops rows in which exactly one of the `subset` columns holds a non-empty cell.
///
/// Only subset columns present in the row's header are counted; when none is present the row is
/// kept. An absent cell counts as empty, a whitespace-only cell as filled. The filter looks at one
/// row at a time, so chunk size does not change the result.
#[derive(Debug, Clone)]
pub struct OneFilledFilter {
    subset: Vec<String>,
    removed: usize,
}

impl OneFilledFilter {
    pub fn new(subset: Vec<String>) -> PipelineResult<Self> {
        if subset.is_empty() || subset.iter().any(|c| c.trim().is_empty()) {
            return Err(PipelineError::config("row filter subset must name at least one column"));
        }
        Ok(Self { subset, removed: 0 })
    }

    /// Checked columns.
    pub fn subset(&self) -> &[String] {
        &self.subset
    }

    /// Rows dropped so far.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Keep every row that does not have exactly one filled subset cell, preserving order.
    pub fn filter_rows(&mut self, rows: Vec<Row>) -> Vec<Row> {
        let before = rows.len();
        let kept: Vec<Row> = rows.into_iter().filter(|row| self.keep(row)).collect();
        self.removed += before - kept.len();
        kept
    }

    fn keep(&self, row: &Row) -> bool {
        let mut present = self
            .subset
            .iter()
            .filter(|c| row.header().index_of(c).is_some())
            .peekable();
        if present.peek().is_none() {
            return true;
        }
        let filled = present
            .filter(|c| row.get(c).is_some_and(|v| !v.is_empty()))
            .count();
        filled != 1
    }
}
