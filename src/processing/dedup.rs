//! Streaming row dedup across chunks.

use std::collections::HashSet;

use crate::error::{PipelineError, PipelineResult};
use crate::types::Row;

const KEY_SEPARATOR: &str = "||";

/// Drops rows whose key (the `subset` columns joined with `||`) was already seen earlier in the
/// run. The set of seen keys persists across chunks, so chunk size does not change the result.
///
/// With `ignore_empty`, rows whose subset cells are all empty are always kept and never
/// remembered. Rows whose header lacks any subset column are kept.
#[derive(Debug, Clone)]
pub struct DedupFilter {
    subset: Vec<String>,
    ignore_empty: bool,
    seen: HashSet<String>,
    removed: usize,
}

impl DedupFilter {
    pub fn new(subset: Vec<String>, ignore_empty: bool) -> PipelineResult<Self> {
        if subset.is_empty() || subset.iter().any(|c| c.trim().is_empty()) {
            return Err(PipelineError::config("dedup subset must name at least one column"));
        }
        Ok(Self {
            subset,
            ignore_empty,
            seen: HashSet::new(),
            removed: 0,
        })
    }

    /// Key columns.
    pub fn subset(&self) -> &[String] {
        &self.subset
    }

    /// Rows dropped so far.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Keep first occurrences, preserving order.
    pub fn filter_rows(&mut self, rows: Vec<Row>) -> Vec<Row> {
        let before = rows.len();
        let kept: Vec<Row> = rows.into_iter().filter(|row| self.keep(row)).collect();
        self.removed += before - kept.len();
        kept
    }

    fn keep(&mut self, row: &Row) -> bool {
        if !self.subset.iter().all(|c| row.header().index_of(c).is_some()) {
            return true;
        }
        let cells: Vec<&str> = self.subset.iter().map(|c| row.get(c).unwrap_or("")).collect();
        if self.ignore_empty && cells.iter().all(|c| c.is_empty()) {
            return true;
        }
        self.seen.insert(cells.join(KEY_SEPARATOR))
    }
}
