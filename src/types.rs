//! Core data model: rows keyed by a shared [`Header`], grouped into [`Chunk`]s.
//!
//! All cells are text. A row may be shorter than its header (ragged CSV); reading a missing cell
//! yields `None`, which rules treat as an empty string.

use std::sync::Arc;

/// Ordered list of column names shared by every row from one source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    /// Column names in source order.
    pub columns: Vec<String>,
}

impl Header {
    /// Create a header from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single data row: an ordered mapping from column name to cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<Header>,
    values: Vec<String>,
}

impl Row {
    /// Create a row. `values` are in header order; extra values beyond the header are kept but
    /// are not addressable by name.
    pub fn new(header: Arc<Header>, values: Vec<String>) -> Self {
        Self { header, values }
    }

    /// Build a row from `(column, value)` pairs against a shared header. Columns not listed are
    /// left empty.
    pub fn from_pairs<'a, I>(header: Arc<Header>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = vec![String::new(); header.len()];
        for (column, value) in pairs {
            if let Some(idx) = header.index_of(column) {
                values[idx] = value.to_owned();
            }
        }
        Self { header, values }
    }

    /// Header this row is keyed by.
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Raw cell values in header order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Cell value for `column`. `None` if the column is unknown or the record is short.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.header.index_of(column)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Overwrite the cell for `column`.
    ///
    /// Returns `false` (and changes nothing) when the header has no such column. A short record
    /// is padded with empty cells up to the column.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        let Some(idx) = self.header.index_of(column) else {
            return false;
        };
        if self.values.len() <= idx {
            self.values.resize(idx + 1, String::new());
        }
        self.values[idx] = value.into();
        true
    }

    /// Consume the row, returning its values.
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// A bounded, ordered batch of rows, identified by the absolute offset of its first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based offset of the first row among all data rows of the source.
    pub start_offset: usize,
    /// Rows in source order.
    pub rows: Vec<Row>,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(start_offset: usize, rows: Vec<Row>) -> Self {
        Self { start_offset, rows }
    }

    /// Number of rows in the chunk.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the chunk has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Offset one past the last row of this chunk.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.rows.len()
    }
}
