//! Lazy CSV row source.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Header, Row};

/// Reads a headed CSV one record at a time.
///
/// Rules:
///
/// - the first record is the header (a leading UTF-8 BOM is removed from it)
/// - every cell is kept as text, unparsed and untrimmed
/// - records may be shorter or longer than the header
/// - a malformed record or invalid UTF-8 yields [`PipelineError::SourceRead`]
pub struct CsvRowSource<R> {
    records: ::csv::StringRecordsIntoIter<R>,
    header: Arc<Header>,
    next_row: usize,
}

impl CsvRowSource<File> {
    /// Open a CSV file with the given field delimiter.
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> PipelineResult<Self> {
        let rdr = reader_builder(delimiter).from_path(path)?;
        Self::from_csv_reader(rdr)
    }
}

impl<R: Read> CsvRowSource<R> {
    /// Read CSV data from any reader.
    pub fn from_reader(reader: R, delimiter: u8) -> PipelineResult<Self> {
        Self::from_csv_reader(reader_builder(delimiter).from_reader(reader))
    }

    /// Wrap an existing CSV reader. The reader must be configured with `has_headers(true)`.
    pub fn from_csv_reader(mut rdr: ::csv::Reader<R>) -> PipelineResult<Self> {
        let header = Header::new(
            rdr.headers()?
                .iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{FEFF}') } else { h }),
        );
        Ok(Self {
            records: rdr.into_records(),
            header: Arc::new(header),
            next_row: 0,
        })
    }

    /// Column names from the header record.
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }
}

fn reader_builder(delimiter: u8) -> ::csv::ReaderBuilder {
    let mut builder = ::csv::ReaderBuilder::new();
    builder.has_headers(true).delimiter(delimiter).flexible(true);
    builder
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = PipelineResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        let row = self.next_row;
        self.next_row += 1;
        Some(
            result
                .map(|record| Row::new(Arc::clone(&self.header), record.iter().map(str::to_owned).collect()))
                .map_err(|e| PipelineError::SourceRead {
                    row,
                    message: e.to_string(),
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CsvRowSource;
    use crate::error::PipelineError;

    #[test]
    fn reads_header_and_rows() {
        let input = "id,email\n1, A@B.com \n2,\n";
        let src = CsvRowSource::from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(src.header().columns, vec!["id", "email"]);

        let rows: Vec<_> = src.map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("email"), Some(" A@B.com "));
        assert_eq!(rows[1].get("email"), Some(""));
    }

    #[test]
    fn honors_delimiter_and_strips_bom() {
        let input = "\u{FEFF}id;email\n1;x@y.z\n";
        let mut src = CsvRowSource::from_reader(input.as_bytes(), b';').unwrap();
        assert_eq!(src.header().index_of("id"), Some(0));
        assert_eq!(src.next().unwrap().unwrap().get("email"), Some("x@y.z"));
    }

    #[test]
    fn ragged_records_are_allowed() {
        let input = "id,email,name\n1\n2,a@b.c,Ann,extra\n";
        let rows: Vec<_> = CsvRowSource::from_reader(input.as_bytes(), b',')
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(rows[0].get("email"), None);
        assert_eq!(rows[1].values().len(), 4);
    }

    #[test]
    fn invalid_utf8_is_a_source_read_error() {
        let mut input = b"id,email\n1,ok@x.io\n2,".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let mut src = CsvRowSource::from_reader(input.as_slice(), b',').unwrap();
        assert!(src.next().unwrap().is_ok());
        let err = src.next().unwrap().unwrap_err();
        assert!(matches!(err, PipelineError::SourceRead { row: 1, .. }));
    }
}
