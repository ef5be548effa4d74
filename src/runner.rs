//! File-to-file runner: CSV in, cleaned CSV out, text report alongside.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::ingestion::CsvRowSource;
use crate::output::CsvRowSink;
use crate::report::{write_text_report, Report, ReportContext};

/// Clean `input` according to `config`, writing the cleaned CSV to `output` and the
/// human-readable report to `log_path`.
///
/// The output file is written chunk by chunk. If the input cannot be read part-way through, the
/// error is returned, the output holds the chunks completed so far, and no report is written.
pub fn normalize_csv_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &PipelineConfig,
    log_path: impl AsRef<Path>,
) -> PipelineResult<Report> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let delimiter = config.delimiter_byte()?;
    let pipeline = config.build_pipeline()?;

    let source = CsvRowSource::from_path(input, delimiter)?;
    let mut sink = CsvRowSink::from_path(output, source.header(), delimiter)?;
    let report = pipeline.run_into(source, &mut sink)?;
    sink.finish()?;

    let ctx = ReportContext {
        delimiter,
        columns: config.column_names(),
        ..ReportContext::new(input, output)
    };
    write_text_report(log_path, &report, &ctx)?;
    Ok(report)
}
