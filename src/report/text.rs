//! Human-readable `.txt` rendering of a [`Report`].

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineResult;

use super::{Report, RowFilterSummary, RuleReport};

const RULE: &str = "================";

/// Run metadata printed in the report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Unix timestamp (seconds) printed in the header.
    pub generated_at: u64,
    pub input: PathBuf,
    pub output: PathBuf,
    pub delimiter: u8,
    /// Columns covered by rules, in configuration order.
    pub columns: Vec<String>,
    /// Cap on listed rejections per section. `None` lists all of them.
    pub max_listed: Option<usize>,
}

impl ReportContext {
    /// Context stamped with the current time.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            generated_at: unix_ts(),
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            delimiter: b',',
            columns: Vec::new(),
            max_listed: None,
        }
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Render the full log: header, one section per rule (titled e.g. `MAIL`), row filter, dedup,
/// footer.
pub fn render_text(report: &Report, ctx: &ReportContext) -> String {
    let mut out = String::new();
    render_header(&mut out, report, ctx);
    for section in report.sections() {
        render_section(&mut out, section, ctx.max_listed);
    }
    if let Some(filter) = &report.row_filter {
        render_row_filter(&mut out, filter);
    }
    if let Some(dedup) = &report.dedup {
        let _ = writeln!(out, "{RULE} DEDUP {RULE}");
        let _ = writeln!(out, "Columns: {}", dedup.subset.join(", "));
        let _ = writeln!(out, "Duplicates removed: {}", dedup.removed);
        out.push('\n');
    }
    let _ = writeln!(out, "{RULE} END OF REPORT {RULE}");
    out
}

fn render_header(out: &mut String, report: &Report, ctx: &ReportContext) {
    let columns = if ctx.columns.is_empty() {
        "-".to_string()
    } else {
        ctx.columns.join(", ")
    };
    let row_filter = match &report.row_filter {
        Some(f) => format!("ON (by: {})", f.subset.join(", ")),
        None => "OFF".to_string(),
    };
    let dedup = match &report.dedup {
        Some(d) => format!("ON (by: {})", d.subset.join(", ")),
        None => "OFF".to_string(),
    };

    let _ = writeln!(out, "{RULE} NORMALIZATION REPORT {RULE}");
    let _ = writeln!(out, "Generated at (unix): {}", ctx.generated_at);
    let _ = writeln!(out, "Input file: {}", ctx.input.display());
    let _ = writeln!(out, "Output file: {}", ctx.output.display());
    let _ = writeln!(out, "Rows processed: {}", report.rows_total);
    let _ = writeln!(out, "Columns: {columns}");
    let _ = writeln!(out, "Delimiter: {}", char::from(ctx.delimiter));
    let _ = writeln!(out, "Row filter: {row_filter}");
    let _ = writeln!(out, "Dedup: {dedup}");
    out.push('\n');
}

fn render_section(out: &mut String, section: &RuleReport, max_listed: Option<usize>) {
    let col = &section.column;
    let _ = writeln!(out, "{RULE} {} {RULE}", section.title);
    let _ = writeln!(out, "[{col}] cells examined: {}", section.stats.examined);
    let _ = writeln!(out, "[{col}] cells changed: {}", section.stats.changed);
    let _ = writeln!(out, "[{col}] cells cleared by validation: {}", section.stats.rejected);
    out.push('\n');

    if section.records.is_empty() {
        out.push_str("(no rejections)\n\n");
        return;
    }
    let shown = max_listed.unwrap_or(usize::MAX).min(section.records.len());
    for rec in &section.records[..shown] {
        let _ = writeln!(out, "[{col}] row {}: \"{}\" -> \"\" ({})", rec.row, rec.raw, rec.rule);
    }
    if shown < section.records.len() {
        let _ = writeln!(out, "... and {} more", section.records.len() - shown);
    }
    out.push('\n');
}

fn render_row_filter(out: &mut String, filter: &RowFilterSummary) {
    let _ = writeln!(out, "{RULE} ROW FILTER {RULE}");
    let _ = writeln!(out, "Rule: drop a row when exactly one of the checked columns is filled");
    let _ = writeln!(out, "Columns: {}", filter.subset.join(", "));
    let _ = writeln!(out, "Rows removed: {}", filter.removed);
    out.push('\n');
}

/// Render the report and write it to `path`, creating parent directories.
pub fn write_text_report(path: impl AsRef<Path>, report: &Report, ctx: &ReportContext) -> PipelineResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_text(report, ctx))?;
    Ok(())
}
