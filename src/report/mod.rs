//! Structured run report: rejected cells and counts per rule/column.
//!
//! The [`Report`] is a plain value built incrementally by the pipeline and read-only once the run
//! completes. Rendering it as a human-readable log is handled by [`text`].

pub mod text;

use serde::Serialize;

use crate::rules::{Rule, RuleSet};

pub use text::{render_text, write_text_report, ReportContext};

/// Evidence that one cell failed its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionRecord {
    /// Absolute 0-based data-row offset.
    pub row: usize,
    /// Target column of the rule.
    pub column: String,
    /// Cell value before any normalization (`""` when absent).
    pub raw: String,
    /// Name of the rule that rejected the cell.
    pub rule: String,
}

/// Per-chunk counts produced alongside rejections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellStats {
    /// Target cells examined (one per row, absent cells included).
    pub examined: usize,
    /// Valid cells whose stored value changed through normalization.
    pub changed: usize,
    /// Cells that failed validation and were cleared.
    pub rejected: usize,
}

impl CellStats {
    fn add(&mut self, other: CellStats) {
        self.examined += other.examined;
        self.changed += other.changed;
        self.rejected += other.rejected;
    }
}

/// Everything reported for one `(rule, column)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub rule: String,
    pub column: String,
    /// Human-readable section title, e.g. `MAIL`.
    pub title: String,
    pub stats: CellStats,
    /// Rejections in row-offset order.
    pub records: Vec<RejectionRecord>,
}

impl RuleReport {
    fn for_rule(rule: &Rule) -> Self {
        Self {
            rule: rule.name().to_string(),
            column: rule.target_column().to_string(),
            title: rule.kind().section_title().to_string(),
            stats: CellStats::default(),
            records: Vec::new(),
        }
    }
}

/// Row-level dedup outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupSummary {
    pub subset: Vec<String>,
    pub removed: usize,
}

/// Row filter outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFilterSummary {
    pub subset: Vec<String>,
    pub removed: usize,
}

/// Aggregate run report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Data rows read from the source.
    pub rows_total: usize,
    /// Chunks processed.
    pub chunks: usize,
    sections: Vec<RuleReport>,
    /// Present when the one-filled row filter was enabled.
    pub row_filter: Option<RowFilterSummary>,
    /// Present when row dedup was enabled.
    pub dedup: Option<DedupSummary>,
}

impl Report {
    /// Empty report with one section per rule, in registration order.
    pub fn for_rules(rules: &RuleSet) -> Self {
        Self {
            sections: rules.iter().map(RuleReport::for_rule).collect(),
            ..Self::default()
        }
    }

    /// All sections in rule registration order.
    pub fn sections(&self) -> &[RuleReport] {
        &self.sections
    }

    /// Section for a rule name bound to `column`.
    pub fn section(&self, rule: &str, column: &str) -> Option<&RuleReport> {
        self.sections
            .iter()
            .find(|s| s.rule == rule && s.column == column)
    }

    /// Distinct rule names, in first-registration order.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for s in &self.sections {
            if !names.contains(&s.rule.as_str()) {
                names.push(&s.rule);
            }
        }
        names
    }

    /// Rejections recorded by `rule` on `column`, in row-offset order.
    ///
    /// Each row offset appears at most once. Empty when no such rule was registered.
    pub fn records_for(&self, rule: &str, column: &str) -> &[RejectionRecord] {
        match self.section(rule, column) {
            Some(section) => &section.records,
            None => &[],
        }
    }

    /// Counts for `rule` on `column`.
    pub fn stats_for(&self, rule: &str, column: &str) -> CellStats {
        self.section(rule, column).map(|s| s.stats).unwrap_or_default()
    }

    /// Rejections across all rules.
    pub fn total_rejected(&self) -> usize {
        self.sections.iter().map(|s| s.stats.rejected).sum()
    }

    /// Append one chunk's outcome for `rule`. Records must arrive in row order.
    pub(crate) fn absorb(&mut self, rule: &Rule, stats: CellStats, records: Vec<RejectionRecord>) {
        let idx = match self
            .sections
            .iter()
            .position(|s| s.rule == rule.name() && s.column == rule.target_column())
        {
            Some(idx) => idx,
            None => {
                self.sections.push(RuleReport::for_rule(rule));
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[idx];
        debug_assert!(
            match (section.records.last(), records.first()) {
                (Some(prev), Some(next)) => prev.row < next.row,
                _ => true,
            },
            "rejections must arrive in row order"
        );
        section.stats.add(stats);
        section.records.extend(records);
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
