//! Applying one [`Rule`] to one [`Chunk`].

use crate::report::{CellStats, RejectionRecord};
use crate::rules::Rule;
use crate::types::Chunk;

/// A chunk after one rule pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedChunk {
    /// The chunk with its target-column cells rewritten.
    pub chunk: Chunk,
    /// Rejections in row order.
    pub rejections: Vec<RejectionRecord>,
    /// Counts for this chunk only.
    pub stats: CellStats,
}

/// Apply `rule` to the target column of every row in `chunk`.
///
/// - valid cells are replaced by their normalized value
/// - invalid cells are cleared to `""` and produce a [`RejectionRecord`] whose row offset is
///   `chunk.start_offset + index`
/// - absent cells are treated as `""`; a column missing from the header is never created
///
/// Other columns are not touched.
pub fn process_chunk(mut chunk: Chunk, rule: &Rule) -> ProcessedChunk {
    let column = rule.target_column();
    let mut rejections = Vec::new();
    let mut stats = CellStats::default();

    for (idx, row) in chunk.rows.iter_mut().enumerate() {
        let raw = row.get(column).unwrap_or("").to_owned();
        let outcome = rule.apply(&raw);
        stats.examined += 1;

        if outcome.valid {
            if outcome.value != raw {
                stats.changed += 1;
                row.set(column, outcome.value);
            }
        } else {
            stats.rejected += 1;
            if !raw.is_empty() {
                row.set(column, "");
            }
            rejections.push(RejectionRecord {
                row: chunk.start_offset + idx,
                column: column.to_string(),
                raw,
                rule: rule.name().to_string(),
            });
        }
    }

    ProcessedChunk {
        chunk,
        rejections,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::process_chunk;
    use crate::report::CellStats;
    use crate::rules::{MinLengthRule, Rule, RuleKind};
    use crate::types::{Chunk, Header, Row};

    fn header() -> Arc<Header> {
        Arc::new(Header::new(["id", "email"]))
    }

    fn chunk_of(start: usize, emails: &[&str]) -> Chunk {
        let h = header();
        let rows = emails
            .iter()
            .enumerate()
            .map(|(i, e)| Row::from_pairs(h.clone(), [("id", (start + i).to_string().as_str()), ("email", *e)]))
            .collect();
        Chunk::new(start, rows)
    }

    #[test]
    fn valid_cells_are_normalized_without_rejection() {
        let out = process_chunk(chunk_of(0, &["  Foo@Bar.COM "]), &Rule::email("email"));
        assert_eq!(out.chunk.rows[0].get("email"), Some("foo@bar.com"));
        assert!(out.rejections.is_empty());
        assert_eq!(out.stats, CellStats { examined: 1, changed: 1, rejected: 0 });
    }

    #[test]
    fn invalid_cells_are_cleared_and_recorded_with_absolute_offsets() {
        let out = process_chunk(chunk_of(10, &["ok@mail.com", "not-an-email", ""]), &Rule::email("email"));

        assert_eq!(out.chunk.rows[1].get("email"), Some(""));
        assert_eq!(out.chunk.rows[2].get("email"), Some(""));
        assert_eq!(out.rejections.len(), 2);
        assert_eq!(out.rejections[0].row, 11);
        assert_eq!(out.rejections[0].raw, "not-an-email");
        assert_eq!(out.rejections[0].column, "email");
        assert_eq!(out.rejections[0].rule, "email");
        assert_eq!(out.rejections[1].row, 12);
        assert_eq!(out.rejections[1].raw, "");
        assert_eq!(out.stats, CellStats { examined: 3, changed: 0, rejected: 2 });
    }

    #[test]
    fn non_target_columns_are_untouched() {
        let out = process_chunk(chunk_of(0, &["BAD", "Good@X.io"]), &Rule::email("email"));
        assert_eq!(out.chunk.rows[0].get("id"), Some("0"));
        assert_eq!(out.chunk.rows[1].get("id"), Some("1"));
    }

    #[test]
    fn missing_column_is_treated_as_empty_and_not_created() {
        let out = process_chunk(chunk_of(0, &["a@b.com"]), &Rule::email("contact"));
        assert_eq!(out.rejections.len(), 1);
        assert_eq!(out.rejections[0].raw, "");
        assert_eq!(out.chunk.rows[0].values().len(), 2);
        assert_eq!(out.chunk.rows[0].get("email"), Some("a@b.com"));
    }

    #[test]
    fn short_record_is_treated_as_empty() {
        let row = Row::new(header(), vec!["7".to_string()]);
        let out = process_chunk(Chunk::new(0, vec![row]), &Rule::email("email"));
        assert_eq!(out.rejections[0].raw, "");
        assert_eq!(out.chunk.rows[0].values(), &["7".to_string()]);
    }

    #[test]
    fn value_preserving_rule_reports_no_change() {
        let rule = Rule::new("email", RuleKind::MinLength(MinLengthRule { min_len: 2 }));
        let out = process_chunk(chunk_of(0, &[" abc "]), &rule);
        assert_eq!(out.chunk.rows[0].get("email"), Some(" abc "));
        assert_eq!(out.stats.changed, 0);
    }
}
