//! Minimum length rule.

use crate::normalize::clean;

use super::{CellRule, RuleOutcome};

/// Rejects values shorter than `min_len` characters, counted after [`clean`].
///
/// Valid values are stored unchanged, so this rule can run after other rules without undoing
/// their formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLengthRule {
    pub min_len: usize,
}

impl Default for MinLengthRule {
    fn default() -> Self {
        Self { min_len: 3 }
    }
}

impl CellRule for MinLengthRule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let visible = clean(raw);
        let len = visible.chars().count();
        let valid = len > 0 && len >= self.min_len;
        RuleOutcome::new(raw.to_owned(), valid)
    }
}
