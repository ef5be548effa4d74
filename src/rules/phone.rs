//! Phone number and calling-code prefix rule.

use crate::error::{PipelineError, PipelineResult};
use crate::normalize::{clean, digits_only};

use super::{CellRule, RuleOutcome};

/// Reduces the value to ASCII digits and checks the digit count is in `[min_len, max_len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneRule {
    pub min_len: usize,
    pub max_len: usize,
}

impl PhoneRule {
    /// Bounds for a full phone number (9..=13 digits).
    pub fn number() -> Self {
        Self {
            min_len: 9,
            max_len: 13,
        }
    }

    /// Bounds for a calling-code prefix (1..=3 digits).
    pub fn prefix() -> Self {
        Self {
            min_len: 1,
            max_len: 3,
        }
    }

    pub(crate) fn validate(&self) -> PipelineResult<()> {
        if self.min_len == 0 || self.min_len > self.max_len {
            return Err(PipelineError::config(format!(
                "phone digit bounds must satisfy 0 < min_len <= max_len (got {}..={})",
                self.min_len, self.max_len
            )));
        }
        Ok(())
    }
}

impl Default for PhoneRule {
    fn default() -> Self {
        Self::number()
    }
}

impl CellRule for PhoneRule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let value = digits_only(&clean(raw));
        let len = value.len();
        let valid = len >= self.min_len && len <= self.max_len;
        RuleOutcome::new(value, valid)
    }
}
