//! Email rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PipelineError, PipelineResult};
use crate::normalize::normalize_email;

use super::{CellRule, RuleOutcome};

/// Default email shape: dot-atom local part, `@`, and a domain of at least two dot-separated
/// labels. Matched against lowercase text, so only lowercase letters are listed.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$";

static DEFAULT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_EMAIL_PATTERN).expect("default email pattern compiles"));

/// Normalizes with trim → strip invisible → lowercase → NFC, then matches an email-shaped regex.
///
/// Empty values are invalid.
#[derive(Debug, Clone)]
pub struct EmailRule {
    pattern: Regex,
}

impl EmailRule {
    /// Use a custom pattern. It is matched against the normalized (lowercase) value with
    /// `is_match`, so it should be anchored with `^...$`.
    pub fn with_pattern(pattern: &str) -> PipelineResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| PipelineError::config(format!("invalid email pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Pattern source text.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for EmailRule {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_EMAIL_REGEX.clone(),
        }
    }
}

impl CellRule for EmailRule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let value = normalize_email(raw);
        let valid = !value.is_empty() && self.pattern.is_match(&value);
        RuleOutcome::new(value, valid)
    }
}
