//! Birth date rule: rewrites common day/month/year layouts as `dd/mm/yyyy`.
//!
//! Recognized layouts (any non-digit separators):
//!
//! - three groups: `D M Y`, or `Y M D` when the first group has four digits
//! - one group of eight digits: `YYYYMMDD` when it starts with 1900..=2099, else `DDMMYYYY`
//! - one group of six digits: `DDMMYY`
//!
//! Two-digit years are expanded around `pivot_year`: below the pivot → `20yy`, otherwise `19yy`.
//! Day and month must have one or two digits. No calendar validation is done (`31/02/2000` is
//! accepted). Any letter makes the value invalid.

use crate::normalize::clean;

use super::{CellRule, RuleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdateRule {
    pub pivot_year: u32,
}

impl Default for BirthdateRule {
    fn default() -> Self {
        Self { pivot_year: 25 }
    }
}

impl BirthdateRule {
    fn expand_year(&self, yy: u32) -> u32 {
        if yy < self.pivot_year {
            2000 + yy
        } else {
            1900 + yy
        }
    }

    fn parse(&self, s: &str) -> Option<String> {
        if s.chars().any(char::is_alphabetic) {
            return None;
        }
        let groups: Vec<&str> = s
            .split(|c: char| !c.is_ascii_digit())
            .filter(|g| !g.is_empty())
            .collect();

        let (d, m, y) = match groups.as_slice() {
            [a, b, c] if a.len() == 4 => (*c, *b, *a),
            [a, b, c] => (*a, *b, *c),
            [g] if g.len() == 8 => {
                let leading: u32 = g[..4].parse().ok()?;
                if (1900..=2099).contains(&leading) {
                    (&g[6..], &g[4..6], &g[..4])
                } else {
                    (&g[..2], &g[2..4], &g[4..])
                }
            }
            [g] if g.len() == 6 => (&g[..2], &g[2..4], &g[4..]),
            _ => return None,
        };

        if d.len() > 2 || m.len() > 2 {
            return None;
        }
        let year = match y.len() {
            2 => self.expand_year(y.parse().ok()?),
            4 => y.parse().ok()?,
            _ => return None,
        };
        Some(format!("{d:0>2}/{m:0>2}/{year:04}"))
    }
}

impl CellRule for BirthdateRule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return RuleOutcome::new(cleaned, false);
        }
        match self.parse(&cleaned) {
            Some(value) => RuleOutcome::new(value, true),
            None => RuleOutcome::new(cleaned, false),
        }
    }
}
