//! IPv4 address rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean, trim};

use super::{CellRule, RuleOutcome};

static IPV4_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{1,3}){3}$").expect("ipv4 pattern compiles"));

const QUOTES: &[char] = &['\'', '"', '`', '\u{00B4}'];

/// Dotted-quad IPv4 check.
///
/// Normalization removes invisible characters, trims, composes to NFC, and unwraps one pair of
/// matching outer quotes (`'1.2.3.4'` → `1.2.3.4`).
/// With `strict_octets` every octet must also be `<= 255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv4Rule {
    pub strict_octets: bool,
}

impl Ipv4Rule {
    pub fn strict() -> Self {
        Self {
            strict_octets: true,
        }
    }
}

fn strip_outer_quotes(s: &str) -> &str {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            &s[first.len_utf8()..s.len() - last.len_utf8()]
        }
        _ => s,
    }
}

impl CellRule for Ipv4Rule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let cleaned = clean(raw);
        let value = trim(strip_outer_quotes(&cleaned)).to_owned();

        let mut valid = IPV4_SHAPE.is_match(&value);
        if valid && self.strict_octets {
            valid = value.split('.').all(|octet| octet.parse::<u8>().is_ok());
        }
        RuleOutcome::new(value, valid)
    }
}
