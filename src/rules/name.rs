//! Personal name rule.

use crate::normalize::clean;

use super::{CellRule, RuleOutcome};

const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{2018}', '\u{201B}', '`', '\u{00B4}'];
const HYPHENS: &[char] = &['-', '\u{2013}', '\u{2014}'];

/// Name cleanup: apostrophes and hyphens become spaces, everything that is not a letter or a
/// space is dropped, and each word is title-cased. Inner spacing is preserved as-is.
///
/// Valid when at least `min_letters` letters remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRule {
    pub min_letters: usize,
}

impl Default for NameRule {
    fn default() -> Self {
        Self { min_letters: 3 }
    }
}

fn title_case_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch == ' ' {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

impl CellRule for NameRule {
    fn apply(&self, raw: &str) -> RuleOutcome {
        let letters_and_spaces: String = clean(raw)
            .chars()
            .map(|c| {
                if APOSTROPHES.contains(&c) || HYPHENS.contains(&c) {
                    ' '
                } else {
                    c
                }
            })
            .filter(|&c| c.is_alphabetic() || c == ' ')
            .collect();

        let value = title_case_words(letters_and_spaces.trim_matches(' '));
        let letters = value.chars().filter(|c| c.is_alphabetic()).count();
        let valid = letters >= self.min_letters;
        RuleOutcome::new(value, valid)
    }
}
