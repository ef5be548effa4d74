//! Column rules: stateless cleaning + validation capabilities bound to one target column.
//!
//! Every rule follows the same contract, `apply(raw) -> RuleOutcome`: the raw cell text (absent
//! cells are passed as `""`) is normalized, and the normalized value is checked. `apply` is total;
//! malformed input is the expected case and is reported through [`RuleOutcome::valid`], never as
//! an error.
//!
//! Rule variants form a closed set ([`RuleKind`]); new kinds are added as new variants.
//!
//! ```rust
//! use csv_normalizer::rules::Rule;
//!
//! let rule = Rule::email("email");
//! let out = rule.apply("  Foo@Bar.COM ");
//! assert_eq!(out.value, "foo@bar.com");
//! assert!(out.valid);
//!
//! let out = rule.apply("not-an-email");
//! assert!(!out.valid);
//! ```

pub mod birthdate;
pub mod email;
pub mod length;
pub mod name;
pub mod network;
pub mod phone;

use std::fmt;

use crate::error::{PipelineError, PipelineResult};

pub use birthdate::BirthdateRule;
pub use email::{EmailRule, DEFAULT_EMAIL_PATTERN};
pub use length::MinLengthRule;
pub use name::NameRule;
pub use network::Ipv4Rule;
pub use phone::PhoneRule;

/// Result of applying a rule to one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Normalized value. Always produced, even when the cell is invalid.
    pub value: String,
    /// Whether the normalized value passed validation.
    pub valid: bool,
}

impl RuleOutcome {
    pub(crate) fn new(value: String, valid: bool) -> Self {
        Self { value, valid }
    }
}

/// A single cleaning/validation capability.
///
/// Implemented by every rule variant; [`RuleKind`] dispatches to it.
pub trait CellRule {
    /// Normalize `raw` and decide its validity.
    fn apply(&self, raw: &str) -> RuleOutcome;
}

/// Closed set of rule variants.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Email address: trim → strip invisible → lowercase → NFC → regex.
    Email(EmailRule),
    /// Full phone number reduced to digits, bounded digit count.
    Phone(PhoneRule),
    /// Calling-code prefix reduced to digits, bounded digit count.
    PhonePrefix(PhoneRule),
    /// Dotted-quad IPv4 address.
    Ipv4(Ipv4Rule),
    /// Personal name, title-cased, minimum letter count.
    Name(NameRule),
    /// Birth date rewritten as `dd/mm/yyyy`.
    Birthdate(BirthdateRule),
    /// Minimum visible length; keeps the original text.
    MinLength(MinLengthRule),
}

impl RuleKind {
    /// Stable rule name used in reports and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
            Self::PhonePrefix(_) => "phone_prefix",
            Self::Ipv4(_) => "ipv4",
            Self::Name(_) => "name",
            Self::Birthdate(_) => "birthdate",
            Self::MinLength(_) => "min_length",
        }
    }

    /// Title of the human-readable report section for this rule.
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::Email(_) => "MAIL",
            Self::Phone(_) => "PHONE",
            Self::PhonePrefix(_) => "PHONE PREFIX",
            Self::Ipv4(_) => "IP ADDRESS",
            Self::Name(_) => "NAME",
            Self::Birthdate(_) => "BIRTHDATE",
            Self::MinLength(_) => "LENGTH",
        }
    }

    fn as_cell_rule(&self) -> &dyn CellRule {
        match self {
            Self::Email(r) => r,
            Self::Phone(r) | Self::PhonePrefix(r) => r,
            Self::Ipv4(r) => r,
            Self::Name(r) => r,
            Self::Birthdate(r) => r,
            Self::MinLength(r) => r,
        }
    }

    fn validate(&self) -> PipelineResult<()> {
        match self {
            Self::Phone(r) | Self::PhonePrefix(r) => r.validate(),
            _ => Ok(()),
        }
    }
}

impl CellRule for RuleKind {
    fn apply(&self, raw: &str) -> RuleOutcome {
        self.as_cell_rule().apply(raw)
    }
}

/// A rule bound to its target column. Immutable and reusable across every chunk of a run.
#[derive(Debug, Clone)]
pub struct Rule {
    column: String,
    kind: RuleKind,
}

impl Rule {
    /// Bind `kind` to `column`.
    pub fn new(column: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    /// Email rule with the default pattern.
    pub fn email(column: impl Into<String>) -> Self {
        Self::new(column, RuleKind::Email(EmailRule::default()))
    }

    /// Column this rule reads and rewrites.
    pub fn target_column(&self) -> &str {
        &self.column
    }

    /// Rule variant.
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Rule name, e.g. `"email"`.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Normalize and validate one raw cell.
    pub fn apply(&self, raw: &str) -> RuleOutcome {
        self.kind.apply(raw)
    }

    /// Check the rule is runnable.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.column.trim().is_empty() {
            return Err(PipelineError::config(format!(
                "rule '{}' has no target column",
                self.name()
            )));
        }
        self.kind.validate()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.column)
    }
}

/// Ordered collection of rules for one run, constructed once by the caller.
///
/// Rules run in registration order; each `(rule name, column)` pair may appear only once.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Builder-style [`Self::push`].
    pub fn with(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    /// Iterate rules in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules registered under `name`, in registration order.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.name() == name)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every rule, and that there is at least one and no duplicates.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.rules.is_empty() {
            return Err(PipelineError::config("no rules configured"));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            rule.validate()?;
            let duplicate = self.rules[..i]
                .iter()
                .any(|r| r.name() == rule.name() && r.target_column() == rule.target_column());
            if duplicate {
                return Err(PipelineError::config(format!("rule {rule} is registered twice")));
            }
        }
        Ok(())
    }
}

impl From<Rule> for RuleSet {
    fn from(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{PhoneRule, Rule, RuleKind, RuleSet};
    use crate::error::PipelineError;

    #[test]
    fn rule_without_target_column_is_a_config_error() {
        let err = Rule::email("  ").validate().unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
        assert!(err.to_string().contains("no target column"));
    }

    #[test]
    fn empty_rule_set_is_rejected() {
        let err = RuleSet::new().validate().unwrap_err();
        assert!(err.to_string().contains("no rules configured"));
    }

    #[test]
    fn duplicate_rule_on_same_column_is_rejected() {
        let rules = RuleSet::new().with(Rule::email("email")).with(Rule::email("email"));
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("email(email)"));
    }

    #[test]
    fn same_rule_on_different_columns_is_allowed() {
        let rules = RuleSet::new()
            .with(Rule::email("email"))
            .with(Rule::email("backup_email"))
            .with(Rule::new("phone", RuleKind::Phone(PhoneRule::default())));
        rules.validate().unwrap();
        assert_eq!(rules.by_name("email").count(), 2);
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn rule_exposes_name_and_section_title() {
        let rule = Rule::email("mail");
        assert_eq!(rule.name(), "email");
        assert_eq!(rule.kind().section_title(), "MAIL");
        assert_eq!(rule.to_string(), "email(mail)");
    }
}
