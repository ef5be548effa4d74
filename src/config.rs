//! JSON configuration profiles.
//!
//! A profile names the columns to clean and the rules to run on each, in order:
//!
//! ```json
//! {
//!   "chunk_size": 1000,
//!   "delimiter": ",",
//!   "columns": [
//!     { "column": "email", "rules": [ { "rule": "email" } ] },
//!     { "column": "phone", "rules": [ { "rule": "phone", "min_len": 10, "max_len": 12 } ] }
//!   ],
//!   "row_filter": { "subset": ["email", "phone"] },
//!   "dedup": { "subset": ["email"], "ignore_empty": true }
//! }
//! ```
//!
//! Rule names: `email`, `phone`, `phone_prefix`, `ipv4`, `name`, `birthdate`, `min_length`.
//! Omitted parameters take the rule's defaults. An unknown rule name or parameter is a parse
//! error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::execution::{Pipeline, PipelineOptions, DEFAULT_CHUNK_SIZE};
use crate::rules::{
    BirthdateRule, EmailRule, Ipv4Rule, MinLengthRule, NameRule, PhoneRule, Rule, RuleKind, RuleSet,
};

/// A full run profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Single-byte field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    pub columns: Vec<ColumnConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_filter: Option<RowFilterConfig>,
    #[serde(default)]
    pub dedup: Option<DedupConfig>,
}

/// Rules for one column, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub column: String,
    pub rules: Vec<RuleConfig>,
}

/// One-filled row filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowFilterConfig {
    pub subset: Vec<String>,
}

/// Row dedup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DedupConfig {
    pub subset: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_empty: bool,
}

/// One rule with its parameters, tagged by `"rule"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum RuleConfig {
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Phone {
        #[serde(default = "default_phone_min")]
        min_len: usize,
        #[serde(default = "default_phone_max")]
        max_len: usize,
    },
    PhonePrefix {
        #[serde(default = "default_prefix_min")]
        min_len: usize,
        #[serde(default = "default_prefix_max")]
        max_len: usize,
    },
    Ipv4 {
        #[serde(default)]
        strict_octets: bool,
    },
    Name {
        #[serde(default = "default_min_letters")]
        min_letters: usize,
    },
    Birthdate {
        #[serde(default = "default_pivot_year")]
        pivot_year: u32,
    },
    MinLength {
        #[serde(default = "default_min_len")]
        min_len: usize,
    },
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_delimiter() -> char {
    ','
}
fn default_true() -> bool {
    true
}
fn default_phone_min() -> usize {
    PhoneRule::number().min_len
}
fn default_phone_max() -> usize {
    PhoneRule::number().max_len
}
fn default_prefix_min() -> usize {
    PhoneRule::prefix().min_len
}
fn default_prefix_max() -> usize {
    PhoneRule::prefix().max_len
}
fn default_min_letters() -> usize {
    NameRule::default().min_letters
}
fn default_pivot_year() -> u32 {
    BirthdateRule::default().pivot_year
}
fn default_min_len() -> usize {
    MinLengthRule::default().min_len
}

impl RuleConfig {
    /// Build the rule bound to `column`.
    pub fn build(&self, column: &str) -> PipelineResult<Rule> {
        let kind = match self {
            Self::Email { pattern: None } => RuleKind::Email(EmailRule::default()),
            Self::Email { pattern: Some(p) } => RuleKind::Email(EmailRule::with_pattern(p)?),
            Self::Phone { min_len, max_len } => RuleKind::Phone(PhoneRule {
                min_len: *min_len,
                max_len: *max_len,
            }),
            Self::PhonePrefix { min_len, max_len } => RuleKind::PhonePrefix(PhoneRule {
                min_len: *min_len,
                max_len: *max_len,
            }),
            Self::Ipv4 { strict_octets } => RuleKind::Ipv4(Ipv4Rule {
                strict_octets: *strict_octets,
            }),
            Self::Name { min_letters } => RuleKind::Name(NameRule {
                min_letters: *min_letters,
            }),
            Self::Birthdate { pivot_year } => {
                if *pivot_year > 99 {
                    return Err(PipelineError::config(format!(
                        "birthdate pivot_year must be a two-digit year (got {pivot_year})"
                    )));
                }
                RuleKind::Birthdate(BirthdateRule {
                    pivot_year: *pivot_year,
                })
            }
            Self::MinLength { min_len } => RuleKind::MinLength(MinLengthRule { min_len: *min_len }),
        };
        let rule = Rule::new(column, kind);
        rule.validate()?;
        Ok(rule)
    }
}

impl PipelineConfig {
    /// Parse a profile from JSON text and validate it.
    pub fn from_json_str(s: &str) -> PipelineResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a profile from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check everything that can be checked without data.
    pub fn validate(&self) -> PipelineResult<()> {
        self.delimiter_byte()?;
        self.build_pipeline().map(|_| ())
    }

    /// Delimiter as a byte. Must be a single ASCII character other than a quote or newline.
    pub fn delimiter_byte(&self) -> PipelineResult<u8> {
        match self.delimiter {
            '"' | '\n' | '\r' => Err(PipelineError::config(format!(
                "delimiter {:?} is not allowed",
                self.delimiter
            ))),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(PipelineError::config(format!("delimiter {c:?} is not a single-byte ASCII character"))),
        }
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            chunk_size: self.chunk_size,
        }
    }

    /// Configured columns, in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column.clone()).collect()
    }

    /// Build the rule registry: every column's rules, in configuration order.
    pub fn rule_set(&self) -> PipelineResult<RuleSet> {
        let mut rules = RuleSet::new();
        for col in &self.columns {
            if col.rules.is_empty() {
                return Err(PipelineError::config(format!("column '{}' has no rules", col.column)));
            }
            for rule in &col.rules {
                rules.push(rule.build(&col.column)?);
            }
        }
        Ok(rules)
    }

    /// Build a ready-to-run pipeline from this profile.
    pub fn build_pipeline(&self) -> PipelineResult<Pipeline> {
        let mut pipeline = Pipeline::new(self.options(), self.rule_set()?)?;
        if let Some(f) = &self.row_filter {
            pipeline = pipeline.with_row_filter(f.subset.clone())?;
        }
        match &self.dedup {
            Some(d) => pipeline.with_dedup(d.subset.clone(), d.ignore_empty),
            None => Ok(pipeline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineConfig, RuleConfig};
    use crate::error::PipelineError;
    use crate::rules::RuleKind;

    #[test]
    fn parses_minimal_email_profile_with_defaults() {
        let cfg = PipelineConfig::from_json_str(r#"{"columns":[{"column":"email","rules":[{"rule":"email"}]}]}"#)
            .unwrap();
        assert_eq!(cfg.chunk_size, 100_000);
        assert_eq!(cfg.delimiter_byte().unwrap(), b',');
        assert!(cfg.dedup.is_none());

        let rules = cfg.rule_set().unwrap();
        assert_eq!(rules.len(), 1);
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.name(), "email");
        assert_eq!(rule.target_column(), "email");
    }

    #[test]
    fn parses_full_profile() {
        let json = r#"{
            "chunk_size": 500,
            "delimiter": ";",
            "columns": [
                {"column": "email", "rules": [{"rule": "email", "pattern": "^[a-z]+@x\\.io$"}]},
                {"column": "phone", "rules": [{"rule": "phone", "min_len": 10}]},
                {"column": "cc", "rules": [{"rule": "phone_prefix"}]},
                {"column": "ip", "rules": [{"rule": "ipv4", "strict_octets": true}]},
                {"column": "first_name", "rules": [{"rule": "name"}, {"rule": "min_length", "min_len": 4}]},
                {"column": "dob", "rules": [{"rule": "birthdate", "pivot_year": 30}]}
            ],
            "dedup": {"subset": ["email", "phone"]}
        }"#;
        let cfg = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.delimiter_byte().unwrap(), b';');
        assert_eq!(cfg.options().chunk_size, 500);
        assert!(cfg.dedup.as_ref().unwrap().ignore_empty);
        assert_eq!(
            cfg.columns[1].rules[0],
            RuleConfig::Phone {
                min_len: 10,
                max_len: 13
            }
        );

        let rules = cfg.rule_set().unwrap();
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["email", "phone", "phone_prefix", "ipv4", "name", "min_length", "birthdate"]
        );
        match rules.iter().nth(3).unwrap().kind() {
            RuleKind::Ipv4(r) => assert!(r.strict_octets),
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn unknown_rule_name_is_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"columns":[{"column":"x","rules":[{"rule":"zip"}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Json(_)));
    }

    #[test]
    fn misspelled_rule_parameter_is_rejected() {
        for json in [
            r#"{"columns":[{"column":"p","rules":[{"rule":"phone","min_lenght":5}]}]}"#,
            r#"{"columns":[{"column":"e","rules":[{"rule":"email","patern":"^x$"}]}]}"#,
            r#"{"columns":[{"column":"n","rules":[{"rule":"name","min_letters":2,"max":9}]}]}"#,
            r#"{"columns":[{"column":"cc","rules":[{"rule":"phone_prefix","validate_cc":true}]}]}"#,
        ] {
            let err = PipelineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, PipelineError::Json(_)), "{json}: {err}");
        }
    }

    #[test]
    fn row_filter_is_configured_before_dedup() {
        let json = r#"{
            "columns": [{"column": "email", "rules": [{"rule": "email"}]}],
            "row_filter": {"subset": ["email", "phone"]},
            "dedup": {"subset": ["email"]}
        }"#;
        let cfg = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.row_filter.as_ref().unwrap().subset, vec!["email", "phone"]);

        let pipeline = cfg.build_pipeline().unwrap();
        let debug = format!("{pipeline:?}");
        assert!(debug.contains("row_filter: Some([\"email\", \"phone\"])"), "{debug}");

        let empty = r#"{"columns":[{"column":"e","rules":[{"rule":"email"}]}],"row_filter":{"subset":[]}}"#;
        assert!(matches!(PipelineConfig::from_json_str(empty), Err(PipelineError::Config { .. })));
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        for json in [
            r#"{"chunk_size":0,"columns":[{"column":"e","rules":[{"rule":"email"}]}]}"#,
            r#"{"columns":[]}"#,
            r#"{"columns":[{"column":"e","rules":[]}]}"#,
            r#"{"columns":[{"column":"","rules":[{"rule":"email"}]}]}"#,
            r#"{"columns":[{"column":"e","rules":[{"rule":"email","pattern":"(["}]}]}"#,
            r#"{"columns":[{"column":"p","rules":[{"rule":"phone","min_len":9,"max_len":3}]}]}"#,
            r#"{"columns":[{"column":"d","rules":[{"rule":"birthdate","pivot_year":1990}]}]}"#,
            r#"{"delimiter":"€","columns":[{"column":"e","rules":[{"rule":"email"}]}]}"#,
            r#"{"columns":[{"column":"e","rules":[{"rule":"email"}]}],"dedup":{"subset":[]}}"#,
        ] {
            let err = PipelineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, PipelineError::Config { .. }), "{json}: {err}");
        }
    }

    #[test]
    fn profile_round_trips_through_serde() {
        let json = r#"{"columns":[{"column":"email","rules":[{"rule":"email"}]}],"dedup":{"subset":["email"],"ignore_empty":false}}"#;
        let cfg = PipelineConfig::from_json_str(json).unwrap();
        let again = PipelineConfig::from_json_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(cfg, again);
    }
}
