//! The embedded rule grammar.
//!
//! A rule string has the form `rule{{ clause(;clause)* }}` where each clause
//! is `key:value`:
//!
//! | key            | value                                   |
//! |----------------|-----------------------------------------|
//! | `type`         | `string`, `uuid`, `int64`, `unixtime`, `slice` |
//! | `slice`        | `true` or `false`                       |
//! | `choose_one`   | `[a,b,c]`                               |
//! | `ran`          | `min..max`                              |
//! | `num_el_ran`   | `min..max`                              |
//! | `num_el_sync`  | field path                              |
//! | `unixtime_ref` | epoch seconds                           |
//! | `retention`    | integer                                 |
//!
//! Unknown keys are skipped.

use crate::error::RuleError;
use crate::rule::{Bounds, Rule, TimeReference, ValueKind, MAX_ARRAY_LENGTH};
use std::fmt;
use tracing::{debug, warn};

const RULE_PREFIX: &str = "rule{{";
const RULE_SUFFIX: &str = "}}";

/// Return the clause list of a rule string, or `None` for a literal string.
pub fn rule_body(text: &str) -> Option<&str> {
    text.strip_prefix(RULE_PREFIX)?
        .strip_suffix(RULE_SUFFIX)
        .map(str::trim)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseKey {
    Type,
    Slice,
    ChooseOne,
    Ran,
    NumElRan,
    NumElSync,
    UnixtimeRef,
    Retention,
}

impl ClauseKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "type" => Some(Self::Type),
            "slice" => Some(Self::Slice),
            "choose_one" => Some(Self::ChooseOne),
            "ran" => Some(Self::Ran),
            "num_el_ran" => Some(Self::NumElRan),
            "num_el_sync" => Some(Self::NumElSync),
            "unixtime_ref" => Some(Self::UnixtimeRef),
            "retention" => Some(Self::Retention),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Slice => "slice",
            Self::ChooseOne => "choose_one",
            Self::Ran => "ran",
            Self::NumElRan => "num_el_ran",
            Self::NumElSync => "num_el_sync",
            Self::UnixtimeRef => "unixtime_ref",
            Self::Retention => "retention",
        }
    }
}

impl fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct RuleBuilder {
    kind: Option<ValueKind>,
    is_array: bool,
    value_range: Option<Bounds>,
    length_range: Option<Bounds>,
    choices: Option<Vec<String>>,
    sync_with: Option<String>,
    time_reference: TimeReference,
    retention: Option<i64>,
}

impl RuleBuilder {
    fn apply(&mut self, key: ClauseKey, value: &str) -> Result<(), RuleError> {
        match key {
            ClauseKey::Type => match value {
                "slice" => self.mark_array()?,
                name => match ValueKind::from_type_name(name) {
                    Some(kind) => self.kind = Some(kind),
                    None => warn!("Ignoring unknown rule type '{}'", name),
                },
            },
            ClauseKey::Slice => match value {
                "true" => self.mark_array()?,
                "false" => {}
                other => warn!("Ignoring slice value '{}', expected true or false", other),
            },
            ClauseKey::ChooseOne => {
                let list = value.strip_prefix('[').unwrap_or(value);
                let list = list.strip_suffix(']').unwrap_or(list);
                let options: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|option| !option.is_empty())
                    .map(str::to_string)
                    .collect();
                if options.is_empty() {
                    return Err(RuleError::EmptyChoiceSet);
                }
                self.choices = Some(options);
            }
            ClauseKey::Ran => self.value_range = Some(parse_range(key, value)?),
            ClauseKey::NumElRan => {
                let bounds = parse_range(key, value)?;
                if bounds.min < 0 {
                    return Err(RuleError::NegativeLength(bounds.min));
                }
                if bounds.max > MAX_ARRAY_LENGTH {
                    return Err(RuleError::LengthTooLarge {
                        max: bounds.max,
                        limit: MAX_ARRAY_LENGTH,
                    });
                }
                self.length_range = Some(bounds);
            }
            ClauseKey::NumElSync => {
                if value.is_empty() {
                    return Err(RuleError::EndOfClause(key.to_string()));
                }
                self.sync_with = Some(value.to_string());
            }
            ClauseKey::UnixtimeRef => {
                self.time_reference = match value.parse() {
                    Ok(epoch) => TimeReference::Fixed(epoch),
                    Err(_) => TimeReference::Now,
                };
            }
            ClauseKey::Retention => self.retention = Some(value.parse().unwrap_or(1)),
        }
        Ok(())
    }

    fn mark_array(&mut self) -> Result<(), RuleError> {
        if self.kind.is_none() {
            return Err(RuleError::SliceWithoutType);
        }
        self.is_array = true;
        Ok(())
    }

    fn finish(self, path: String, parent: String, raw: &str) -> Result<Rule, RuleError> {
        let kind = self.kind.unwrap_or(ValueKind::Text);
        if kind.is_integer() {
            if let Some(bad) = self
                .choices
                .iter()
                .flatten()
                .find(|option| option.parse::<i64>().is_err())
            {
                return Err(RuleError::ChoiceNotInteger(bad.clone()));
            }
        }

        Ok(Rule {
            path,
            parent,
            raw: raw.to_string(),
            kind,
            is_array: self.is_array,
            value_range: self.value_range,
            length_range: self.length_range,
            choices: self.choices,
            sync_with: self.sync_with,
            time_reference: self.time_reference,
            retention: self.retention.unwrap_or(1),
        })
    }
}

fn parse_range(key: ClauseKey, value: &str) -> Result<Bounds, RuleError> {
    let (min, max) = value
        .split_once("..")
        .ok_or_else(|| RuleError::RangeNeedsTwoBounds(value.to_string()))?;
    let parse_bound = |bound: &str| {
        bound
            .trim()
            .parse::<i64>()
            .map_err(|_| RuleError::NotANumber {
                clause: key.as_str(),
                value: bound.to_string(),
            })
    };
    Bounds::new(parse_bound(min)?, parse_bound(max)?)
}

/// Compile the clause list of one rule string.
///
/// `raw` is the complete rule string; `body` is what [`rule_body`] returned
/// for it.
pub fn compile_rule(path: String, parent: String, raw: &str, body: &str) -> Result<Rule, RuleError> {
    let mut builder = RuleBuilder::default();

    for clause in body.split(';').map(str::trim) {
        if clause.is_empty() {
            continue;
        }
        let (key, value) = match clause.split_once(':') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (clause, None),
        };
        let Some(key) = ClauseKey::parse(key) else {
            debug!("Skipping unknown clause '{}' in rule for '{}'", clause, path);
            continue;
        };
        let value = value.ok_or_else(|| RuleError::EndOfClause(key.to_string()))?;
        builder.apply(key, value)?;
    }

    builder.finish(path, parent, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str) -> Result<Rule, RuleError> {
        let body = rule_body(raw).expect("not a rule string");
        compile_rule("field".to_string(), String::new(), raw, body)
    }

    #[test]
    fn test_rule_body() {
        assert_eq!(rule_body("rule{{type:uuid}}"), Some("type:uuid"));
        assert_eq!(rule_body("rule{{ type:int64; ran:1..3 }}"), Some("type:int64; ran:1..3"));
        assert_eq!(rule_body("plain text"), None);
        assert_eq!(rule_body("rule{{type:uuid"), None);
        assert_eq!(rule_body(" rule{{type:uuid}}"), None);
    }

    #[test]
    fn test_type_clauses() {
        let rule = compile("rule{{type:string}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Text);
        assert!(rule.is_quoted());

        let rule = compile("rule{{type:uuid}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Uuid);
        assert!(rule.is_quoted());

        let rule = compile("rule{{type:int64}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Integer);
        assert!(!rule.is_quoted());

        let rule = compile("rule{{type:unixtime}}").unwrap();
        assert_eq!(rule.kind, ValueKind::UnixTime);
    }

    #[test]
    fn test_default_kind_is_text() {
        let rule = compile("rule{{choose_one:[a,b,c]}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Text);
        assert_eq!(
            rule.choices,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_slice_requires_prior_type() {
        assert_eq!(
            compile("rule{{type:slice;type:int64}}"),
            Err(RuleError::SliceWithoutType)
        );
        assert_eq!(
            compile("rule{{slice:true;type:string}}"),
            Err(RuleError::SliceWithoutType)
        );

        let rule = compile("rule{{type:string;type:slice}}").unwrap();
        assert!(rule.is_array);
        assert!(!rule.is_quoted());

        let rule = compile("rule{{type:int64;slice:true;num_el_ran:2..4}}").unwrap();
        assert!(rule.is_array);
        assert_eq!(rule.length_range, Some(Bounds { min: 2, max: 4 }));
    }

    #[test]
    fn test_ran_clause() {
        let rule = compile("rule{{type:int64;ran:5..10}}").unwrap();
        assert_eq!(rule.value_range, Some(Bounds { min: 5, max: 10 }));

        let rule = compile("rule{{type:int64;ran:-10..-2}}").unwrap();
        assert_eq!(rule.value_range, Some(Bounds { min: -10, max: -2 }));
    }

    #[test]
    fn test_malformed_ranges() {
        assert_eq!(
            compile("rule{{ran:5}}"),
            Err(RuleError::RangeNeedsTwoBounds("5".to_string()))
        );
        assert_eq!(
            compile("rule{{type:int64;ran:a..5}}"),
            Err(RuleError::NotANumber {
                clause: "ran",
                value: "a".to_string()
            })
        );
        assert!(matches!(
            compile("rule{{type:int64;num_el_ran:1..x}}"),
            Err(RuleError::NotANumber { clause: "num_el_ran", .. })
        ));
        assert_eq!(
            compile("rule{{type:int64;ran:7..7}}"),
            Err(RuleError::EmptyRange { min: 7, max: 7 })
        );
        assert_eq!(
            compile("rule{{type:int64;type:slice;num_el_ran:-1..3}}"),
            Err(RuleError::NegativeLength(-1))
        );
    }

    #[test]
    fn test_array_length_upper_limit() {
        let rule = compile("rule{{type:int64;slice:true;num_el_ran:0..1000000}}").unwrap();
        assert_eq!(
            rule.length_range,
            Some(Bounds {
                min: 0,
                max: MAX_ARRAY_LENGTH
            })
        );

        assert_eq!(
            compile("rule{{type:int64;slice:true;num_el_ran:2305843009213693952..2305843009213693953}}"),
            Err(RuleError::LengthTooLarge {
                max: 2305843009213693953,
                limit: MAX_ARRAY_LENGTH
            })
        );
        assert!(matches!(
            compile("rule{{type:string;slice:true;num_el_ran:0..1000001}}"),
            Err(RuleError::LengthTooLarge { .. })
        ));
    }

    #[test]
    fn test_choice_errors() {
        assert_eq!(compile("rule{{choose_one:[]}}"), Err(RuleError::EmptyChoiceSet));
        assert_eq!(compile("rule{{choose_one:[ , ]}}"), Err(RuleError::EmptyChoiceSet));
        assert_eq!(
            compile("rule{{type:int64;choose_one:[1,two,3]}}"),
            Err(RuleError::ChoiceNotInteger("two".to_string()))
        );
        // the type clause may come after choose_one
        assert_eq!(
            compile("rule{{choose_one:[1,x];type:int64}}"),
            Err(RuleError::ChoiceNotInteger("x".to_string()))
        );
    }

    #[test]
    fn test_clause_without_value() {
        assert_eq!(
            compile("rule{{type}}"),
            Err(RuleError::EndOfClause("type".to_string()))
        );
        assert_eq!(
            compile("rule{{type:int64;num_el_sync:}}"),
            Err(RuleError::EndOfClause("num_el_sync".to_string()))
        );
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let rule = compile("rule{{format:hex;type:int64;whatever;ran:1..2}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Integer);
        assert_eq!(rule.value_range, Some(Bounds { min: 1, max: 2 }));
    }

    #[test]
    fn test_unknown_type_name_is_ignored() {
        let rule = compile("rule{{type:int64;type:float}}").unwrap();
        assert_eq!(rule.kind, ValueKind::Integer);
    }

    #[test]
    fn test_annotations() {
        let rule = compile("rule{{type:unixtime;unixtime_ref:1700000000;retention:30}}").unwrap();
        assert_eq!(rule.time_reference, TimeReference::Fixed(1_700_000_000));
        assert_eq!(rule.retention, 30);

        let rule = compile("rule{{type:unixtime;unixtime_ref:soon;retention:forever}}").unwrap();
        assert_eq!(rule.time_reference, TimeReference::Now);
        assert_eq!(rule.retention, 1);
    }

    #[test]
    fn test_sync_and_whitespace() {
        let rule = compile("rule{{ type:int64 ; slice : true ; num_el_sync: items ; }}").unwrap();
        assert!(rule.is_array);
        assert_eq!(rule.sync_with.as_deref(), Some("items"));
        assert_eq!(rule.raw, "rule{{ type:int64 ; slice : true ; num_el_sync: items ; }}");
    }
}
