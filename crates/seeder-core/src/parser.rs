//! Rule parser: walks a seed document and compiles its rule strings.

use crate::error::TemplateError;
use crate::grammar::{compile_rule, rule_body};
use crate::rule::{join_path, Rule, RuleTable, ROOT_PATH};
use crate::template::{PlaceholderTemplate, Template};
use serde_json::Value;
use tracing::debug;

/// Compile the rule strings of `document` into a rule table and rewrite
/// `literal_text` into a placeholder template.
pub fn parse(
    document: &Value,
    literal_text: &str,
) -> Result<(RuleTable, PlaceholderTemplate), TemplateError> {
    let mut collector = RuleCollector {
        rules: Vec::new(),
        placeholder: PlaceholderTemplate::new(literal_text),
    };
    collector.walk("", "", document)?;

    let table = RuleTable::from_rules(collector.rules)?;
    Ok((table, collector.placeholder))
}

struct RuleCollector {
    rules: Vec<Rule>,
    placeholder: PlaceholderTemplate,
}

impl RuleCollector {
    fn walk(&mut self, parent: &str, path: &str, value: &Value) -> Result<(), TemplateError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.walk(path, &join_path(path, key), child)?;
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.walk(path, &join_path(path, &i.to_string()), child)?;
                }
            }
            Value::String(text) => {
                let path = if path.is_empty() { ROOT_PATH } else { path };
                self.visit_string(parent, path, text)?;
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }

    fn visit_string(&mut self, parent: &str, path: &str, text: &str) -> Result<(), TemplateError> {
        let Some(body) = rule_body(text) else {
            return Ok(());
        };

        let rule = compile_rule(path.to_string(), parent.to_string(), text, body)
            .map_err(|e| TemplateError::rule(path, e))?;

        self.placeholder
            .substitute(text, path, rule.is_quoted())
            .map_err(|e| TemplateError::rule(path, e))?;

        debug!("Compiled rule for '{}': {:?}", path, rule);
        self.rules.push(rule);
        Ok(())
    }
}

/// A template compiled once and evaluated for every generation cycle.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    name: String,
    rules: RuleTable,
    placeholder: PlaceholderTemplate,
}

impl CompiledTemplate {
    /// Compile the rules embedded in `template`.
    pub fn compile(template: &Template) -> Result<Self, TemplateError> {
        let (rules, placeholder) = parse(template.document(), template.text())?;
        Ok(Self {
            name: template.name().to_string(),
            rules,
            placeholder,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn placeholder(&self) -> &PlaceholderTemplate {
        &self.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rule::{Bounds, ValueKind};

    fn compile(text: &str) -> Result<CompiledTemplate, TemplateError> {
        let template = Template::from_slice("test", text.as_bytes())?;
        CompiledTemplate::compile(&template)
    }

    #[test]
    fn test_literal_strings_untouched() {
        let compiled = compile(r#"{"name": "alice", "age": 3, "ok": true, "none": null}"#).unwrap();
        assert!(compiled.rules().is_empty());
        assert_eq!(
            compiled.placeholder().to_string(),
            r#"{"name": "alice", "age": 3, "ok": true, "none": null}"#
        );
    }

    #[test]
    fn test_uuid_placeholder_is_quoted() {
        let compiled = compile(r#"{"id":"rule{{type:uuid}}"}"#).unwrap();
        let rule = compiled.rules().get("id").unwrap();
        assert_eq!(rule.kind, ValueKind::Uuid);
        assert_eq!(compiled.placeholder().to_string(), r#"{"id":"{{id}}"}"#);
    }

    #[test]
    fn test_integer_and_array_placeholders_are_bare() {
        let compiled = compile(
            r#"{"n":"rule{{type:int64;ran:5..10}}","arr":"rule{{type:string;slice:true;num_el_ran:2..4}}"}"#,
        )
        .unwrap();
        assert_eq!(
            compiled.placeholder().to_string(),
            r#"{"n":{{n}},"arr":{{arr}}}"#
        );
        assert_eq!(
            compiled.rules().get("n").unwrap().value_range,
            Some(Bounds { min: 5, max: 10 })
        );
    }

    #[test]
    fn test_nested_paths() {
        let compiled = compile(
            r#"{
                "user": {
                    "id": "rule{{type:uuid}}",
                    "tags": ["plain", "rule{{choose_one:[x,y]}}"],
                    "profile": {"age": "rule{{type:int64;ran:18..80}}"}
                }
            }"#,
        )
        .unwrap();

        let paths: Vec<&str> = compiled.rules().rules().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["user__id", "user__tags__1", "user__profile__age"]);
        assert_eq!(compiled.rules().get("user__profile__age").unwrap().parent, "user__profile");
        assert_eq!(
            compiled.placeholder().placeholder_paths().collect::<Vec<_>>(),
            paths
        );
        assert!(compiled.placeholder().to_string().contains(r#""tags": ["plain", "{{user__tags__1}}"]"#));
    }

    #[test]
    fn test_identical_rule_strings_map_to_their_own_fields() {
        let compiled =
            compile(r#"{"a":"rule{{type:int64}}","b":{"c":"rule{{type:int64}}"}}"#).unwrap();
        assert_eq!(
            compiled.placeholder().to_string(),
            r#"{"a":{{a}},"b":{"c":{{b__c}}}}"#
        );
    }

    #[test]
    fn test_root_rule_string() {
        let compiled = compile(r#""rule{{type:uuid}}""#).unwrap();
        assert!(compiled.rules().get(ROOT_PATH).is_some());
        assert_eq!(compiled.placeholder().to_string(), r#""{{root}}""#);
    }

    #[test]
    fn test_malformed_range_aborts_template() {
        let err = compile(r#"{"ok":"rule{{type:uuid}}","n":"rule{{ran:5}}"}"#).unwrap_err();
        match err {
            TemplateError::Rule { path, source } => {
                assert_eq!(path, "n");
                assert_eq!(source, RuleError::RangeNeedsTwoBounds("5".to_string()));
            }
            other => panic!("Expected rule error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_clause_still_compiles() {
        let compiled = compile(r#"{"n":"rule{{type:int64;colour:blue;ran:1..3}}"}"#).unwrap();
        let rule = compiled.rules().get("n").unwrap();
        assert_eq!(rule.kind, ValueKind::Integer);
        assert_eq!(rule.value_range, Some(Bounds { min: 1, max: 3 }));
    }

    #[test]
    fn test_sync_target_resolved_against_siblings() {
        let compiled = compile(
            r#"{"order": {
                "items": "rule{{type:int64;slice:true;num_el_sync:prices}}",
                "prices": "rule{{type:int64;slice:true;num_el_ran:1..5}}"
            }}"#,
        )
        .unwrap();
        let items = compiled.rules().get("order__items").unwrap();
        assert_eq!(items.sync_with.as_deref(), Some("order__prices"));

        let order: Vec<&str> = compiled
            .rules()
            .iter_evaluation_order()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(order, vec!["order__prices", "order__items"]);
    }

    #[test]
    fn test_rule_string_with_alternative_escapes() {
        let compiled = compile(
            r#"{"s":"rule{{choose_one:[a\/b,c]}}","t":"rule{{\u0074ype:int64;ran:1..\u0039}}","k":"x"}"#,
        )
        .unwrap();

        let s = compiled.rules().get("s").unwrap();
        assert_eq!(s.choices, Some(vec!["a/b".to_string(), "c".to_string()]));
        let t = compiled.rules().get("t").unwrap();
        assert_eq!(t.kind, ValueKind::Integer);
        assert_eq!(t.value_range, Some(Bounds { min: 1, max: 9 }));
        assert_eq!(
            compiled.placeholder().to_string(),
            r#"{"s":"{{s}}","t":{{t}},"k":"x"}"#
        );
    }

    #[test]
    fn test_rule_string_used_as_key_and_value() {
        let compiled =
            compile(r#"{"rule{{type:uuid}}": {"id": "rule{{type:u\u0075id}}"}}"#).unwrap();
        assert_eq!(
            compiled.placeholder().to_string(),
            r#"{"rule{{type:uuid}}": {"id": "{{rule{{type:uuid}}__id}}"}}"#
        );
    }

    #[test]
    fn test_escaped_rule_string() {
        let compiled = compile(r#"{"s":"rule{{choose_one:[a\"b,c]}}"}"#).unwrap();
        let rule = compiled.rules().get("s").unwrap();
        assert_eq!(
            rule.choices,
            Some(vec!["a\"b".to_string(), "c".to_string()])
        );
        assert_eq!(compiled.placeholder().to_string(), r#"{"s":"{{s}}"}"#);
    }
}
