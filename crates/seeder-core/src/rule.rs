//! Compiled rule definitions and the per-template rule table.

use crate::error::{RuleError, TemplateError};
use std::collections::HashMap;
use std::fmt;

/// Separator joining nested keys into a field path.
pub const PATH_SEPARATOR: &str = "__";

/// Field path used when the document root itself is a rule string.
pub const ROOT_PATH: &str = "root";

/// Filler emitted for text values that no variant policy covers.
pub const TEXT_FILLER: &str = "abcdefg";

/// Filler emitted for integer values that no variant policy covers.
pub const INTEGER_FILLER: i64 = 0;

/// Largest exclusive upper bound accepted by `num_el_ran`.
pub const MAX_ARRAY_LENGTH: i64 = 1_000_000;

/// Join a parent path and a local key into a field path.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{key}")
    }
}

/// The kind of value a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Plain text
    Text,
    /// Text carrying a random v4 UUID
    Uuid,
    /// 64-bit signed integer
    Integer,
    /// Integer carrying a unix epoch second
    UnixTime,
}

impl ValueKind {
    /// Map a `type:` clause value to a kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::Text),
            "uuid" => Some(Self::Uuid),
            "int64" => Some(Self::Integer),
            "unixtime" => Some(Self::UnixTime),
            _ => None,
        }
    }

    /// Whether values of this kind are JSON strings.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::Uuid)
    }

    /// Whether values of this kind are JSON integers.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::UnixTime)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "string",
            Self::Uuid => "uuid",
            Self::Integer => "int64",
            Self::UnixTime => "unixtime",
        };
        f.write_str(name)
    }
}

/// Half-open integer range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    /// Create a range, rejecting ranges that hold no value.
    pub fn new(min: i64, max: i64) -> Result<Self, RuleError> {
        if min >= max {
            return Err(RuleError::EmptyRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..self.max).contains(&value)
    }
}

/// Reference point for time-marker values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeReference {
    /// Wall-clock time of the generation cycle
    #[default]
    Now,
    /// A fixed epoch second
    Fixed(i64),
}

/// Compiled description of how to generate one field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Unique field path within the template
    pub path: String,
    /// Path of the enclosing container (empty at top level)
    pub parent: String,
    /// The rule string as written in the template
    pub raw: String,
    pub kind: ValueKind,
    pub is_array: bool,
    /// `ran`: bounded random integer
    pub value_range: Option<Bounds>,
    /// `num_el_ran`: bounded random array length
    pub length_range: Option<Bounds>,
    /// `choose_one`: enumerated options, never empty
    pub choices: Option<Vec<String>>,
    /// `num_el_sync`: field path whose draw this field mirrors
    pub sync_with: Option<String>,
    pub time_reference: TimeReference,
    /// Carried for downstream consumers; generation ignores it
    pub retention: i64,
}

impl Rule {
    /// Whether the placeholder for this rule is rendered as a JSON string.
    pub fn is_quoted(&self) -> bool {
        self.kind.is_text() && !self.is_array
    }
}

/// All rules of one template, keyed by field path.
///
/// Rules are stored in document order. The evaluation order puts every
/// synchronization source before the fields that mirror it.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
    order: Vec<usize>,
}

impl RuleTable {
    /// Build a table from rules in document order.
    ///
    /// Resolves `num_el_sync` targets (sibling first, then absolute path) and
    /// computes the evaluation order, rejecting unknown targets and cycles.
    pub fn from_rules(mut rules: Vec<Rule>) -> Result<Self, TemplateError> {
        let mut index = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.path.clone(), i).is_some() {
                return Err(TemplateError::rule(&rule.path, RuleError::DuplicatePath));
            }
        }

        let mut sources: Vec<Option<usize>> = Vec::with_capacity(rules.len());
        for rule in &mut rules {
            let Some(target) = rule.sync_with.as_deref() else {
                sources.push(None);
                continue;
            };
            let sibling = join_path(&rule.parent, target);
            let resolved = [sibling.as_str(), target]
                .into_iter()
                .find(|candidate| index.contains_key(*candidate))
                .map(str::to_string);
            match resolved {
                Some(path) => {
                    sources.push(index.get(&path).copied());
                    rule.sync_with = Some(path);
                }
                None => {
                    return Err(TemplateError::rule(
                        &rule.path,
                        RuleError::UnknownSyncTarget(target.to_string()),
                    ))
                }
            }
        }

        let order = evaluation_order(&rules, &sources)?;
        Ok(Self {
            rules,
            index,
            order,
        })
    }

    pub fn get(&self, path: &str) -> Option<&Rule> {
        self.index.get(path).map(|&i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in document order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules in evaluation order: sync sources before their dependents.
    pub fn iter_evaluation_order(&self) -> impl Iterator<Item = &Rule> {
        self.order.iter().map(move |&i| &self.rules[i])
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// Depth-first topological order over the sync edges.
///
/// Each rule has at most one source, so the walk follows a chain.
fn evaluation_order(rules: &[Rule], sources: &[Option<usize>]) -> Result<Vec<usize>, TemplateError> {
    let mut state = vec![Visit::Pending; rules.len()];
    let mut order = Vec::with_capacity(rules.len());

    for start in 0..rules.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                Visit::Done => break,
                Visit::InProgress => {
                    return Err(TemplateError::rule(
                        &rules[i].path,
                        RuleError::CyclicSync(rules[i].path.clone()),
                    ))
                }
                Visit::Pending => {
                    state[i] = Visit::InProgress;
                    chain.push(i);
                    current = sources[i];
                }
            }
        }
        for i in chain.into_iter().rev() {
            state[i] = Visit::Done;
            order.push(i);
        }
    }

    Ok(order)
}
