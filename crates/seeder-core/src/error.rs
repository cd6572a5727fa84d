//! Error types for rule compilation and template loading.

use thiserror::Error;

/// A malformed rule string.
///
/// Any of these aborts compilation of the whole template the rule belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A recognized clause key with no `:value` part
    #[error("end of parser: clause '{0}' has no value")]
    EndOfClause(String),

    /// `type:slice` or `slice:true` before any concrete type
    #[error("slice with no precedence type")]
    SliceWithoutType,

    /// `choose_one` with no options
    #[error("range options must not be an empty set")]
    EmptyChoiceSet,

    /// A range clause without the `..` separator
    #[error("range of random must specify lowest and highest, got '{0}'")]
    RangeNeedsTwoBounds(String),

    /// A range bound that is not an integer
    #[error("{clause} bound must be integer number, got '{value}'")]
    NotANumber { clause: &'static str, value: String },

    /// `min >= max`, so the half-open range holds no value
    #[error("range {min}..{max} is empty")]
    EmptyRange { min: i64, max: i64 },

    /// An array length bound below zero
    #[error("number of elements must not be negative, got {0}")]
    NegativeLength(i64),

    /// An array length bound above the supported maximum
    #[error("number of elements must be at most {limit}, got {max}")]
    LengthTooLarge { max: i64, limit: i64 },

    /// An integer-typed `choose_one` option that does not parse
    #[error("choose_one option '{0}' is not an integer")]
    ChoiceNotInteger(String),

    /// `num_el_sync` names a field that carries no rule
    #[error("sync target '{0}' is not a rule field")]
    UnknownSyncTarget(String),

    /// `num_el_sync` references that loop back to this field
    #[error("cyclic synchronization through '{0}'")]
    CyclicSync(String),

    /// Two rule strings resolved to the same field path
    #[error("duplicate field path")]
    DuplicatePath,

    /// The quoted rule string could not be located in the template text
    #[error("rule literal not found in template text")]
    LiteralNotFound,
}

/// Error type for loading and compiling a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Error reading the seed file
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid JSON
    #[error("Failed to parse template JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule string failed to compile
    #[error("Rule error at field '{path}': {source}")]
    Rule {
        path: String,
        #[source]
        source: RuleError,
    },
}

impl TemplateError {
    pub(crate) fn rule(path: impl Into<String>, source: RuleError) -> Self {
        Self::Rule {
            path: path.into(),
            source,
        }
    }

    /// The grammar error behind this failure, if any.
    pub fn rule_error(&self) -> Option<&RuleError> {
        match self {
            Self::Rule { source, .. } => Some(source),
            _ => None,
        }
    }
}
