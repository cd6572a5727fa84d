//! Per-cycle generated values.

use std::borrow::Cow;
use std::collections::HashMap;

/// A value generated for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedValue {
    Text(String),
    Integer(i64),
    TextArray(Vec<String>),
    IntegerArray(Vec<i64>),
}

impl GeneratedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Number of elements for array values.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Self::TextArray(items) => Some(items.len()),
            Self::IntegerArray(items) => Some(items.len()),
            Self::Text(_) | Self::Integer(_) => None,
        }
    }

    /// JSON literal for array values: `["a","b"]` or `[1,2]`.
    pub fn array_literal(&self) -> Option<String> {
        let elements: Vec<String> = match self {
            Self::TextArray(items) => items.iter().map(|s| quote(s)).collect(),
            Self::IntegerArray(items) => items.iter().map(i64::to_string).collect(),
            Self::Text(_) | Self::Integer(_) => return None,
        };
        Some(format!("[{}]", elements.join(",")))
    }
}

pub(crate) fn quote(text: &str) -> String {
    // Serializing a str cannot fail
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

/// A generated value plus what a synchronized field needs to mirror it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedField {
    pub value: GeneratedValue,
    /// Pre-built JSON literal for array values
    pub array_literal: Option<String>,
    /// Drawn array length
    pub length: Option<usize>,
    /// Drawn integer before any time offset
    pub draw: Option<i64>,
    /// Chosen option index
    pub choice_index: Option<usize>,
}

impl GeneratedField {
    /// A field with no synchronization metadata.
    pub fn plain(value: GeneratedValue) -> Self {
        Self {
            value,
            array_literal: None,
            length: None,
            draw: None,
            choice_index: None,
        }
    }

    /// An array field; the literal and length are derived from the value.
    pub fn array(value: GeneratedValue) -> Self {
        Self {
            array_literal: value.array_literal(),
            length: value.array_len(),
            ..Self::plain(value)
        }
    }

    pub fn with_draw(mut self, draw: i64) -> Self {
        self.draw = Some(draw);
        self
    }

    pub fn with_choice_index(mut self, index: usize) -> Self {
        self.choice_index = Some(index);
        self
    }

    /// Text substituted for an unquoted placeholder.
    pub fn bare_text(&self) -> Cow<'_, str> {
        if let Some(literal) = &self.array_literal {
            return Cow::Borrowed(literal);
        }
        match &self.value {
            GeneratedValue::Text(s) => Cow::Borrowed(s),
            GeneratedValue::Integer(i) => Cow::Owned(i.to_string()),
            array => Cow::Owned(array.array_literal().unwrap_or_default()),
        }
    }

    /// Text substituted for a quoted placeholder: a JSON string literal.
    pub fn quoted_text(&self) -> String {
        quote(&self.bare_text())
    }
}

/// The values generated for one template in one cycle, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    fields: HashMap<String, GeneratedField>,
}

impl GenerationResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedField> {
        self.fields.get(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, field: GeneratedField) {
        self.fields.insert(path.into(), field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratedField)> {
        self.fields.iter().map(|(path, field)| (path.as_str(), field))
    }
}
