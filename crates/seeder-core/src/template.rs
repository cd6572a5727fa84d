//! Seed templates and their placeholder form.

use crate::error::{RuleError, TemplateError};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// A decoded seed document together with its literal source text.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    document: Value,
    text: String,
}

impl Template {
    /// Decode a template from raw bytes.
    pub fn from_slice(name: impl Into<String>, bytes: &[u8]) -> Result<Self, TemplateError> {
        let document: Value = serde_json::from_slice(bytes)?;
        let text = String::from_utf8_lossy(bytes).trim().to_string();
        Ok(Self {
            name: name.into(),
            document,
            text,
        })
    }

    /// Load a template from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Self::from_slice(path.display().to_string(), &bytes)
    }

    /// Source name, usually the file path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Literal template text (trimmed source).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One piece of a placeholder template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim template text
    Literal(String),
    /// Substitution point for a generated field
    Placeholder {
        path: String,
        /// Render the value as a JSON string
        quoted: bool,
    },
}

/// Template text with rule strings replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    /// A template with no placeholders yet.
    pub fn new(text: &str) -> Self {
        Self {
            segments: vec![Segment::Literal(text.to_string())],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field paths referenced by placeholders, in template order.
    pub fn placeholder_paths(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { path, .. } => Some(path.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Replace the next string literal whose decoded value is `value` with a
    /// placeholder.
    ///
    /// Literals are consumed front to back, so callers must substitute in
    /// document order. A literal followed by `:` is an object key and is
    /// skipped.
    pub(crate) fn substitute(
        &mut self,
        value: &str,
        path: &str,
        quoted: bool,
    ) -> Result<(), RuleError> {
        let Some(Segment::Literal(tail)) = self.segments.last_mut() else {
            return Err(RuleError::LiteralNotFound);
        };
        let (start, end) = find_value_literal(tail, value).ok_or(RuleError::LiteralNotFound)?;

        let after = tail.split_off(end);
        tail.truncate(start);
        if tail.is_empty() {
            self.segments.pop();
        }
        self.segments.push(Segment::Placeholder {
            path: path.to_string(),
            quoted,
        });
        self.segments.push(Segment::Literal(after));
        Ok(())
    }
}

impl fmt::Display for PlaceholderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Placeholder { path, quoted: true } => write!(f, "\"{{{{{path}}}}}\"")?,
                Segment::Placeholder {
                    path,
                    quoted: false,
                } => write!(f, "{{{{{path}}}}}")?,
            }
        }
        Ok(())
    }
}

/// Byte span of the first string token in `text` that is not an object key
/// and decodes to `value`.
///
/// `text` must start outside a string token. Tokens are compared after
/// decoding, so any escape spelling of the same string matches.
fn find_value_literal(text: &str, value: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'"') {
        let start = pos + offset;
        let end = string_token_end(bytes, start)?;
        pos = end;

        if text[end..].trim_start().starts_with(':') {
            continue;
        }
        let token = &text[start..end];
        if serde_json::from_str::<String>(token).is_ok_and(|decoded| decoded == value) {
            return Some((start, end));
        }
    }
    None
}

/// Index just past the closing quote of the string token opening at `start`.
fn string_token_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
