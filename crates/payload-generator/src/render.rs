//! Template renderer: substitutes generated values into a placeholder template.

use crate::values::GenerationResult;
use seeder_core::{PlaceholderTemplate, Segment};
use serde::de::IgnoredAny;

/// Error type for rendering a payload.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A placeholder with no generated value
    #[error("No generated value for placeholder '{0}'")]
    MissingField(String),

    /// The substituted payload is not well-formed JSON
    #[error("Rendered payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Render one payload.
///
/// The result is parsed once to confirm it is well-formed JSON; the bytes are
/// returned, not the parsed document.
pub fn render(
    template: &PlaceholderTemplate,
    result: &GenerationResult,
) -> Result<Vec<u8>, RenderError> {
    let mut out = String::new();
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder { path, quoted } => {
                let field = result
                    .get(path)
                    .ok_or_else(|| RenderError::MissingField(path.clone()))?;
                if *quoted {
                    out.push_str(&field.quoted_text());
                } else {
                    out.push_str(&field.bare_text());
                }
            }
        }
    }

    let bytes = out.into_bytes();
    serde_json::from_slice::<IgnoredAny>(&bytes).map_err(RenderError::InvalidJson)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{GeneratedField, GeneratedValue};
    use seeder_core::{CompiledTemplate, Template};

    fn compile(text: &str) -> CompiledTemplate {
        let template = Template::from_slice("test", text.as_bytes()).unwrap();
        CompiledTemplate::compile(&template).unwrap()
    }

    #[test]
    fn test_render_scalars_and_arrays() {
        let compiled = compile(
            r#"{"id": "rule{{type:uuid}}", "n": "rule{{type:int64}}", "tags": "rule{{type:string;slice:true}}", "keep": [1, "x"]}"#,
        );
        let mut result = GenerationResult::default();
        result.insert("id", GeneratedField::plain(GeneratedValue::Text("abc".to_string())));
        result.insert("n", GeneratedField::plain(GeneratedValue::Integer(-4)));
        result.insert(
            "tags",
            GeneratedField::array(GeneratedValue::TextArray(vec!["p".to_string(), "q".to_string()])),
        );

        let bytes = render(compiled.placeholder(), &result).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"id": "abc", "n": -4, "tags": ["p","q"], "keep": [1, "x"]}"#
        );
    }

    #[test]
    fn test_quoted_values_are_escaped() {
        let compiled = compile(r#"{"s": "rule{{type:string}}"}"#);
        let mut result = GenerationResult::default();
        result.insert(
            "s",
            GeneratedField::plain(GeneratedValue::Text("a \"quoted\" \\ value".to_string())),
        );

        let bytes = render(compiled.placeholder(), &result).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["s"], "a \"quoted\" \\ value");
    }

    #[test]
    fn test_missing_field() {
        let compiled = compile(r#"{"n": "rule{{type:int64}}"}"#);
        let err = render(compiled.placeholder(), &GenerationResult::default()).unwrap_err();
        assert!(matches!(err, RenderError::MissingField(path) if path == "n"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let compiled = compile(r#"{"n": "rule{{type:int64}}"}"#);
        let mut result = GenerationResult::default();
        result.insert("n", GeneratedField::plain(GeneratedValue::Text("not a number".to_string())));

        let err = render(compiled.placeholder(), &result).unwrap_err();
        assert!(matches!(err, RenderError::InvalidJson(_)));
    }
}
