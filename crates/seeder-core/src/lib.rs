//! Core types for ws-seeder.
//!
//! A seed template is an ordinary JSON document whose string leaves may carry
//! generation rules:
//!
//! ```json
//! {
//!   "id": "rule{{type:uuid}}",
//!   "kind": "rule{{choose_one:[buy,sell]}}",
//!   "qty": "rule{{type:int64;ran:1..100}}",
//!   "at": "rule{{type:unixtime;ran:-60..0}}"
//! }
//! ```
//!
//! This crate compiles such a document once into:
//!
//! - [`RuleTable`] - one [`Rule`] per rule-bearing field, keyed by field path
//! - [`PlaceholderTemplate`] - the source text with each rule string replaced
//!   by a placeholder for its field
//!
//! ```text
//! Template (JSON bytes)
//!        │  parse()
//!        ▼
//! CompiledTemplate { RuleTable, PlaceholderTemplate }
//!        │
//!        ▼
//! payload-generator (generate + render, once per cycle)
//! ```
//!
//! # Example
//!
//! ```rust
//! use seeder_core::{CompiledTemplate, Template, ValueKind};
//!
//! let template = Template::from_slice("inline", br#"{"id":"rule{{type:uuid}}"}"#).unwrap();
//! let compiled = CompiledTemplate::compile(&template).unwrap();
//!
//! assert_eq!(compiled.rules().get("id").unwrap().kind, ValueKind::Uuid);
//! assert_eq!(compiled.placeholder().to_string(), r#"{"id":"{{id}}"}"#);
//! ```

pub mod error;
pub mod grammar;
pub mod parser;
pub mod rule;
pub mod template;

// Re-exports for convenience
pub use error::{RuleError, TemplateError};
pub use parser::{parse, CompiledTemplate};
pub use rule::{
    join_path, Bounds, Rule, RuleTable, TimeReference, ValueKind, INTEGER_FILLER, MAX_ARRAY_LENGTH,
    PATH_SEPARATOR, ROOT_PATH, TEXT_FILLER,
};
pub use template::{PlaceholderTemplate, Segment, Template};
