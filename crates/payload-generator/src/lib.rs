//! Payload generator for ws-seeder.
//!
//! This crate provides the [`PayloadGenerator`], which evaluates a compiled
//! rule table once per generation cycle and renders the result into the
//! template's placeholder text. The random source is injected, so a seeded
//! generator replays the same payload sequence.
//!
//! # Architecture
//!
//! ```text
//! CompiledTemplate (seeder-core)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │  PayloadGenerator    │
//! │                      │
//! │  - rng (StdRng)      │
//! │  generate(RuleTable) │──▶ GenerationResult
//! └──────────────────────┘          │
//!                                   ▼
//!                       render(PlaceholderTemplate)
//!                                   │
//!                                   ▼
//!                          payload bytes (valid JSON)
//! ```
//!
//! # Example
//!
//! ```rust
//! use payload_generator::PayloadGenerator;
//! use seeder_core::{CompiledTemplate, Template};
//!
//! let template = Template::from_slice(
//!     "inline",
//!     br#"{"n":"rule{{type:int64;ran:5..10}}"}"#,
//! ).unwrap();
//! let compiled = CompiledTemplate::compile(&template).unwrap();
//!
//! let mut generator = PayloadGenerator::new(42);
//! let payload = generator.next_payload(&compiled).unwrap();
//! let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
//! assert!((5..10).contains(&value["n"].as_i64().unwrap()));
//! ```

pub mod generator;
pub mod generators;
pub mod render;
pub mod values;

// Re-exports for convenience
pub use generator::{PayloadGenerator, PayloadIterator};
pub use render::{render, RenderError};
pub use values::{GeneratedField, GeneratedValue, GenerationResult};
