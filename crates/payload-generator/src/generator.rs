//! Main payload generator.

use crate::generators::{generate_field, timestamp};
use crate::render::{render, RenderError};
use crate::values::GenerationResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seeder_core::{CompiledTemplate, RuleTable};
use tracing::trace;

/// Generates payloads from compiled templates.
///
/// The random source is injected at construction; with a seeded source the
/// sequence of payloads is reproducible (apart from `unixtime` fields, which
/// follow the wall clock).
pub struct PayloadGenerator<R = StdRng> {
    rng: R,
}

impl PayloadGenerator<StdRng> {
    /// Create a generator with a seeded RNG.
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> PayloadGenerator<R> {
    /// Create a generator around any random source.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate one value for every rule in the table.
    pub fn generate(&mut self, table: &RuleTable) -> GenerationResult {
        self.generate_at(table, timestamp::now_epoch())
    }

    /// Generate one value for every rule, with the cycle's clock fixed at
    /// epoch second `now`.
    pub fn generate_at(&mut self, table: &RuleTable, now: i64) -> GenerationResult {
        let mut result = GenerationResult::with_capacity(table.len());

        for rule in table.iter_evaluation_order() {
            let source = rule
                .sync_with
                .as_deref()
                .and_then(|path| result.get(path));
            let field = generate_field(rule, &mut self.rng, now, source);
            trace!("Generated '{}': {:?}", rule.path, field.value);
            result.insert(rule.path.clone(), field);
        }

        result
    }

    /// Run one generation cycle: generate values and render the payload.
    pub fn next_payload(&mut self, template: &CompiledTemplate) -> Result<Vec<u8>, RenderError> {
        let result = self.generate(template.rules());
        render(template.placeholder(), &result)
    }

    /// Lazily run `count` generation cycles against one template.
    pub fn payloads<'a>(
        &'a mut self,
        template: &'a CompiledTemplate,
        count: u64,
    ) -> PayloadIterator<'a, R> {
        PayloadIterator {
            generator: self,
            template,
            remaining: count,
        }
    }
}

/// Iterator that lazily renders payloads.
pub struct PayloadIterator<'a, R> {
    generator: &'a mut PayloadGenerator<R>,
    template: &'a CompiledTemplate,
    remaining: u64,
}

impl<R: Rng> Iterator for PayloadIterator<'_, R> {
    type Item = Result<Vec<u8>, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_payload(self.template))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for PayloadIterator<'_, R> {}
