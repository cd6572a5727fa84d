//! Enumerated choice generator.

use crate::values::GeneratedValue;
use rand::Rng;
use seeder_core::ValueKind;

/// Pick a uniformly random index into a list of `len` options.
///
/// `len` must be non-zero; rule compilation rejects empty choice sets.
pub fn choose_index<R: Rng>(rng: &mut R, len: usize) -> usize {
    rng.gen_range(0..len)
}

/// Resolve an option's literal text to a value of the rule's kind.
pub fn option_value(option: &str, kind: ValueKind) -> GeneratedValue {
    if kind.is_integer() {
        // Integer options are validated at compile time
        if let Ok(value) = option.parse::<i64>() {
            return GeneratedValue::Integer(value);
        }
    }
    GeneratedValue::Text(option.to_string())
}
