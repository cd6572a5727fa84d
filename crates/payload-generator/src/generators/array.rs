//! Array value generators.

use crate::values::GeneratedValue;
use rand::Rng;
use seeder_core::{Bounds, ValueKind, INTEGER_FILLER, TEXT_FILLER};

/// Draw an element count uniformly from `[min, max)`.
pub fn generate_length<R: Rng>(rng: &mut R, bounds: Bounds) -> usize {
    // Length bounds are non-negative after compilation
    rng.gen_range(bounds.min..bounds.max).max(0) as usize
}

/// Build an array of `length` filler elements of the given kind.
pub fn generate_filler_array(kind: ValueKind, length: usize) -> GeneratedValue {
    if kind.is_integer() {
        GeneratedValue::IntegerArray(vec![INTEGER_FILLER; length])
    } else {
        GeneratedValue::TextArray(vec![TEXT_FILLER.to_string(); length])
    }
}
