//! Bounded random integer generator.

use rand::Rng;
use seeder_core::Bounds;

/// Draw an integer uniformly from the half-open range `[min, max)`.
pub fn generate_in_bounds<R: Rng>(rng: &mut R, bounds: Bounds) -> i64 {
    rng.gen_range(bounds.min..bounds.max)
}
