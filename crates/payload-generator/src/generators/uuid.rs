//! UUID value generator.

use rand::Rng;
use uuid::{Builder, Uuid};

/// Draw a v4 UUID from the injected random source.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen::<[u8; 16]>()).into_uuid()
}
