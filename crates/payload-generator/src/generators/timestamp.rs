//! Time-marker value generators.

use chrono::Utc;
use seeder_core::TimeReference;

/// Current wall-clock time in unix epoch seconds.
///
/// This is NOT deterministic; generators read it once per cycle.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// Offset the cycle's wall-clock time by a drawn number of seconds.
pub fn offset_from_now(now: i64, offset: i64) -> i64 {
    now.saturating_add(offset)
}

/// Resolve a rule's time reference for a cycle running at `now`.
pub fn resolve_reference(reference: TimeReference, now: i64) -> i64 {
    match reference {
        TimeReference::Now => now,
        TimeReference::Fixed(epoch) => epoch,
    }
}
