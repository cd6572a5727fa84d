//! Individual value generators for each rule policy.
//!
//! [`generate_field`] picks the first policy that applies to a rule:
//!
//! 1. array (`slice`), optionally with a bounded length (`num_el_ran`)
//! 2. integer with a bounded range (`ran`)
//! 3. enumerated choice (`choose_one`)
//! 4. UUID
//! 5. the kind's filler value
//!
//! A rule with `num_el_sync` mirrors its source field's length, draw or
//! choice index when the source recorded one.

pub mod array;
pub mod choice;
pub mod numeric;
pub mod timestamp;
pub mod uuid;

use crate::values::{GeneratedField, GeneratedValue};
use rand::Rng;
use seeder_core::{Rule, ValueKind, INTEGER_FILLER, TEXT_FILLER};

/// Generate one field for a cycle running at epoch second `now`.
///
/// `source` is the already generated field named by the rule's
/// `num_el_sync`, if any.
pub fn generate_field<R: Rng>(
    rule: &Rule,
    rng: &mut R,
    now: i64,
    source: Option<&GeneratedField>,
) -> GeneratedField {
    if rule.is_array {
        let length = match (source.and_then(|s| s.length), rule.length_range) {
            (Some(length), _) => length,
            (None, Some(bounds)) => array::generate_length(rng, bounds),
            (None, None) => 1,
        };
        return GeneratedField::array(array::generate_filler_array(rule.kind, length));
    }

    if let Some(bounds) = rule.value_range.filter(|_| rule.kind.is_integer()) {
        let draw = source
            .and_then(|s| s.draw)
            .unwrap_or_else(|| numeric::generate_in_bounds(rng, bounds));
        let value = match rule.kind {
            ValueKind::UnixTime => timestamp::offset_from_now(now, draw),
            _ => draw,
        };
        return GeneratedField::plain(GeneratedValue::Integer(value)).with_draw(draw);
    }

    if let Some(options) = rule.choices.as_deref() {
        let index = source
            .and_then(|s| s.choice_index)
            .filter(|&i| i < options.len())
            .unwrap_or_else(|| choice::choose_index(rng, options.len()));
        let value = choice::option_value(&options[index], rule.kind);
        return GeneratedField::plain(value).with_choice_index(index);
    }

    let value = match rule.kind {
        ValueKind::Uuid => GeneratedValue::Text(uuid::generate_uuid_v4(rng).to_string()),
        ValueKind::Text => GeneratedValue::Text(TEXT_FILLER.to_string()),
        ValueKind::Integer => GeneratedValue::Integer(INTEGER_FILLER),
        ValueKind::UnixTime => {
            GeneratedValue::Integer(timestamp::resolve_reference(rule.time_reference, now))
        }
    };
    GeneratedField::plain(value)
}
