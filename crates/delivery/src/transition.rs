//! The modifier status transition table.
//!
//! Every mutating tracker call consults [`check_transition`] before touching
//! any state, so a rejected call leaves the tracker exactly as it was.

use crate::DeliveryError;
use modsync_core::ModifierStatus;
use modsync_types::ModifierId;

/// Whether a modifier may move from `from` to `to`.
///
/// ```text
/// any       -> itself      (no-op)
/// any       -> Invalid
/// any       -> Held        (applied to a store)
/// Unknown   -> Requested
/// Requested -> Unknown | Received
/// Received  -> Unknown
/// ```
///
/// Everything else is illegal. In particular `Invalid` only ever moves to
/// itself or to `Held`, which leaves the invalid mark in place, so an invalid
/// modifier can never be requested or received again.
pub fn is_legal_transition(from: ModifierStatus, to: ModifierStatus) -> bool {
    use ModifierStatus::*;

    match (from, to) {
        (a, b) if a == b => true,
        (_, Invalid) | (_, Held) => true,
        (Unknown, Requested) => true,
        (Requested, Unknown) | (Requested, Received) => true,
        (Received, Unknown) => true,
        (Unknown, _) | (Requested, _) | (Received, _) | (Held, _) | (Invalid, _) => false,
    }
}

/// [`is_legal_transition`] as a `Result`, naming the modifier on failure.
pub fn check_transition(
    id: ModifierId,
    from: ModifierStatus,
    to: ModifierStatus,
) -> Result<(), DeliveryError> {
    if is_legal_transition(from, to) {
        Ok(())
    } else {
        Err(DeliveryError::IllegalTransition { id, from, to })
    }
}
