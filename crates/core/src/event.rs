//! Inputs to the delivery tracker.

use crate::{RequestId, RequestNonce};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};

/// Payload of a fired delivery timer.
///
/// Armed by the tracker for every outstanding request; when the timeout
/// elapses the scheduler hands it back as [`Event::DeliveryCheck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryCheck {
    /// Peer the modifier was requested from, if any.
    pub peer: Option<PeerId>,
    /// Kind of the requested modifier.
    pub type_id: ModifierTypeId,
    /// The requested modifier.
    pub id: ModifierId,
    /// Arming this check belongs to.
    pub nonce: RequestNonce,
}

/// Everything the delivery runner reacts to.
///
/// Network and application layers translate their own happenings into these
/// events; timers come back as [`Event::DeliveryCheck`]. All of them travel
/// through a single queue so the tracker sees a serialized stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Ask `peer` (or nobody in particular) for a batch of modifiers.
    RequestModifiers {
        peer: Option<PeerId>,
        type_id: ModifierTypeId,
        ids: Vec<ModifierId>,
    },

    /// Bytes for a modifier arrived.
    ModifierReceived {
        id: ModifierId,
        from: Option<PeerId>,
    },

    /// The modifier was written to a durable store.
    ModifierApplied { id: ModifierId },

    /// The modifier failed validation and must never be fetched again.
    ModifierInvalid { id: ModifierId },

    /// Drop transient tracking for a modifier (bytes mismatched the id,
    /// receive cache evicted it, ...).
    StopProcessing { id: ModifierId },

    /// A delivery timer fired.
    DeliveryCheck(DeliveryCheck),

    /// Report the current status of a modifier.
    QueryStatus { id: ModifierId, request_id: RequestId },
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::RequestModifiers { .. } => "RequestModifiers",
            Event::ModifierReceived { .. } => "ModifierReceived",
            Event::ModifierApplied { .. } => "ModifierApplied",
            Event::ModifierInvalid { .. } => "ModifierInvalid",
            Event::StopProcessing { .. } => "StopProcessing",
            Event::DeliveryCheck(_) => "DeliveryCheck",
            Event::QueryStatus { .. } => "QueryStatus",
        }
    }

    /// Check if this event was produced by a timer rather than the node.
    pub fn is_timer(&self) -> bool {
        matches!(self, Event::DeliveryCheck(_))
    }
}
