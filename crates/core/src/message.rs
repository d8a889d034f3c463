//! Outbound notifications from the delivery runner.

use crate::{ModifierStatus, RequestId};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};

/// Outcomes the rest of the node has to act on.
///
/// The runner only reports; picking another peer or dropping the modifier is
/// up to the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Every delivery check for a modifier elapsed without it arriving.
    /// The modifier is `Unknown` again and may be requested elsewhere.
    DeliveryFailed {
        id: ModifierId,
        type_id: ModifierTypeId,
        peer: Option<PeerId>,
        checks: u32,
    },

    /// Answer to [`Event::QueryStatus`](crate::Event::QueryStatus).
    Status {
        request_id: RequestId,
        id: ModifierId,
        status: ModifierStatus,
    },
}

impl Notification {
    /// Get a human-readable name for this notification type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Notification::DeliveryFailed { .. } => "DeliveryFailed",
            Notification::Status { .. } => "Status",
        }
    }
}
