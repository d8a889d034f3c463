//! Error types for delivery tracking.

use modsync_core::{ModifierStatus, SchedulerError};
use modsync_types::ModifierId;
use thiserror::Error;

/// Failure of a single tracker operation on a single modifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The call would move the modifier along an edge the transition table
    /// does not allow. Tracker state is unchanged.
    #[error("Illegal status transition for {id}: {from} -> {to}")]
    IllegalTransition {
        id: ModifierId,
        from: ModifierStatus,
        to: ModifierStatus,
    },

    /// A delivery check arrived for a modifier with no request record.
    #[error("No outstanding request for {id}")]
    MissingRequest { id: ModifierId },

    /// Every allowed delivery check elapsed. The modifier is `Unknown` again
    /// and can be requested from another peer.
    #[error("Gave up on {id} after {checks} delivery checks")]
    RetriesExhausted { id: ModifierId, checks: u32 },

    /// The timer could not be armed.
    #[error("Scheduler failure: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl DeliveryError {
    /// The modifier the failed operation was about, if the error names one.
    pub fn modifier_id(&self) -> Option<ModifierId> {
        match self {
            DeliveryError::IllegalTransition { id, .. }
            | DeliveryError::MissingRequest { id }
            | DeliveryError::RetriesExhausted { id, .. } => Some(*id),
            DeliveryError::Scheduler(_) => None,
        }
    }

    /// Whether the caller's bookkeeping disagrees with the tracker's.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            DeliveryError::IllegalTransition { .. } | DeliveryError::MissingRequest { .. }
        )
    }

    /// Whether this is the expected "pick another peer" outcome.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, DeliveryError::RetriesExhausted { .. })
    }
}

/// Errors loading a [`DeliveryConfig`](crate::DeliveryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML could not be parsed.
    #[error("Failed to parse delivery config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid delivery config: {0}")]
    Invalid(String),
}
