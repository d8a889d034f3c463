//! Collaborator traits consumed by the delivery tracker.

use crate::DeliveryCheck;
use modsync_types::ModifierId;
use std::time::Duration;

/// Arms and cancels single-shot delivery timers.
///
/// The tracker never sleeps or spawns anything itself. It hands a
/// [`DeliveryCheck`] to the scheduler, keeps the returned handle inside the
/// request ledger, and gives the handle back through [`Scheduler::cancel`]
/// when the request is resolved.
///
/// # Guarantees
///
/// - **Non-blocking**: `schedule_once` and `cancel` return immediately
/// - **Single delivery**: a timer fires at most once
/// - **Best-effort cancel**: a timer cancelled after it already queued its
///   check may still deliver it; the tracker drops such checks by nonce
///
/// # Example
///
/// ```ignore
/// let handle = scheduler.schedule_once(config.delivery_timeout, check)?;
/// // ... modifier arrives ...
/// scheduler.cancel(handle);
/// ```
pub trait Scheduler {
    /// Token identifying one armed timer.
    type Handle;

    /// Deliver `check` back to the tracker's event stream after `delay`.
    fn schedule_once(
        &mut self,
        delay: Duration,
        check: DeliveryCheck,
    ) -> Result<Self::Handle, SchedulerError>;

    /// Disarm a timer. Consumes the handle so it cannot be cancelled twice.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Read-only view of a durable modifier store (history, mempool, ...).
pub trait ModifierStore {
    /// Whether the store already holds the modifier.
    fn contains(&self, id: &ModifierId) -> bool;
}

impl<T: ModifierStore + ?Sized> ModifierStore for &T {
    fn contains(&self, id: &ModifierId) -> bool {
        (**self).contains(id)
    }
}

impl<T: ModifierStore + ?Sized> ModifierStore for std::sync::Arc<T> {
    fn contains(&self, id: &ModifierId) -> bool {
        (**self).contains(id)
    }
}

/// Failures reported by a [`Scheduler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// No executor is available to run the timer on.
    #[error("No timer runtime available: {0}")]
    NoRuntime(String),

    /// The event stream the timer would deliver into is closed.
    #[error("Delivery event channel closed")]
    ChannelClosed,
}
