//! Production runtime for the modifier delivery tracker.
//!
//! [`DeliveryRunner`] owns a [`DeliveryTracker`](modsync_delivery::DeliveryTracker)
//! driven by [`TokioScheduler`] timers. The rest of the node talks to it
//! through a cloneable [`DeliveryHandle`] and listens for
//! [`Notification`](modsync_core::Notification)s on the returned receiver.
//!
//! ```ignore
//! let (runner, handle, mut notifications) = DeliveryRunner::new(config, stores);
//! tokio::spawn(runner.run());
//!
//! handle.request(Some(peer), ModifierTypeId::HEADER, ids)?;
//! while let Some(notification) = notifications.recv().await {
//!     // re-request elsewhere, penalize peer, ...
//! }
//! ```

mod runner;
mod scheduler;
mod telemetry;

pub use runner::{DeliveryHandle, DeliveryRunner, RunnerError, SharedStore};
pub use scheduler::{TimerHandle, TokioScheduler};
pub use telemetry::{init_tracing, DEFAULT_FILTER};
