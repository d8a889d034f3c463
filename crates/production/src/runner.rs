//! Single-consumer actor driving the delivery tracker.
//!
//! All node events and all timer fires travel through one unbounded channel
//! and are handled one at a time by [`DeliveryRunner::run`]. The tracker
//! therefore never sees concurrent calls and needs no locks.
//!
//! ```text
//! DeliveryHandle ──┐
//!                  ├──► mpsc<Event> ──► DeliveryRunner ──► mpsc<Notification>
//! TimerHandle ─────┘                        │
//!     ▲                                     │ DeliveryTracker<TokioScheduler>
//!     └──────── schedule_once ◄─────────────┘
//! ```

use crate::scheduler::TokioScheduler;
use modsync_core::{Event, ModifierStore, Notification, RequestId};
use modsync_delivery::{DeliveryConfig, DeliveryError, DeliveryInfo, DeliveryTracker};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Store handle the runner can move across tasks.
pub type SharedStore = Arc<dyn ModifierStore + Send + Sync>;

/// Errors returned by [`DeliveryHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// The runner task has exited.
    #[error("Delivery runner stopped")]
    Stopped,
}

/// Cloneable sender side used by the rest of the node.
#[derive(Debug, Clone)]
pub struct DeliveryHandle {
    events: mpsc::UnboundedSender<Event>,
    next_request_id: Arc<AtomicU64>,
}

impl DeliveryHandle {
    fn send(&self, event: Event) -> Result<(), RunnerError> {
        self.events.send(event).map_err(|_| RunnerError::Stopped)
    }

    /// Ask `peer` for `ids`.
    pub fn request(
        &self,
        peer: Option<PeerId>,
        type_id: ModifierTypeId,
        ids: Vec<ModifierId>,
    ) -> Result<(), RunnerError> {
        self.send(Event::RequestModifiers { peer, type_id, ids })
    }

    /// Report that `id` arrived.
    pub fn received(&self, id: ModifierId, from: Option<PeerId>) -> Result<(), RunnerError> {
        self.send(Event::ModifierReceived { id, from })
    }

    /// Report that `id` was written to a store.
    pub fn applied(&self, id: ModifierId) -> Result<(), RunnerError> {
        self.send(Event::ModifierApplied { id })
    }

    /// Report that `id` failed validation.
    pub fn invalid(&self, id: ModifierId) -> Result<(), RunnerError> {
        self.send(Event::ModifierInvalid { id })
    }

    /// Drop transient tracking for `id`.
    pub fn stop_processing(&self, id: ModifierId) -> Result<(), RunnerError> {
        self.send(Event::StopProcessing { id })
    }

    /// Ask for the status of `id`. The answer arrives as
    /// [`Notification::Status`] carrying the returned id.
    pub fn query_status(&self, id: ModifierId) -> Result<RequestId, RunnerError> {
        let request_id = RequestId(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        self.send(Event::QueryStatus { id, request_id })?;
        Ok(request_id)
    }
}

/// Owns the tracker and feeds it events in arrival order.
pub struct DeliveryRunner {
    tracker: DeliveryTracker<TokioScheduler>,
    stores: Vec<SharedStore>,
    events: mpsc::UnboundedReceiver<Event>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl DeliveryRunner {
    /// Build a runner, the handle to feed it, and the notification stream.
    ///
    /// `stores` are consulted when answering status queries.
    pub fn new(
        config: DeliveryConfig,
        stores: Vec<SharedStore>,
    ) -> (Self, DeliveryHandle, mpsc::UnboundedReceiver<Notification>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();

        let tracker = DeliveryTracker::new(config, TokioScheduler::new(&event_tx));
        let runner = Self {
            tracker,
            stores,
            events: event_rx,
            notifications: notification_tx,
        };
        let handle = DeliveryHandle {
            events: event_tx,
            next_request_id: Arc::new(AtomicU64::new(0)),
        };

        (runner, handle, notification_rx)
    }

    /// Occupancy snapshot of the tracker.
    pub fn info(&self) -> DeliveryInfo {
        self.tracker.info()
    }

    /// Process events until every [`DeliveryHandle`] is dropped.
    ///
    /// Returns the final occupancy. Timers still armed at that point are
    /// abandoned.
    pub async fn run(mut self) -> DeliveryInfo {
        info!(config = ?self.tracker.config(), "Delivery runner started");

        while let Some(event) = self.events.recv().await {
            self.handle(event);
        }

        let info = self.tracker.info();
        info!(%info, "Delivery runner stopped");
        info
    }

    /// Apply one event to the tracker.
    pub fn handle(&mut self, event: Event) {
        debug!(event = event.type_name(), "Handling delivery event");

        match event {
            Event::RequestModifiers { peer, type_id, ids } => {
                // Per-id rejections are logged by the tracker
                self.tracker.request(peer, type_id, ids);
            }
            Event::ModifierReceived { id, from } => {
                let result = self.tracker.receive_from(id, from);
                self.log_failure("receive", result);
            }
            Event::ModifierApplied { id } => {
                let result = self.tracker.apply(id);
                self.log_failure("apply", result);
            }
            Event::ModifierInvalid { id } => {
                let result = self.tracker.invalid(id);
                self.log_failure("invalid", result);
            }
            Event::StopProcessing { id } => {
                let result = self.tracker.stop_processing(id);
                self.log_failure("stop_processing", result);
            }
            Event::DeliveryCheck(check) => match self.tracker.on_delivery_check(check) {
                Ok(_) => {}
                Err(DeliveryError::RetriesExhausted { id, checks }) => {
                    self.notify(Notification::DeliveryFailed {
                        id,
                        type_id: check.type_id,
                        peer: check.peer,
                        checks,
                    });
                }
                Err(e) => {
                    error!(id = %check.id, error = %e, "Delivery check failed");
                }
            },
            Event::QueryStatus { id, request_id } => {
                let stores: Vec<&dyn ModifierStore> = self
                    .stores
                    .iter()
                    .map(|store| store.as_ref() as &dyn ModifierStore)
                    .collect();
                let status = self.tracker.status(&id, &stores);
                self.notify(Notification::Status {
                    request_id,
                    id,
                    status,
                });
            }
        }
    }

    fn log_failure(&self, operation: &'static str, result: Result<(), DeliveryError>) {
        match result {
            Ok(()) => {}
            Err(e) if e.is_invariant_violation() => {
                warn!(operation, error = %e, "Rejected delivery event");
            }
            Err(e) => {
                error!(operation, error = %e, "Delivery event failed");
            }
        }
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}
