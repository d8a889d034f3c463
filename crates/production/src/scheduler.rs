//! Delivery timers on the tokio runtime.
//!
//! Each armed timer is a spawned task that sleeps for the delivery timeout
//! and then pushes an [`Event::DeliveryCheck`] into the runner's event
//! channel. Cancelling aborts the task. A task aborted while sleeping never
//! sends; a check that was already queued when the abort happened carries an
//! outdated nonce and is dropped by the tracker.
//!
//! Timers only hold weak senders, so they never keep the runner alive once
//! every [`DeliveryHandle`](crate::DeliveryHandle) is gone.

use modsync_core::{DeliveryCheck, Event, Scheduler, SchedulerError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Handle to one spawned delivery timer.
#[derive(Debug)]
pub struct TimerHandle(AbortHandle);

impl TimerHandle {
    /// Whether the timer task has completed (fired or aborted).
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

/// [`Scheduler`] backed by tokio tasks.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: mpsc::WeakUnboundedSender<Event>,
}

impl TokioScheduler {
    /// Create a scheduler delivering checks into `events`.
    pub fn new(events: &mpsc::UnboundedSender<Event>) -> Self {
        Self {
            events: events.downgrade(),
        }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TimerHandle;

    fn schedule_once(
        &mut self,
        delay: Duration,
        check: DeliveryCheck,
    ) -> Result<TimerHandle, SchedulerError> {
        let runtime =
            Handle::try_current().map_err(|e| SchedulerError::NoRuntime(e.to_string()))?;
        match self.events.upgrade() {
            Some(events) if !events.is_closed() => {}
            _ => return Err(SchedulerError::ChannelClosed),
        }

        let events = self.events.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The runner may have shut down in the meantime
            if let Some(events) = events.upgrade() {
                let _ = events.send(Event::DeliveryCheck(check));
            }
        });

        Ok(TimerHandle(task.abort_handle()))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        handle.0.abort();
    }
}
