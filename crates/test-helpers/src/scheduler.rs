//! Deterministic virtual-time scheduler.

use modsync_core::{DeliveryCheck, Scheduler, SchedulerError};
use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a timer armed on a [`SimScheduler`].
///
/// Deliberately neither `Clone` nor `Copy`: a timer is cancelled at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct SimTimer {
    deadline: Duration,
    seq: u64,
}

/// Scheduler driven by an explicit clock.
///
/// Timers sit in a queue ordered by (deadline, arming order) until the test
/// advances time past them. Nothing runs on its own, so every interleaving
/// is reproducible.
#[derive(Debug, Default)]
pub struct SimScheduler {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), DeliveryCheck>,
    cancelled: usize,
    fired: usize,
    unavailable: bool,
}

impl SimScheduler {
    /// Create a scheduler at time zero with nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed, not yet fired or cancelled timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Number of timers cancelled before they fired.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Number of timers that fired.
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// Deadline of the earliest armed timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Checks carried by the armed timers, earliest first.
    pub fn pending_checks(&self) -> Vec<DeliveryCheck> {
        self.timers.values().copied().collect()
    }

    /// Make `schedule_once` fail, as if no runtime were available.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Move the clock forward by `by`, returning the checks that fired.
    pub fn advance(&mut self, by: Duration) -> Vec<DeliveryCheck> {
        self.advance_to(self.now + by)
    }

    /// Move the clock to `time` (never backwards), returning the checks
    /// that fired, in deadline order.
    pub fn advance_to(&mut self, time: Duration) -> Vec<DeliveryCheck> {
        self.now = self.now.max(time);

        let mut fired = Vec::new();
        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            fired.push(entry.remove());
        }
        self.fired += fired.len();
        fired
    }

    /// Jump to the earliest deadline and fire everything due at it.
    pub fn fire_next(&mut self) -> Vec<DeliveryCheck> {
        match self.next_deadline() {
            Some(deadline) => self.advance_to(deadline),
            None => Vec::new(),
        }
    }
}

impl Scheduler for SimScheduler {
    type Handle = SimTimer;

    fn schedule_once(
        &mut self,
        delay: Duration,
        check: DeliveryCheck,
    ) -> Result<SimTimer, SchedulerError> {
        if self.unavailable {
            return Err(SchedulerError::NoRuntime(
                "simulated scheduler disabled".to_string(),
            ));
        }

        let deadline = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert((deadline, seq), check);

        Ok(SimTimer { deadline, seq })
    }

    fn cancel(&mut self, handle: SimTimer) {
        // Timers that already fired are simply gone from the queue.
        if self.timers.remove(&(handle.deadline, handle.seq)).is_some() {
            self.cancelled += 1;
        }
    }
}
