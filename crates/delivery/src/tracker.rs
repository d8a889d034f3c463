//! The modifier delivery tracker.

use crate::ledger::{RequestInfo, RequestLedger};
use crate::transition::check_transition;
use crate::{DeliveryConfig, DeliveryError};
use modsync_core::{DeliveryCheck, ModifierStatus, ModifierStore, RequestNonce, Scheduler};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

/// Result of a batch [`DeliveryTracker::request`] call.
///
/// Every id of the batch ends up in exactly one of the three lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Ids that are now `Requested` with a fresh timer.
    pub requested: Vec<ModifierId>,
    /// Ids that were already `Requested`; their existing request is kept.
    pub unchanged: Vec<ModifierId>,
    /// Ids the tracker refused, with the reason.
    pub rejected: Vec<(ModifierId, DeliveryError)>,
}

impl BatchOutcome {
    /// Check if no id of the batch was refused.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Result of handling a fired delivery timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The modifier is still outstanding; a fresh timer was armed.
    Rearmed,
    /// The timer belonged to a request that has since been resolved or
    /// re-armed. Nothing was changed.
    Stale,
}

/// Snapshot of tracker occupancy for logs and health output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryInfo {
    /// Outstanding requests.
    pub requested: usize,
    /// Received but not yet applied.
    pub received: usize,
    /// Permanently rejected.
    pub invalid: usize,
    /// Outstanding requests per modifier kind.
    pub requested_by_type: BTreeMap<ModifierTypeId, usize>,
}

impl fmt::Display for DeliveryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested={} received={} invalid={}",
            self.requested, self.received, self.invalid
        )?;
        for (type_id, count) in &self.requested_by_type {
            write!(f, " {}={}", type_id.name(), count)?;
        }
        Ok(())
    }
}

/// Tracks the delivery status of every modifier the node is fetching.
///
/// Owns three structures:
///
/// 1. **Request ledger**: outstanding requests with their timers
/// 2. **Received map**: modifiers that arrived but are not applied yet,
///    with the peer that sent them
/// 3. **Invalid set**: modifiers that must never be fetched again
///
/// `Held` is not stored. [`DeliveryTracker::status`] derives it from the
/// stores passed in, which keeps memory bounded by in-flight work rather than
/// chain length.
///
/// The tracker is single-threaded: drive it from one task and feed timer
/// fires back through [`DeliveryTracker::on_delivery_check`].
pub struct DeliveryTracker<S: Scheduler> {
    config: DeliveryConfig,

    /// Arms and cancels delivery timers.
    scheduler: S,

    /// Outstanding requests. Every entry owns a live timer.
    requested: RequestLedger<S::Handle>,

    /// Received modifiers -> peer they came from.
    received: HashMap<ModifierId, Option<PeerId>>,

    /// Never removed from.
    invalid: HashSet<ModifierId>,

    /// Nonce for the next armed timer.
    next_nonce: RequestNonce,
}

impl<S: Scheduler> DeliveryTracker<S> {
    /// Create a tracker with nothing tracked.
    pub fn new(config: DeliveryConfig, scheduler: S) -> Self {
        Self {
            config,
            scheduler,
            requested: RequestLedger::new(),
            received: HashMap::new(),
            invalid: HashSet::new(),
            next_nonce: RequestNonce(0),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Get the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Get the scheduler mutably (test clocks need to be advanced).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Status Oracle
    // ═══════════════════════════════════════════════════════════════════════

    /// Current status of `id`.
    ///
    /// Local state wins over the stores: a modifier that is `Received` here
    /// reports `Received` even if a store already holds it, until `apply`
    /// or `invalid` resolves it.
    pub fn status(&self, id: &ModifierId, stores: &[&dyn ModifierStore]) -> ModifierStatus {
        if self.received.contains_key(id) {
            ModifierStatus::Received
        } else if self.requested.contains(id) {
            ModifierStatus::Requested
        } else if self.invalid.contains(id) {
            ModifierStatus::Invalid
        } else if stores.iter().any(|store| store.contains(id)) {
            ModifierStatus::Held
        } else {
            ModifierStatus::Unknown
        }
    }

    /// Status from local state only. Never returns `Held`.
    pub fn tracked_status(&self, id: &ModifierId) -> ModifierStatus {
        self.status(id, &[])
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Request / Retry
    // ═══════════════════════════════════════════════════════════════════════

    /// Mark `ids` as requested from `peer`, arming one delivery timer each.
    ///
    /// Ids are handled independently. A refused id is logged and reported
    /// in [`BatchOutcome::rejected`] without affecting the rest.
    pub fn request<I>(
        &mut self,
        peer: Option<PeerId>,
        type_id: ModifierTypeId,
        ids: I,
    ) -> BatchOutcome
    where
        I: IntoIterator<Item = ModifierId>,
    {
        let mut outcome = BatchOutcome::default();

        for id in ids {
            let from = self.tracked_status(&id);
            if from == ModifierStatus::Requested {
                trace!(id = %id, "Modifier already requested");
                outcome.unchanged.push(id);
                continue;
            }

            let result = check_transition(id, from, ModifierStatus::Requested)
                .and_then(|()| self.arm(id, peer, type_id, 0));

            match result {
                Ok(()) => outcome.requested.push(id),
                Err(e) => {
                    warn!(
                        id = %id,
                        ?peer,
                        error = %e,
                        "Failed to mark modifier as requested"
                    );
                    outcome.rejected.push((id, e));
                }
            }
        }

        debug!(
            ?peer,
            type_id = %type_id,
            requested = outcome.requested.len(),
            unchanged = outcome.unchanged.len(),
            rejected = outcome.rejected.len(),
            "Requested modifiers"
        );

        outcome
    }

    /// Handle a delivery timeout for a modifier that has not arrived.
    ///
    /// The old request record is removed and its timer cancelled before
    /// anything else happens. If fewer than `max_delivery_checks` checks have
    /// now been consumed the request is re-armed for the same peer; otherwise
    /// the modifier is left `Unknown` and [`DeliveryError::RetriesExhausted`]
    /// is returned so the caller can try elsewhere.
    pub fn still_waiting(
        &mut self,
        peer: Option<PeerId>,
        id: ModifierId,
    ) -> Result<(), DeliveryError> {
        let info = self
            .requested
            .take_and_cancel(&id, &mut self.scheduler)
            .ok_or(DeliveryError::MissingRequest { id })?;

        if info.peer != peer {
            debug!(
                id = %id,
                expected = ?info.peer,
                got = ?peer,
                "Delivery check peer mismatch"
            );
        }

        let checks = info.checks.saturating_add(1);

        if checks < self.config.max_delivery_checks {
            debug!(id = %id, peer = ?info.peer, checks, "Still waiting for modifier, re-arming");
            self.arm(id, info.peer, info.type_id, checks)?;
            self.debug_assert_status(&id, ModifierStatus::Requested);
            Ok(())
        } else {
            warn!(
                id = %id,
                peer = ?info.peer,
                type_id = %info.type_id,
                checks,
                "Modifier not delivered, giving up"
            );
            self.debug_assert_status(&id, ModifierStatus::Unknown);
            Err(DeliveryError::RetriesExhausted { id, checks })
        }
    }

    /// Entry point for a fired timer.
    ///
    /// A check whose nonce no longer matches the ledger entry comes from a
    /// timer that was cancelled or replaced after it fired; it is dropped.
    pub fn on_delivery_check(
        &mut self,
        check: DeliveryCheck,
    ) -> Result<CheckOutcome, DeliveryError> {
        let current = self.requested.get(&check.id).map(|info| info.nonce);
        if current != Some(check.nonce) {
            trace!(id = %check.id, nonce = %check.nonce, "Dropping stale delivery check");
            return Ok(CheckOutcome::Stale);
        }

        self.still_waiting(check.peer, check.id)?;
        Ok(CheckOutcome::Rearmed)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════════

    /// Record that `id` arrived from an unspecified peer.
    pub fn receive(&mut self, id: ModifierId) -> Result<(), DeliveryError> {
        self.receive_from(id, None)
    }

    /// Record that `id` arrived from `sender`.
    ///
    /// Only a `Requested` modifier can be received. Anything else means the
    /// caller's bookkeeping drifted from the tracker's and is rejected.
    pub fn receive_from(
        &mut self,
        id: ModifierId,
        sender: Option<PeerId>,
    ) -> Result<(), DeliveryError> {
        let from = self.tracked_status(&id);
        if from != ModifierStatus::Requested {
            warn!(
                id = %id,
                status = %from,
                ?sender,
                "Received modifier that was not requested"
            );
            return Err(DeliveryError::IllegalTransition {
                id,
                from,
                to: ModifierStatus::Received,
            });
        }
        check_transition(id, from, ModifierStatus::Received)?;

        let info = self.requested.take_and_cancel(&id, &mut self.scheduler);
        if let (Some(info), Some(sender)) = (info, sender) {
            if info.peer.is_some_and(|asked| asked != sender) {
                debug!(
                    id = %id,
                    asked = ?info.peer,
                    %sender,
                    "Modifier delivered by another peer"
                );
            }
        }
        self.received.insert(id, sender);

        debug!(id = %id, ?sender, "Modifier received");
        self.debug_assert_status(&id, ModifierStatus::Received);
        Ok(())
    }

    /// Record that `id` was applied to a durable store.
    ///
    /// Clears local tracking; later `status` calls fall through to the
    /// stores. An invalid mark is kept.
    pub fn apply(&mut self, id: ModifierId) -> Result<(), DeliveryError> {
        let from = self.tracked_status(&id);
        check_transition(id, from, ModifierStatus::Held)?;

        self.clear(&id);

        debug!(id = %id, from = %from, "Modifier applied");
        debug_assert!(matches!(
            self.tracked_status(&id),
            ModifierStatus::Unknown | ModifierStatus::Invalid
        ));
        Ok(())
    }

    /// Permanently reject `id`.
    pub fn invalid(&mut self, id: ModifierId) -> Result<(), DeliveryError> {
        let from = self.tracked_status(&id);
        check_transition(id, from, ModifierStatus::Invalid)?;

        self.clear(&id);
        if self.invalid.insert(id) {
            debug!(id = %id, from = %from, "Modifier marked invalid");
        }

        self.debug_assert_status(&id, ModifierStatus::Invalid);
        Ok(())
    }

    /// Drop transient tracking for `id`, returning it to `Unknown`.
    ///
    /// Used when the delivered bytes do not hash to `id`, when a bounded
    /// receive cache evicts the modifier, or after giving up on delivery.
    pub fn stop_processing(&mut self, id: ModifierId) -> Result<(), DeliveryError> {
        let from = self.tracked_status(&id);
        check_transition(id, from, ModifierStatus::Unknown)?;

        self.clear(&id);

        if from != ModifierStatus::Unknown {
            debug!(id = %id, from = %from, "Stopped processing modifier");
        }
        self.debug_assert_status(&id, ModifierStatus::Unknown);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Introspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Peer an outstanding request went to.
    ///
    /// `None` if nothing is outstanding, `Some(None)` for a request with no
    /// particular peer.
    pub fn requested_from(&self, id: &ModifierId) -> Option<Option<PeerId>> {
        self.requested.get(id).map(|info| info.peer)
    }

    /// Metadata of an outstanding request.
    pub fn request_info(&self, id: &ModifierId) -> Option<RequestInfo> {
        self.requested.get(id).copied()
    }

    /// Delivery checks consumed by an outstanding request.
    pub fn checks_done(&self, id: &ModifierId) -> Option<u32> {
        self.requested.get(id).map(|info| info.checks)
    }

    /// Peer a received modifier came from.
    pub fn received_from(&self, id: &ModifierId) -> Option<Option<PeerId>> {
        self.received.get(id).copied()
    }

    /// Check if a request for `id` is outstanding.
    pub fn is_requested(&self, id: &ModifierId) -> bool {
        self.requested.contains(id)
    }

    /// Check if `id` was received and not yet applied.
    pub fn is_received(&self, id: &ModifierId) -> bool {
        self.received.contains_key(id)
    }

    /// Check if `id` was rejected.
    pub fn is_invalid(&self, id: &ModifierId) -> bool {
        self.invalid.contains(id)
    }

    /// Outstanding request ids for one modifier kind.
    pub fn requested_ids(&self, type_id: ModifierTypeId) -> Vec<ModifierId> {
        self.requested.ids_of_type(type_id)
    }

    /// Get the number of outstanding requests.
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    /// Occupancy snapshot.
    pub fn info(&self) -> DeliveryInfo {
        let mut requested_by_type = BTreeMap::new();
        for (_, info) in self.requested.iter() {
            *requested_by_type.entry(info.type_id).or_insert(0) += 1;
        }

        DeliveryInfo {
            requested: self.requested.len(),
            received: self.received.len(),
            invalid: self.invalid.len(),
            requested_by_type,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    /// Arm a timer for `id` and record the request.
    ///
    /// Nothing is recorded if the scheduler refuses the timer.
    fn arm(
        &mut self,
        id: ModifierId,
        peer: Option<PeerId>,
        type_id: ModifierTypeId,
        checks: u32,
    ) -> Result<(), DeliveryError> {
        let nonce = self.next_nonce.bump();
        let check = DeliveryCheck {
            peer,
            type_id,
            id,
            nonce,
        };
        let timer = self
            .scheduler
            .schedule_once(self.config.delivery_timeout, check)?;

        self.requested.insert(
            id,
            RequestInfo {
                peer,
                type_id,
                checks,
                nonce,
            },
            timer,
        );
        Ok(())
    }

    /// Remove `id` from the received map and the ledger, cancelling any timer.
    fn clear(&mut self, id: &ModifierId) {
        self.received.remove(id);
        self.requested.take_and_cancel(id, &mut self.scheduler);
    }

    fn debug_assert_status(&self, id: &ModifierId, expected: ModifierStatus) {
        debug_assert_eq!(
            self.tracked_status(id),
            expected,
            "tracker left {id} in the wrong status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsync_test_helpers::{modifier_id, peer, MemoryStore, SimScheduler};
    use std::time::Duration;
    use tracing_test::traced_test;

    const HEADER: ModifierTypeId = ModifierTypeId::HEADER;

    fn make_tracker(max_checks: u32) -> DeliveryTracker<SimScheduler> {
        let config = DeliveryConfig::new(Duration::from_secs(10), max_checks);
        DeliveryTracker::new(config, SimScheduler::new())
    }

    #[traced_test]
    #[test]
    fn test_untouched_modifier_is_unknown() {
        let tracker = make_tracker(3);
        let store = MemoryStore::new();

        assert_eq!(
            tracker.status(&modifier_id(1), &[&store]),
            ModifierStatus::Unknown
        );
        assert_eq!(tracker.tracked_status(&modifier_id(1)), ModifierStatus::Unknown);
    }

    #[traced_test]
    #[test]
    fn test_request_arms_timer_with_zero_checks() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        let outcome = tracker.request(Some(peer(1)), HEADER, [id]);

        assert_eq!(outcome.requested, vec![id]);
        assert!(outcome.is_complete());
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Requested);
        assert_eq!(tracker.checks_done(&id), Some(0));
        assert_eq!(tracker.requested_from(&id), Some(Some(peer(1))));
        assert_eq!(tracker.scheduler().pending(), 1);
    }

    #[traced_test]
    #[test]
    fn test_request_twice_keeps_existing_request() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        tracker.request(Some(peer(1)), HEADER, [id]);
        let outcome = tracker.request(Some(peer(2)), HEADER, [id]);

        assert_eq!(outcome.unchanged, vec![id]);
        assert_eq!(tracker.requested_from(&id), Some(Some(peer(1))));
        assert_eq!(tracker.scheduler().pending(), 1);
    }

    #[traced_test]
    #[test]
    fn test_batch_failures_are_independent() {
        let mut tracker = make_tracker(3);
        let bad = modifier_id(1);
        let good = modifier_id(2);

        tracker.request(None, HEADER, [bad]);
        tracker.receive(bad).unwrap();

        let outcome = tracker.request(Some(peer(1)), HEADER, [bad, good]);

        assert_eq!(outcome.requested, vec![good]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, bad);
        assert!(outcome.rejected[0].1.is_invariant_violation());
        assert_eq!(tracker.tracked_status(&bad), ModifierStatus::Received);
        assert_eq!(tracker.tracked_status(&good), ModifierStatus::Requested);
    }

    #[traced_test]
    #[test]
    fn test_receive_cancels_timer() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        tracker.request(Some(peer(1)), HEADER, [id]);
        tracker.receive_from(id, Some(peer(1))).unwrap();

        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Received);
        assert!(!tracker.is_requested(&id));
        assert_eq!(tracker.received_from(&id), Some(Some(peer(1))));
        assert_eq!(tracker.scheduler().pending(), 0);
        assert_eq!(tracker.scheduler().cancelled(), 1);
    }

    #[traced_test]
    #[test]
    fn test_receive_requires_requested() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        // Unknown
        let err = tracker.receive(id).unwrap_err();
        assert_eq!(
            err,
            DeliveryError::IllegalTransition {
                id,
                from: ModifierStatus::Unknown,
                to: ModifierStatus::Received
            }
        );
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Unknown);

        // Received twice
        tracker.request(None, HEADER, [id]);
        tracker.receive(id).unwrap();
        assert!(tracker.receive(id).unwrap_err().is_invariant_violation());
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Received);
    }

    #[traced_test]
    #[test]
    fn test_still_waiting_rearms_below_limit() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        tracker.request(Some(peer(1)), HEADER, [id]);
        let first_nonce = tracker.request_info(&id).unwrap().nonce;

        tracker.still_waiting(Some(peer(1)), id).unwrap();

        let info = tracker.request_info(&id).unwrap();
        assert_eq!(info.checks, 1);
        assert_eq!(info.peer, Some(peer(1)));
        assert_ne!(info.nonce, first_nonce);
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Requested);
        assert_eq!(tracker.scheduler().pending(), 1);
        assert_eq!(tracker.scheduler().cancelled(), 1);
    }

    #[traced_test]
    #[test]
    fn test_still_waiting_gives_up_at_limit() {
        let mut tracker = make_tracker(2);
        let id = modifier_id(1);

        tracker.request(Some(peer(1)), HEADER, [id]);

        tracker.still_waiting(Some(peer(1)), id).unwrap();
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Requested);

        let err = tracker.still_waiting(Some(peer(1)), id).unwrap_err();
        assert_eq!(err, DeliveryError::RetriesExhausted { id, checks: 2 });
        assert!(err.is_retries_exhausted());
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Unknown);
        assert_eq!(tracker.scheduler().pending(), 0);

        // Can be requested again from someone else
        let outcome = tracker.request(Some(peer(2)), HEADER, [id]);
        assert_eq!(outcome.requested, vec![id]);
    }

    #[traced_test]
    #[test]
    fn test_still_waiting_without_request() {
        let mut tracker = make_tracker(2);
        let id = modifier_id(1);

        assert_eq!(
            tracker.still_waiting(None, id),
            Err(DeliveryError::MissingRequest { id })
        );
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Unknown);
    }

    #[traced_test]
    #[test]
    fn test_stale_delivery_check_is_dropped() {
        let mut tracker = make_tracker(5);
        let id = modifier_id(1);

        tracker.request(Some(peer(1)), HEADER, [id]);
        let stale = DeliveryCheck {
            peer: Some(peer(1)),
            type_id: HEADER,
            id,
            nonce: tracker.request_info(&id).unwrap().nonce,
        };

        // Re-arm replaces the nonce; the old check no longer applies
        tracker.still_waiting(Some(peer(1)), id).unwrap();
        assert_eq!(tracker.on_delivery_check(stale), Ok(CheckOutcome::Stale));
        assert_eq!(tracker.checks_done(&id), Some(1));

        // After receive, nothing is outstanding at all
        tracker.receive(id).unwrap();
        assert_eq!(tracker.on_delivery_check(stale), Ok(CheckOutcome::Stale));
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Received);
    }

    #[traced_test]
    #[test]
    fn test_apply_falls_through_to_stores() {
        let mut tracker = make_tracker(3);
        let held = modifier_id(1);
        let dropped = modifier_id(2);
        let mut store = MemoryStore::new();
        store.insert(held);

        tracker.request(Some(peer(1)), HEADER, [held, dropped]);
        tracker.receive(held).unwrap();

        tracker.apply(held).unwrap();
        tracker.apply(dropped).unwrap();

        assert_eq!(tracker.status(&held, &[&store]), ModifierStatus::Held);
        assert_eq!(tracker.status(&dropped, &[&store]), ModifierStatus::Unknown);
        assert_eq!(tracker.scheduler().pending(), 0);
    }

    #[traced_test]
    #[test]
    fn test_received_takes_precedence_over_store() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);
        let mut store = MemoryStore::new();
        store.insert(id);

        tracker.request(None, HEADER, [id]);
        tracker.receive(id).unwrap();

        assert_eq!(tracker.status(&id, &[&store]), ModifierStatus::Received);
    }

    #[traced_test]
    #[test]
    fn test_invalid_is_permanent() {
        let mut tracker = make_tracker(3);
        let id = modifier_id(1);

        tracker.request(None, HEADER, [id]);
        tracker.invalid(id).unwrap();

        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Invalid);
        assert_eq!(tracker.scheduler().pending(), 0);

        let outcome = tracker.request(Some(peer(1)), HEADER, [id]);
        assert_eq!(outcome.rejected.len(), 1);
        assert!(tracker.receive(id).is_err());
        assert!(tracker.stop_processing(id).is_err());

        // Second invalid is a no-op, apply keeps the mark
        tracker.invalid(id).unwrap();
        tracker.apply(id).unwrap();
        assert_eq!(tracker.tracked_status(&id), ModifierStatus::Invalid);
        assert_eq!(tracker.info().invalid, 1);
    }

    #[traced_test]
    #[test]
    fn test_stop_processing() {
        let mut tracker = make_tracker(3);
        let requested = modifier_id(1);
        let received = modifier_id(2);
        let untouched = modifier_id(3);

        tracker.request(None, HEADER, [requested, received]);
        tracker.receive(received).unwrap();

        tracker.stop_processing(requested).unwrap();
        tracker.stop_processing(received).unwrap();
        tracker.stop_processing(untouched).unwrap();

        for id in [requested, received, untouched] {
            assert_eq!(tracker.tracked_status(&id), ModifierStatus::Unknown);
        }
        assert_eq!(tracker.scheduler().pending(), 0);
    }

    #[traced_test]
    #[test]
    fn test_info_counts() {
        let mut tracker = make_tracker(3);

        tracker.request(None, HEADER, [modifier_id(1), modifier_id(2)]);
        tracker.request(None, ModifierTypeId::TRANSACTION, [modifier_id(3)]);
        tracker.receive(modifier_id(1)).unwrap();
        tracker.invalid(modifier_id(4)).unwrap();

        let info = tracker.info();
        assert_eq!(info.requested, 2);
        assert_eq!(info.received, 1);
        assert_eq!(info.invalid, 1);
        assert_eq!(info.requested_by_type.get(&HEADER), Some(&1));
        assert_eq!(
            info.to_string(),
            "requested=2 received=1 invalid=1 Transaction=1 Header=1"
        );
        assert_eq!(tracker.requested_ids(HEADER), vec![modifier_id(2)]);
    }
}
