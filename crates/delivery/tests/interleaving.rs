//! Randomized interleavings of network events and timer fires.
//!
//! A seeded ChaCha RNG picks operations and ids from a small pool so that
//! every status gets revisited many times. After each step the tracker's
//! invariants are checked against a model of what it must contain.

use modsync_core::{ModifierStatus, ModifierStore};
use modsync_delivery::{DeliveryConfig, DeliveryError, DeliveryTracker};
use modsync_test_helpers::{modifier_id, peer, MemoryStore, SimScheduler};
use modsync_types::{ModifierId, ModifierTypeId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::time::Duration;

const POOL: u64 = 24;
const STEPS: usize = 5_000;
const MAX_CHECKS: u32 = 3;

fn assert_invariants(
    tracker: &DeliveryTracker<SimScheduler>,
    invalid: &HashSet<ModifierId>,
    store: &MemoryStore,
) {
    // Every request record owns exactly one live timer
    assert_eq!(tracker.requested_count(), tracker.scheduler().pending());

    let stores: [&dyn ModifierStore; 1] = [store];
    for n in 0..POOL {
        let id = modifier_id(n);

        // Structures are disjoint
        let memberships = [
            tracker.is_requested(&id),
            tracker.is_received(&id),
            tracker.is_invalid(&id),
        ];
        assert!(memberships.iter().filter(|m| **m).count() <= 1, "{id:?}");

        // Invalid is permanent
        if invalid.contains(&id) {
            assert_eq!(tracker.status(&id, &stores), ModifierStatus::Invalid);
            assert!(!tracker.is_requested(&id));
            assert!(!tracker.is_received(&id));
        }

        if let Some(checks) = tracker.checks_done(&id) {
            assert!(checks < MAX_CHECKS);
        }
    }

    // Every armed timer belongs to the current arming of its request
    for check in tracker.scheduler().pending_checks() {
        let info = tracker.request_info(&check.id).expect("timer without request");
        assert_eq!(info.nonce, check.nonce);
    }
}

fn run(seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let config = DeliveryConfig::new(Duration::from_secs(5), MAX_CHECKS);
    let mut tracker = DeliveryTracker::new(config, SimScheduler::new());
    let mut store = MemoryStore::new();
    let mut invalid = HashSet::new();

    for _ in 0..STEPS {
        let id = modifier_id(rng.gen_range(0..POOL));
        let before = tracker.tracked_status(&id);

        match rng.gen_range(0..7) {
            0 | 1 => {
                let asked = rng.gen_bool(0.8).then(|| peer(rng.gen_range(0..4)));
                let outcome = tracker.request(asked, ModifierTypeId::HEADER, [id]);
                let legal = matches!(
                    before,
                    ModifierStatus::Unknown | ModifierStatus::Requested
                );
                assert_eq!(outcome.is_complete(), legal, "{before} -> Requested");
            }
            2 => {
                let result = tracker.receive(id);
                assert_eq!(result.is_ok(), before == ModifierStatus::Requested);
                if let Err(e) = result {
                    assert!(e.is_invariant_violation());
                    assert_eq!(tracker.tracked_status(&id), before);
                }
            }
            3 => {
                tracker.apply(id).unwrap();
                if !invalid.contains(&id) {
                    store.insert(id);
                }
            }
            4 => {
                if rng.gen_bool(0.2) {
                    tracker.invalid(id).unwrap();
                    invalid.insert(id);
                    store.remove(&id);
                }
            }
            5 => {
                let result = tracker.stop_processing(id);
                assert_eq!(result.is_ok(), before != ModifierStatus::Invalid);
            }
            _ => {
                let by = Duration::from_millis(rng.gen_range(0..6_000));
                for check in tracker.scheduler_mut().advance(by) {
                    match tracker.on_delivery_check(check) {
                        Ok(_) => {}
                        Err(DeliveryError::RetriesExhausted { id, checks }) => {
                            assert_eq!(checks, MAX_CHECKS);
                            assert_eq!(tracker.tracked_status(&id), ModifierStatus::Unknown);
                        }
                        Err(e) => panic!("unexpected delivery check failure: {e}"),
                    }
                }
            }
        }

        assert_invariants(&tracker, &invalid, &store);
    }
}

#[test]
fn test_random_interleavings_keep_invariants() {
    for seed in 0..8 {
        run(seed);
    }
}
