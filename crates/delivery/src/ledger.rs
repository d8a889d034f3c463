//! Ledger of outstanding modifier requests.
//!
//! Each entry owns the handle of the timer armed for it. The only way to take
//! an entry out is [`RequestLedger::take_and_cancel`], which hands the handle
//! back to the scheduler before returning, so a removed entry never leaves a
//! live timer behind.

use indexmap::IndexMap;
use modsync_core::{RequestNonce, Scheduler};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};

/// What the tracker knows about one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestInfo {
    /// Peer asked for the modifier. `None` for locally originated requests.
    pub peer: Option<PeerId>,
    /// Kind of the requested modifier.
    pub type_id: ModifierTypeId,
    /// Delivery checks already consumed.
    pub checks: u32,
    /// Nonce stamped on the currently armed timer.
    pub nonce: RequestNonce,
}

#[derive(Debug)]
struct RequestRecord<H> {
    info: RequestInfo,
    timer: H,
}

/// Outstanding requests keyed by modifier id.
///
/// Generic over the scheduler's timer handle type.
#[derive(Debug)]
pub struct RequestLedger<H> {
    records: IndexMap<ModifierId, RequestRecord<H>>,
}

impl<H> Default for RequestLedger<H> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<H> RequestLedger<H> {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request together with the handle of its freshly armed timer.
    ///
    /// The caller has already checked that no entry exists for `id`.
    pub fn insert(&mut self, id: ModifierId, info: RequestInfo, timer: H) {
        let previous = self.records.insert(id, RequestRecord { info, timer });
        debug_assert!(previous.is_none(), "request for {id} recorded twice");
    }

    /// Remove the entry for `id`, cancelling its timer.
    ///
    /// Returns the entry's metadata, or `None` if nothing was outstanding.
    pub fn take_and_cancel<S>(
        &mut self,
        id: &ModifierId,
        scheduler: &mut S,
    ) -> Option<RequestInfo>
    where
        S: Scheduler<Handle = H>,
    {
        let record = self.records.swap_remove(id)?;
        scheduler.cancel(record.timer);
        Some(record.info)
    }

    /// Get the metadata of an outstanding request.
    pub fn get(&self, id: &ModifierId) -> Option<&RequestInfo> {
        self.records.get(id).map(|record| &record.info)
    }

    /// Check if a request for `id` is outstanding.
    pub fn contains(&self, id: &ModifierId) -> bool {
        self.records.contains_key(id)
    }

    /// Iterate over outstanding requests.
    pub fn iter(&self) -> impl Iterator<Item = (&ModifierId, &RequestInfo)> {
        self.records.iter().map(|(id, record)| (id, &record.info))
    }

    /// Ids of outstanding requests for one modifier kind.
    pub fn ids_of_type(&self, type_id: ModifierTypeId) -> Vec<ModifierId> {
        self.iter()
            .filter(|(_, info)| info.type_id == type_id)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Get the number of outstanding requests.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsync_core::{DeliveryCheck, SchedulerError};
    use std::time::Duration;

    /// Scheduler that only remembers which handles were cancelled.
    #[derive(Default)]
    struct CountingScheduler {
        cancelled: Vec<u32>,
    }

    impl Scheduler for CountingScheduler {
        type Handle = u32;

        fn schedule_once(
            &mut self,
            _delay: Duration,
            _check: DeliveryCheck,
        ) -> Result<u32, SchedulerError> {
            Ok(0)
        }

        fn cancel(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    fn info(type_id: ModifierTypeId, nonce: u64) -> RequestInfo {
        RequestInfo {
            peer: Some(PeerId(1)),
            type_id,
            checks: 0,
            nonce: RequestNonce(nonce),
        }
    }

    #[test]
    fn test_take_and_cancel_releases_timer() {
        let mut ledger = RequestLedger::new();
        let mut scheduler = CountingScheduler::default();
        let id = ModifierId::of_content(b"a");

        ledger.insert(id, info(ModifierTypeId::HEADER, 0), 7);
        assert!(ledger.contains(&id));

        let taken = ledger.take_and_cancel(&id, &mut scheduler);
        assert_eq!(taken, Some(info(ModifierTypeId::HEADER, 0)));
        assert_eq!(scheduler.cancelled, vec![7]);
        assert!(ledger.is_empty());

        // Second take finds nothing and cancels nothing
        assert_eq!(ledger.take_and_cancel(&id, &mut scheduler), None);
        assert_eq!(scheduler.cancelled, vec![7]);
    }

    #[test]
    fn test_ids_of_type() {
        let mut ledger = RequestLedger::new();
        let header = ModifierId::of_content(b"header");
        let tx = ModifierId::of_content(b"tx");

        ledger.insert(header, info(ModifierTypeId::HEADER, 0), 1);
        ledger.insert(tx, info(ModifierTypeId::TRANSACTION, 1), 2);

        assert_eq!(ledger.ids_of_type(ModifierTypeId::HEADER), vec![header]);
        assert_eq!(ledger.ids_of_type(ModifierTypeId::TRANSACTION), vec![tx]);
        assert!(ledger.ids_of_type(ModifierTypeId::EXTENSION).is_empty());
        assert_eq!(ledger.len(), 2);
    }
}
