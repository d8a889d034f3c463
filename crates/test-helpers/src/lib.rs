//! Test helpers for modifier delivery tracking.
//!
//! Provides a virtual-time [`SimScheduler`], an in-memory [`MemoryStore`] and
//! small fixture constructors so tests across crates build the same ids.

mod scheduler;

pub use scheduler::{SimScheduler, SimTimer};

use modsync_core::ModifierStore;
use modsync_types::{ModifierId, PeerId};
use std::collections::HashSet;

/// Deterministic modifier id for index `n`.
pub fn modifier_id(n: u64) -> ModifierId {
    ModifierId::of_content(&n.to_le_bytes())
}

/// Peer with numeric identity `n`.
pub fn peer(n: u64) -> PeerId {
    PeerId(n)
}

/// In-memory stand-in for a history or mempool store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    ids: HashSet<ModifierId>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `ids`.
    pub fn with_ids(ids: impl IntoIterator<Item = ModifierId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Add a modifier. Returns false if it was already held.
    pub fn insert(&mut self, id: ModifierId) -> bool {
        self.ids.insert(id)
    }

    /// Remove a modifier (e.g. a transaction evicted from the pool).
    pub fn remove(&mut self, id: &ModifierId) -> bool {
        self.ids.remove(id)
    }

    /// Get the number of held modifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl ModifierStore for MemoryStore {
    fn contains(&self, id: &ModifierId) -> bool {
        self.ids.contains(id)
    }
}
