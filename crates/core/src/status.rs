//! Modifier delivery status.

use std::fmt;

/// Where a modifier stands from the point of view of the local node.
///
/// Exactly one status applies to an id at any time. `Held` is never stored by
/// the tracker; it is derived by asking the persistent stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierStatus {
    /// Nothing is known about the modifier and no store holds it.
    Unknown,
    /// A request is outstanding.
    Requested,
    /// Bytes arrived from a peer but have not been applied yet.
    Received,
    /// A durable store already contains the modifier.
    Held,
    /// Permanently rejected. Never requested or received again.
    Invalid,
}

impl ModifierStatus {
    /// Get a human-readable name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierStatus::Unknown => "Unknown",
            ModifierStatus::Requested => "Requested",
            ModifierStatus::Received => "Received",
            ModifierStatus::Held => "Held",
            ModifierStatus::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ModifierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
