//! Peer and modifier-kind identifiers.

use std::fmt;

/// Identity of a connected peer.
///
/// Assigned by the connection layer when a handshake completes. The delivery
/// tracker only compares and prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peer({})", self.0)
    }
}

/// One-byte tag naming the kind of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierTypeId(pub u8);

impl ModifierTypeId {
    /// Unconfirmed transaction.
    pub const TRANSACTION: Self = ModifierTypeId(2);

    /// Block header.
    pub const HEADER: Self = ModifierTypeId(101);

    /// Block transactions section.
    pub const BLOCK_TRANSACTIONS: Self = ModifierTypeId(102);

    /// Authenticated state proofs section.
    pub const AD_PROOFS: Self = ModifierTypeId(104);

    /// Block extension section.
    pub const EXTENSION: Self = ModifierTypeId(108);

    /// Human-readable name for logs.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::TRANSACTION => "Transaction",
            Self::HEADER => "Header",
            Self::BLOCK_TRANSACTIONS => "BlockTransactions",
            Self::AD_PROOFS => "ADProofs",
            Self::EXTENSION => "Extension",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ModifierTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_display() {
        assert_eq!(ModifierTypeId::HEADER.to_string(), "Header(101)");
        assert_eq!(ModifierTypeId(7).to_string(), "Unknown(7)");
    }

    #[test]
    fn test_peer_display() {
        assert_eq!(PeerId(3).to_string(), "Peer(3)");
    }
}
