//! Content-addressed modifier identifier.

use std::fmt;

/// A 32-byte identifier naming one modifier (block section, transaction, ...).
///
/// Identifiers are content addresses: two distinct payloads never share an
/// id. The tracker treats them as opaque keys, so the only operations needed
/// here are construction, comparison and display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId([u8; 32]);

impl ModifierId {
    /// Size of an identifier in bytes.
    pub const BYTES: usize = 32;

    /// All-zero identifier.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Derive the identifier of a payload by hashing it with Blake3.
    pub fn of_content(content: &[u8]) -> Self {
        Self(*blake3::hash(content).as_bytes())
    }

    /// Wrap raw identifier bytes (no hashing).
    pub const fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Wrap a raw identifier slice (no hashing).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| IdError::InvalidLength {
            expected: Self::BYTES,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse an identifier from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        if hex.len() != 64 {
            return Err(IdError::InvalidLength {
                expected: 64,
                actual: hex.len(),
            });
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex, &mut bytes).map_err(|_| IdError::InvalidHex)?;

        Ok(Self(bytes))
    }

    /// Encode as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get bytes as slice reference.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "ModifierId({}..{})", &hex[..8], &hex[56..])
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ModifierId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Errors that can occur when building an identifier from external input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Input had the wrong length.
    #[error("Invalid identifier length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Invalid hex characters.
    #[error("Invalid hex string")]
    InvalidHex,
}
