//! Error types for key set construction and deterministic AEAD dispatch.
//!
//! Construction errors and capability errors are kept apart: a [`ConfigError`]
//! can only happen while a [`crate::KeySet`] is being built, while a
//! [`DaeadError`] is what every [`crate::DeterministicAead`] call returns.

use thiserror::Error;

/// Errors from building a key set.
///
/// All of these are fatal: no key set (and therefore no dispatcher) exists
/// after one of them is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No entries were supplied
    #[error("key set has no entries")]
    EmptyKeySet,

    /// Primary index does not reference a present entry
    #[error("primary index {index} out of range for {len} entries")]
    PrimaryOutOfRange {
        /// Requested primary index
        index: usize,
        /// Number of entries in the key set
        len: usize,
    },

    /// More than one entry was designated primary
    #[error("key set has more than one primary")]
    MultiplePrimaries,

    /// Entries were supplied but none was designated primary
    #[error("key set has no primary")]
    MissingPrimary,

    /// The designated primary key is not enabled
    #[error("primary key {key_id} is not enabled")]
    PrimaryNotEnabled {
        /// Key id of the rejected primary
        key_id: u32,
    },

    /// A non-raw identifier does not match the configured prefix size
    #[error("invalid identifier length: expected {expected}, got {actual}")]
    InvalidIdentifierLength {
        /// Configured prefix size
        expected: usize,
        /// Length of the offending identifier
        actual: usize,
    },

    /// Prefix size of zero would make every key raw
    #[error("invalid prefix size: {0}")]
    InvalidPrefixSize(usize),
}

/// Errors from deterministic AEAD operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DaeadError {
    /// The underlying primitive failed for reasons internal to it
    #[error("primitive failure: {reason}")]
    Primitive {
        /// Description supplied by the primitive
        reason: String,
    },

    /// No key could decrypt the ciphertext.
    ///
    /// Intentionally carries no detail: wrong key, corrupt ciphertext and
    /// unknown identifier are indistinguishable to the caller.
    #[error("decryption failed")]
    DecryptionFailed,
}

impl DaeadError {
    /// Returns true if this is the generic decryption failure.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed)
    }
}
