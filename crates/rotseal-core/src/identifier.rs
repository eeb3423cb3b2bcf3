//! Key identifiers and the prefixes they stamp on ciphertexts.
//!
//! A non-raw identifier is a fixed-size byte string. Key-management code
//! usually derives it from a numeric key id:
//!
//! ```text
//! Tink:             0x01 || key_id (u32, big-endian)
//! Legacy, Crunchy:  0x00 || key_id (u32, big-endian)
//! Raw:              (empty)
//! ```

use std::fmt;

/// Prefix size produced by [`OutputPrefix::identifier`] for non-raw keys.
pub const TINK_PREFIX_SIZE: usize = 5;

/// Leading byte of a `Tink` prefix.
const TINK_START_BYTE: u8 = 0x01;

/// Leading byte of a `Legacy` or `Crunchy` prefix.
const LEGACY_START_BYTE: u8 = 0x00;

/// How a key marks the ciphertexts it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPrefix {
    /// Version byte `0x01` followed by the key id
    Tink,
    /// Version byte `0x00` followed by the key id
    Legacy,
    /// Same wire prefix as `Legacy`
    Crunchy,
    /// No prefix; the key is found by trial decryption
    Raw,
}

impl OutputPrefix {
    /// Identifier this prefix type assigns to `key_id`.
    pub fn identifier(self, key_id: u32) -> Identifier {
        let start = match self {
            Self::Tink => TINK_START_BYTE,
            Self::Legacy | Self::Crunchy => LEGACY_START_BYTE,
            Self::Raw => return Identifier::raw(),
        };

        let mut bytes = Vec::with_capacity(TINK_PREFIX_SIZE);
        bytes.push(start);
        bytes.extend_from_slice(&key_id.to_be_bytes());
        Identifier(bytes)
    }
}

/// Lifecycle status of a key as reported by key management.
///
/// Only enabled keys enter a key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    /// Usable for decryption, and for encryption when primary
    Enabled,
    /// Retained but must not be used
    Disabled,
    /// Key material has been destroyed
    Destroyed,
}

/// Identifier a key stamps on its ciphertexts.
///
/// The empty identifier is the raw identifier.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Identifier(Vec<u8>);

impl Identifier {
    /// The raw (empty) identifier.
    pub fn raw() -> Self {
        Self(Vec::new())
    }

    /// Identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Identifier length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the raw identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for the raw identifier.
    pub fn is_raw(&self) -> bool {
        self.is_empty()
    }
}

impl From<Vec<u8>> for Identifier {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Identifier {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Identifier {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_raw() {
            return f.write_str("Identifier(raw)");
        }
        f.write_str("Identifier(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}
