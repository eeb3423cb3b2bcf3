//! Root keys and sub-key derivation using HKDF

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Size of a root key in bytes
pub const KEY_SIZE: usize = 32;

/// Label for deriving the synthetic-IV MAC key
const MAC_LABEL: &[u8] = b"rotseal-siv-mac-v1";

/// Label for deriving the `XChaCha20-Poly1305` key
const ENC_LABEL: &[u8] = b"rotseal-siv-enc-v1";

/// Root key material for an [`crate::XChaChaSiv`] instance.
///
/// Zeroized on drop.
#[derive(Clone)]
pub struct SivKey {
    bytes: [u8; KEY_SIZE],
}

impl SivKey {
    /// Wrap 32 bytes of key material.
    ///
    /// Caller MUST provide cryptographically secure random bytes in
    /// production.
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Import key material of unchecked length.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `bytes` is not exactly [`KEY_SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let Ok(bytes) = <[u8; KEY_SIZE]>::try_from(bytes) else {
            return Err(CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() });
        };
        Ok(Self { bytes })
    }

    /// Derive the (MAC key, encryption key) pair.
    ///
    /// The two keys are independent: learning one reveals nothing about the
    /// other or about the root key.
    pub(crate) fn derive_subkeys(&self) -> ([u8; KEY_SIZE], [u8; KEY_SIZE]) {
        let hkdf = Hkdf::<Sha256>::new(None, &self.bytes);

        let mut mac_key = [0u8; KEY_SIZE];
        let Ok(()) = hkdf.expand(MAC_LABEL, &mut mac_key) else {
            unreachable!("32 bytes is a valid HKDF-SHA256 output length");
        };

        let mut enc_key = [0u8; KEY_SIZE];
        let Ok(()) = hkdf.expand(ENC_LABEL, &mut enc_key) else {
            unreachable!("32 bytes is a valid HKDF-SHA256 output length");
        };

        (mac_key, enc_key)
    }
}

// Implement Drop to zeroize key material
impl Drop for SivKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
