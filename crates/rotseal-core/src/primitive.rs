//! The deterministic AEAD capability.

use std::sync::Arc;

use crate::error::DaeadError;

/// Deterministic authenticated encryption with associated data.
///
/// The same (key, plaintext, associated data) always yields the same
/// ciphertext.
///
/// # Invariants
///
/// - `decrypt(encrypt(m, a)?, a) == m` for every `m` and `a`, including empty
///   slices
/// - Implementations MUST be safe for concurrent, reentrant calls: a key set
///   entry may be tried by many decrypt calls at once
pub trait DeterministicAead: Send + Sync {
    /// Encrypt `plaintext`, authenticating `associated_data` alongside it.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError>;

    /// Decrypt `ciphertext` produced with the same `associated_data`.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError>;
}

impl<T: DeterministicAead + ?Sized> DeterministicAead for Box<T> {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        (**self).encrypt(plaintext, associated_data)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        (**self).decrypt(ciphertext, associated_data)
    }
}

impl<T: DeterministicAead + ?Sized> DeterministicAead for Arc<T> {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        (**self).encrypt(plaintext, associated_data)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        (**self).decrypt(ciphertext, associated_data)
    }
}
