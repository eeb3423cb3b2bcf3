//! Deterministic AEAD over a whole key set.
//!
//! Encryption always uses the primary entry and stamps its identifier on the
//! output. Decryption tries, in order:
//!
//! 1. Entries whose identifier matches the ciphertext prefix, on the payload
//!    after the prefix
//! 2. Raw entries, on the full ciphertext
//!
//! and returns the first success.
//!
//! # Security
//!
//! Every decrypt failure collapses into [`DaeadError::DecryptionFailed`].
//! Callers cannot tell an unknown identifier from a wrong key or a corrupt
//! payload, and nothing about the attempted keys is logged.

use crate::{
    error::DaeadError,
    keyset::{KeyEntry, KeySet},
    primitive::DeterministicAead,
};

/// Single deterministic AEAD backed by a rotating key set.
#[derive(Debug)]
pub struct Dispatcher {
    keyset: KeySet,
}

impl Dispatcher {
    /// Wrap a validated key set.
    pub fn new(keyset: KeySet) -> Self {
        Self { keyset }
    }

    /// The wrapped key set.
    pub fn keyset(&self) -> &KeySet {
        &self.keyset
    }

    /// Phase 1: entries selected by the ciphertext prefix.
    fn decrypt_prefixed(&self, ciphertext: &[u8], associated_data: &[u8]) -> Option<Vec<u8>> {
        let prefix_size = self.keyset.prefix_size();
        if ciphertext.len() <= prefix_size {
            return None;
        }

        let (candidate, payload) = ciphertext.split_at(prefix_size);
        first_success(self.keyset.lookup(candidate), payload, associated_data)
    }

    /// Phase 2: every raw entry, on the unmodified ciphertext.
    fn decrypt_raw(&self, ciphertext: &[u8], associated_data: &[u8]) -> Option<Vec<u8>> {
        first_success(self.keyset.raw_entries(), ciphertext, associated_data)
    }
}

impl From<KeySet> for Dispatcher {
    fn from(keyset: KeySet) -> Self {
        Self::new(keyset)
    }
}

impl DeterministicAead for Dispatcher {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        let primary = self.keyset.primary();
        let raw_ciphertext =
            primary.primitive().encrypt(plaintext, associated_data).inspect_err(|e| {
                tracing::debug!(error = %e, "primary key failed to encrypt");
            })?;

        let identifier = primary.identifier();
        let mut ciphertext = Vec::with_capacity(identifier.len() + raw_ciphertext.len());
        ciphertext.extend_from_slice(identifier);
        ciphertext.extend_from_slice(&raw_ciphertext);
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        if let Some(plaintext) = self.decrypt_prefixed(ciphertext, associated_data) {
            return Ok(plaintext);
        }

        if let Some(plaintext) = self.decrypt_raw(ciphertext, associated_data) {
            return Ok(plaintext);
        }

        tracing::trace!("no key set entry decrypted the ciphertext");
        Err(DaeadError::DecryptionFailed)
    }
}

/// First plaintext any of `entries` produces; individual failures are dropped.
fn first_success<'a>(
    entries: impl IntoIterator<Item = &'a KeyEntry>,
    ciphertext: &[u8],
    associated_data: &[u8],
) -> Option<Vec<u8>> {
    entries
        .into_iter()
        .find_map(|entry| entry.primitive().decrypt(ciphertext, associated_data).ok())
}
