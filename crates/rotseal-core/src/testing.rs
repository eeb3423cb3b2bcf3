//! Toy primitives for unit tests.

use std::sync::{Arc, Mutex};

use crate::{DaeadError, DeterministicAead};

const TAG_SIZE: usize = 8;

/// XOR "cipher" with a keyed FNV-1a tag over (key, aad, plaintext).
pub(crate) struct TagAead {
    key: u8,
}

impl TagAead {
    pub(crate) fn new(key: u8) -> Self {
        Self { key }
    }

    fn tag(&self, plaintext: &[u8], associated_data: &[u8]) -> [u8; TAG_SIZE] {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let len = (associated_data.len() as u64).to_be_bytes();
        for byte in [self.key].iter().chain(&len).chain(associated_data).chain(plaintext) {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash.to_be_bytes()
    }
}

impl DeterministicAead for TagAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        let mut out: Vec<u8> = plaintext.iter().map(|b| b ^ self.key).collect();
        out.extend_from_slice(&self.tag(plaintext, associated_data));
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        let Some(split) = ciphertext.len().checked_sub(TAG_SIZE) else {
            return Err(DaeadError::DecryptionFailed);
        };
        let (body, tag) = ciphertext.split_at(split);
        let plaintext: Vec<u8> = body.iter().map(|b| b ^ self.key).collect();
        if self.tag(&plaintext, associated_data) != tag {
            return Err(DaeadError::DecryptionFailed);
        }
        Ok(plaintext)
    }
}

/// Primitive whose every call fails.
pub(crate) struct BrokenAead;

impl DeterministicAead for BrokenAead {
    fn encrypt(&self, _plaintext: &[u8], _aad: &[u8]) -> Result<Vec<u8>, DaeadError> {
        Err(DaeadError::Primitive { reason: "broken".to_string() })
    }

    fn decrypt(&self, _ciphertext: &[u8], _aad: &[u8]) -> Result<Vec<u8>, DaeadError> {
        Err(DaeadError::Primitive { reason: "broken".to_string() })
    }
}

/// Records the key of every decrypt attempt, in call order.
pub(crate) struct RecordingAead {
    inner: TagAead,
    attempts: Arc<Mutex<Vec<u8>>>,
}

impl RecordingAead {
    pub(crate) fn new(key: u8, attempts: &Arc<Mutex<Vec<u8>>>) -> Self {
        Self { inner: TagAead::new(key), attempts: Arc::clone(attempts) }
    }
}

impl DeterministicAead for RecordingAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        self.inner.encrypt(plaintext, associated_data)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        self.attempts.lock().unwrap().push(self.inner.key);
        self.inner.decrypt(ciphertext, associated_data)
    }
}
