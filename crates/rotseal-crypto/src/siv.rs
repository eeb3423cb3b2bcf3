//! Deterministic AEAD from HMAC-SHA256 and `XChaCha20-Poly1305`
//!
//! The nonce is not random: it is a synthetic IV computed as a MAC over the
//! associated data and plaintext. Equal inputs therefore give equal
//! ciphertexts, and a nonce can only repeat when the whole input repeats.
//!
//! ```text
//! siv        = HMAC-SHA256(mac_key, be64(len(aad)) || aad || plaintext)[..24]
//! ciphertext = siv || XChaCha20-Poly1305(enc_key, nonce = siv, aad, plaintext)
//! ```

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use hmac::{Hmac, Mac};
use rotseal_core::{DaeadError, DeterministicAead};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::key::{KEY_SIZE, SivKey};

type HmacSha256 = Hmac<Sha256>;

/// Size of the synthetic IV (the `XChaCha20` nonce size)
pub const SIV_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
const POLY1305_TAG_SIZE: usize = 16;

/// Deterministic AEAD keyed by a [`SivKey`].
pub struct XChaChaSiv {
    mac_key: [u8; KEY_SIZE],
    enc_key: [u8; KEY_SIZE],
}

impl XChaChaSiv {
    /// Primitive keyed by `key`.
    pub fn new(key: &SivKey) -> Self {
        let (mac_key, enc_key) = key.derive_subkeys();
        Self { mac_key, enc_key }
    }

    /// Bytes this primitive adds to every plaintext.
    pub const fn overhead() -> usize {
        SIV_SIZE + POLY1305_TAG_SIZE
    }

    /// MAC over the synthetic IV input, ready to finalize or verify.
    fn siv_mac(&self, plaintext: &[u8], associated_data: &[u8]) -> HmacSha256 {
        let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(&self.mac_key) else {
            unreachable!("HMAC accepts keys of any length");
        };
        mac.update(&(associated_data.len() as u64).to_be_bytes());
        mac.update(associated_data);
        mac.update(plaintext);
        mac
    }

    fn synthetic_iv(&self, plaintext: &[u8], associated_data: &[u8]) -> [u8; SIV_SIZE] {
        let digest = self.siv_mac(plaintext, associated_data).finalize().into_bytes();
        let mut siv = [0u8; SIV_SIZE];
        siv.copy_from_slice(&digest[..SIV_SIZE]);
        siv
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new((&self.enc_key).into())
    }
}

impl DeterministicAead for XChaChaSiv {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        let siv = self.synthetic_iv(plaintext, associated_data);

        // Only fails for plaintexts beyond the XChaCha20 block counter range
        let sealed = self
            .cipher()
            .encrypt(XNonce::from_slice(&siv), Payload { msg: plaintext, aad: associated_data })
            .map_err(|_| DaeadError::Primitive {
                reason: "XChaCha20-Poly1305 encryption failed".to_string(),
            })?;

        let mut ciphertext = Vec::with_capacity(SIV_SIZE + sealed.len());
        ciphertext.extend_from_slice(&siv);
        ciphertext.extend_from_slice(&sealed);
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaeadError> {
        if ciphertext.len() < Self::overhead() {
            return Err(DaeadError::DecryptionFailed);
        }

        let (siv, sealed) = ciphertext.split_at(SIV_SIZE);
        let plaintext = self
            .cipher()
            .decrypt(XNonce::from_slice(siv), Payload { msg: sealed, aad: associated_data })
            .map_err(|_| DaeadError::DecryptionFailed)?;

        // Constant-time check that the nonce is the one these inputs produce
        self.siv_mac(&plaintext, associated_data)
            .verify_truncated_left(siv)
            .map_err(|_| DaeadError::DecryptionFailed)?;

        Ok(plaintext)
    }
}

// Implement Drop to zeroize key material
impl Drop for XChaChaSiv {
    fn drop(&mut self) {
        self.mac_key.zeroize();
        self.enc_key.zeroize();
    }
}
