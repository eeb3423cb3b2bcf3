//! Rotseal Cryptographic Primitives
//!
//! Deterministic AEAD primitives that plug into a [`rotseal_core::KeySet`].
//! Pure functions of (key, plaintext, associated data); callers provide key
//! material, so tests can use fixed keys.
//!
//! # Construction
//!
//! ```text
//! Root Key (32 bytes)
//!        │
//!        ▼
//! HKDF-SHA256 → MAC key, encryption key
//!        │
//!        ▼
//! HMAC-SHA256(aad, plaintext) → Synthetic IV (24 bytes)
//!        │
//!        ▼
//! XChaCha20-Poly1305(nonce = SIV) → Ciphertext
//! ```
//!
//! # Security
//!
//! Determinism:
//! - Same key, plaintext and associated data always give the same ciphertext
//! - Equal ciphertexts leak plaintext equality, which is the point of a
//!   deterministic scheme; nothing else is revealed
//!
//! Authenticity:
//! - Poly1305 tag covers ciphertext and associated data
//! - Recomputed synthetic IV is compared in constant time after decryption
//! - Any failure -> [`rotseal_core::DaeadError::DecryptionFailed`]
//!
//! Key Hygiene:
//! - Root keys and derived sub-keys are zeroized on drop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod key;
mod siv;

pub use error::CryptoError;
pub use key::{KEY_SIZE, SivKey};
pub use siv::{SIV_SIZE, XChaChaSiv};
