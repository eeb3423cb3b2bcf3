//! Rotseal Core
//!
//! Key-rotation-aware dispatch for deterministic AEAD. A [`KeySet`] holds
//! every key that may still have live ciphertexts; a [`Dispatcher`] turns it
//! into one [`DeterministicAead`] that encrypts with the primary key and
//! decrypts with whichever key matches.
//!
//! # Wire Format
//!
//! ```text
//! ciphertext = identifier (0 or prefix_size bytes) || primitive output
//! ```
//!
//! Non-raw keys stamp their identifier, so decryption can jump straight to
//! the right bucket. Raw keys stamp nothing and are found by trial.
//!
//! ```text
//! decrypt(ct)
//!   │
//!   ├─ len(ct) > prefix_size ──► lookup(ct[..prefix_size]) ──► try ct[prefix_size..]
//!   │                                                            │ first success
//!   ▼ no match                                                   ▼
//! raw_entries() ──► try full ct ──────────────────────────────► plaintext
//!   │
//!   ▼ nothing decrypted
//! DecryptionFailed
//! ```
//!
//! # Security
//!
//! - Encryption never uses a key other than the primary
//! - Decrypt failures are a single generic error, so the dispatcher is not an
//!   oracle for which key or which phase failed
//! - Key sets are immutable after construction; a [`Dispatcher`] is `Send +
//!   Sync` and may be shared across threads without locking
//!
//! The primitives themselves are supplied by the caller through the
//! [`DeterministicAead`] trait.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod identifier;
mod keyset;
mod primitive;

#[cfg(test)]
mod testing;

pub use config::KeySetConfig;
pub use dispatcher::Dispatcher;
pub use error::{ConfigError, DaeadError};
pub use identifier::{Identifier, KeyStatus, OutputPrefix, TINK_PREFIX_SIZE};
pub use keyset::{KeyEntry, KeyInfo, KeySet, KeySetBuilder};
pub use primitive::DeterministicAead;
