//! Fuzz target for key set dispatch
//!
//! Drives a dispatcher built from arbitrary key layouts with arbitrary
//! ciphertexts and round-trips.
//!
//! # Strategy
//!
//! - Arbitrary mix of Tink, Legacy and Raw keys, with colliding key ids
//! - Arbitrary primary choice
//! - Arbitrary ciphertext bytes (shorter than, equal to, longer than prefix)
//! - Encrypt/decrypt with single byte corruption
//!
//! # Invariants
//!
//! - Decrypt never panics on arbitrary input
//! - Every decrypt failure is the generic `DecryptionFailed`
//! - Encrypt/decrypt roundtrip succeeds for every primary
//! - Output starts with the primary identifier
//! - Corrupted ciphertext fails decryption

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rotseal_core::{
    DaeadError, DeterministicAead, Dispatcher, KeyInfo, KeySetBuilder, KeySetConfig, OutputPrefix,
};
use rotseal_crypto::{SivKey, XChaChaSiv, KEY_SIZE};

#[derive(Debug, Clone, Arbitrary)]
struct DispatchScenario {
    /// Keys in insertion order (capped at 8)
    keys: Vec<FuzzKey>,
    /// Index of the primary, reduced modulo key count
    primary: u8,
    /// Arbitrary bytes fed straight to decrypt
    ciphertext: Vec<u8>,
    /// Plaintext for the roundtrip check
    plaintext: Vec<u8>,
    /// Associated data for both checks
    associated_data: Vec<u8>,
    /// Byte to corrupt after encryption (position, xor mask)
    corruption: Option<(u16, u8)>,
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzKey {
    /// Seed byte for the root key
    seed: u8,
    /// Key id, taken modulo 4 to force collisions
    key_id: u8,
    prefix: FuzzPrefix,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum FuzzPrefix {
    Tink,
    Legacy,
    Raw,
}

impl From<FuzzPrefix> for OutputPrefix {
    fn from(prefix: FuzzPrefix) -> Self {
        match prefix {
            FuzzPrefix::Tink => OutputPrefix::Tink,
            FuzzPrefix::Legacy => OutputPrefix::Legacy,
            FuzzPrefix::Raw => OutputPrefix::Raw,
        }
    }
}

fuzz_target!(|scenario: DispatchScenario| {
    if scenario.keys.is_empty() {
        return;
    }
    let keys = &scenario.keys[..scenario.keys.len().min(8)];
    let primary = usize::from(scenario.primary) % keys.len();

    let mut builder = KeySetBuilder::new(KeySetConfig::default());
    for (i, key) in keys.iter().enumerate() {
        let primitive = XChaChaSiv::new(&SivKey::new([key.seed; KEY_SIZE]));
        let info = KeyInfo::enabled(u32::from(key.key_id % 4), key.prefix.into());
        builder = if i == primary {
            builder.add_primary_key(primitive, info)
        } else {
            builder.add_key(primitive, info)
        };
    }
    let dispatcher = Dispatcher::new(builder.build().expect("valid key set"));
    let aad = scenario.associated_data.as_slice();

    // INVARIANT 1: Arbitrary ciphertext never panics, and failure is generic
    if let Err(err) = dispatcher.decrypt(&scenario.ciphertext, aad) {
        assert_eq!(err, DaeadError::DecryptionFailed, "decrypt failures must be generic");
    }

    // INVARIANT 2: Roundtrip with the primary
    let ciphertext = dispatcher.encrypt(&scenario.plaintext, aad).expect("encrypt");
    let decrypted = dispatcher.decrypt(&ciphertext, aad).expect("roundtrip decrypt");
    assert_eq!(decrypted, scenario.plaintext, "roundtrip must recover plaintext");

    // INVARIANT 3: Output starts with the primary identifier
    let identifier = dispatcher.keyset().primary().identifier();
    assert!(ciphertext.starts_with(identifier), "ciphertext must carry primary identifier");

    // INVARIANT 4: Corruption is detected (unless it lands on an identical key)
    if let Some((position, mask)) = scenario.corruption {
        if mask != 0 {
            let mut corrupted = ciphertext.clone();
            let position = usize::from(position) % corrupted.len();
            corrupted[position] ^= mask;

            let same_material = keys.iter().filter(|k| k.seed == keys[primary].seed).count() > 1;
            if !same_material {
                assert_eq!(
                    dispatcher.decrypt(&corrupted, aad),
                    Err(DaeadError::DecryptionFailed),
                    "corrupted ciphertext must not decrypt"
                );
            }
        }
    }
});
