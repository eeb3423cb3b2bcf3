//! Key set configuration.

use crate::{error::ConfigError, identifier::TINK_PREFIX_SIZE};

/// Configuration shared by a key set and the dispatcher that wraps it.
///
/// The prefix size is owned by the external key-identification scheme. It is
/// passed in explicitly so the key set and the dispatcher agree on where the
/// identifier ends and the primitive output begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySetConfig {
    /// Length in bytes of every non-raw identifier
    pub prefix_size: usize,
}

impl KeySetConfig {
    /// Configuration with a custom prefix size.
    pub fn with_prefix_size(prefix_size: usize) -> Self {
        Self { prefix_size }
    }

    /// Checks that the configuration can describe non-raw keys at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix_size == 0 {
            return Err(ConfigError::InvalidPrefixSize(self.prefix_size));
        }
        Ok(())
    }
}

impl Default for KeySetConfig {
    fn default() -> Self {
        Self { prefix_size: TINK_PREFIX_SIZE }
    }
}
