//! Immutable, identifier-indexed key sets.
//!
//! A [`KeySet`] is built once from caller-supplied entries and a primary
//! designation, validated, and never mutated afterwards.
//!
//! # Invariants
//!
//! - Exactly one primary entry exists
//! - Every entry appears exactly once: either in one identifier bucket or in
//!   the raw list
//! - Bucket order and raw order follow insertion order, which is the order
//!   decryption tries keys in
//! - Every non-raw identifier is exactly `prefix_size` bytes long

use std::{collections::HashMap, fmt};

use crate::{
    config::KeySetConfig,
    error::ConfigError,
    identifier::{Identifier, KeyStatus, OutputPrefix},
    primitive::DeterministicAead,
};

/// A primitive paired with the identifier it stamps on ciphertexts.
pub struct KeyEntry {
    primitive: Box<dyn DeterministicAead>,
    identifier: Identifier,
    key_id: Option<u32>,
    output_prefix: Option<OutputPrefix>,
}

impl KeyEntry {
    /// Entry with an explicit identifier. An empty identifier makes it raw.
    pub fn new(
        primitive: impl DeterministicAead + 'static,
        identifier: impl Into<Identifier>,
    ) -> Self {
        Self::from_boxed(Box::new(primitive), identifier.into())
    }

    fn from_boxed(primitive: Box<dyn DeterministicAead>, identifier: Identifier) -> Self {
        Self { primitive, identifier, key_id: None, output_prefix: None }
    }

    /// Raw entry: no prefix, found by trial decryption only.
    pub fn raw(primitive: impl DeterministicAead + 'static) -> Self {
        Self::new(primitive, Identifier::raw())
    }

    /// Entry whose identifier is derived from a numeric key id.
    pub fn from_key(
        primitive: impl DeterministicAead + 'static,
        key_id: u32,
        output_prefix: OutputPrefix,
    ) -> Self {
        Self {
            primitive: Box::new(primitive),
            identifier: output_prefix.identifier(key_id),
            key_id: Some(key_id),
            output_prefix: Some(output_prefix),
        }
    }

    /// The primitive this entry dispatches to.
    pub fn primitive(&self) -> &dyn DeterministicAead {
        self.primitive.as_ref()
    }

    /// Identifier bytes (empty for raw entries).
    pub fn identifier(&self) -> &[u8] {
        self.identifier.as_bytes()
    }

    /// True if ciphertexts from this entry carry no prefix.
    pub fn is_raw(&self) -> bool {
        self.identifier.is_raw()
    }

    /// Numeric key id, when the entry was created from one.
    pub fn key_id(&self) -> Option<u32> {
        self.key_id
    }

    /// Prefix type, when the entry was created from a key id.
    pub fn output_prefix(&self) -> Option<OutputPrefix> {
        self.output_prefix
    }
}

impl fmt::Debug for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEntry")
            .field("identifier", &self.identifier)
            .field("key_id", &self.key_id)
            .field("output_prefix", &self.output_prefix)
            .finish_non_exhaustive()
    }
}

/// Key management metadata for [`KeySetBuilder::add_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    /// Numeric key id
    pub key_id: u32,
    /// Lifecycle status; only enabled keys enter the set
    pub status: KeyStatus,
    /// How the key marks its ciphertexts
    pub output_prefix: OutputPrefix,
}

impl KeyInfo {
    /// Enabled key with the given id and prefix type.
    pub fn enabled(key_id: u32, output_prefix: OutputPrefix) -> Self {
        Self { key_id, status: KeyStatus::Enabled, output_prefix }
    }
}

/// Ordered, identifier-indexed collection of key entries with one primary.
pub struct KeySet {
    config: KeySetConfig,
    entries: Vec<KeyEntry>,
    primary: usize,
    /// Non-raw identifier -> entry indices, in insertion order
    by_identifier: HashMap<Vec<u8>, Vec<usize>>,
    /// Raw entry indices, in insertion order
    raw: Vec<usize>,
}

impl KeySet {
    /// Build a key set from `entries`, designating `entries[primary_index]`
    /// as primary.
    ///
    /// # Errors
    ///
    /// - `InvalidPrefixSize`: `config.prefix_size` is zero
    /// - `EmptyKeySet`: `entries` is empty
    /// - `PrimaryOutOfRange`: `primary_index` is not a valid index
    /// - `InvalidIdentifierLength`: a non-raw identifier is not
    ///   `config.prefix_size` bytes
    pub fn build(
        config: KeySetConfig,
        entries: Vec<KeyEntry>,
        primary_index: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if entries.is_empty() {
            return Err(ConfigError::EmptyKeySet);
        }

        if primary_index >= entries.len() {
            return Err(ConfigError::PrimaryOutOfRange {
                index: primary_index,
                len: entries.len(),
            });
        }

        let mut by_identifier: HashMap<Vec<u8>, Vec<usize>> = HashMap::new();
        let mut raw = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.is_raw() {
                raw.push(index);
                continue;
            }

            let actual = entry.identifier().len();
            if actual != config.prefix_size {
                return Err(ConfigError::InvalidIdentifierLength {
                    expected: config.prefix_size,
                    actual,
                });
            }

            by_identifier.entry(entry.identifier().to_vec()).or_default().push(index);
        }

        tracing::debug!(
            entries = entries.len(),
            raw = raw.len(),
            prefix_size = config.prefix_size,
            "key set built"
        );

        Ok(Self { config, entries, primary: primary_index, by_identifier, raw })
    }

    /// The entry used for every encryption.
    pub fn primary(&self) -> &KeyEntry {
        &self.entries[self.primary]
    }

    /// Position of the primary entry in [`Self::entries`].
    pub fn primary_index(&self) -> usize {
        self.primary
    }

    /// Entries whose identifier equals `identifier`, in insertion order.
    ///
    /// Raw entries are never returned; see [`Self::raw_entries`].
    pub fn lookup<'a>(
        &'a self,
        identifier: &[u8],
    ) -> impl Iterator<Item = &'a KeyEntry> + use<'a> {
        let indices = self.by_identifier.get(identifier).map_or(&[][..], Vec::as_slice);
        indices.iter().map(|&index| &self.entries[index])
    }

    /// All raw entries, in insertion order.
    pub fn raw_entries(&self) -> impl Iterator<Item = &KeyEntry> + '_ {
        self.raw.iter().map(|&index| &self.entries[index])
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a built key set has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of non-raw identifiers in this set.
    pub fn prefix_size(&self) -> usize {
        self.config.prefix_size
    }

    /// Configuration the set was built with.
    pub fn config(&self) -> &KeySetConfig {
        &self.config
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("prefix_size", &self.config.prefix_size)
            .field("entries", &self.entries)
            .field("primary", &self.primary)
            .finish_non_exhaustive()
    }
}

/// Incremental key set construction for key management code.
///
/// Errors are deferred: the first one recorded is returned by
/// [`Self::build`].
#[derive(Debug)]
pub struct KeySetBuilder {
    config: KeySetConfig,
    entries: Vec<KeyEntry>,
    primary: Option<usize>,
    error: Option<ConfigError>,
}

impl KeySetBuilder {
    /// Empty builder.
    pub fn new(config: KeySetConfig) -> Self {
        Self { config, entries: Vec::new(), primary: None, error: None }
    }

    /// Append a non-primary entry.
    #[must_use]
    pub fn add_entry(mut self, entry: KeyEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Append an entry and designate it primary.
    #[must_use]
    pub fn add_primary_entry(mut self, entry: KeyEntry) -> Self {
        if self.primary.is_some() {
            self.error.get_or_insert(ConfigError::MultiplePrimaries);
            return self;
        }
        self.primary = Some(self.entries.len());
        self.entries.push(entry);
        self
    }

    /// Append a key described by key management metadata.
    ///
    /// Keys that are not enabled are skipped.
    #[must_use]
    pub fn add_key(self, primitive: impl DeterministicAead + 'static, info: KeyInfo) -> Self {
        if info.status != KeyStatus::Enabled {
            tracing::debug!(key_id = info.key_id, status = ?info.status, "skipping key");
            return self;
        }
        self.add_entry(KeyEntry::from_key(primitive, info.key_id, info.output_prefix))
    }

    /// Append a key described by key management metadata as primary.
    #[must_use]
    pub fn add_primary_key(
        mut self,
        primitive: impl DeterministicAead + 'static,
        info: KeyInfo,
    ) -> Self {
        if info.status != KeyStatus::Enabled {
            self.error.get_or_insert(ConfigError::PrimaryNotEnabled { key_id: info.key_id });
            return self;
        }
        self.add_primary_entry(KeyEntry::from_key(primitive, info.key_id, info.output_prefix))
    }

    /// Validate and build the key set.
    pub fn build(self) -> Result<KeySet, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let Some(primary) = self.primary else {
            if self.entries.is_empty() {
                return Err(ConfigError::EmptyKeySet);
            }
            return Err(ConfigError::MissingPrimary);
        };

        KeySet::build(self.config, self.entries, primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TagAead;

    fn config() -> KeySetConfig {
        KeySetConfig::with_prefix_size(1)
    }

    fn ids<'a>(entries: impl Iterator<Item = &'a KeyEntry>) -> Vec<Vec<u8>> {
        entries.map(|e| e.identifier().to_vec()).collect()
    }

    #[test]
    fn build_rejects_empty() {
        let result = KeySet::build(config(), Vec::new(), 0);
        assert_eq!(result.unwrap_err(), ConfigError::EmptyKeySet);
    }

    #[test]
    fn build_rejects_primary_out_of_range() {
        let entries = vec![KeyEntry::new(TagAead::new(1), [0x01])];
        let result = KeySet::build(config(), entries, 1);
        assert_eq!(result.unwrap_err(), ConfigError::PrimaryOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn build_rejects_wrong_identifier_length() {
        let entries = vec![KeyEntry::new(TagAead::new(1), [0x01, 0x02])];
        let result = KeySet::build(config(), entries, 0);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidIdentifierLength { expected: 1, actual: 2 }
        );
    }

    #[test]
    fn build_rejects_zero_prefix_size() {
        let entries = vec![KeyEntry::raw(TagAead::new(1))];
        let result = KeySet::build(KeySetConfig::with_prefix_size(0), entries, 0);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPrefixSize(0));
    }

    #[test]
    fn primary_is_designated_entry() {
        let entries = vec![
            KeyEntry::new(TagAead::new(1), [0x01]),
            KeyEntry::new(TagAead::new(2), [0x02]),
        ];
        let keyset = KeySet::build(config(), entries, 1).unwrap();

        assert_eq!(keyset.primary().identifier(), &[0x02]);
        assert_eq!(keyset.primary_index(), 1);
        assert_eq!(keyset.len(), 2);
        assert!(!keyset.is_empty());
    }

    #[test]
    fn lookup_preserves_insertion_order() {
        let entries = vec![
            KeyEntry::new(TagAead::new(1), [0x07]),
            KeyEntry::raw(TagAead::new(2)),
            KeyEntry::new(TagAead::new(3), [0x07]),
            KeyEntry::new(TagAead::new(4), [0x08]),
        ];
        let keyset = KeySet::build(config(), entries, 0).unwrap();

        let bucket: Vec<&KeyEntry> = keyset.lookup(&[0x07]).collect();
        assert_eq!(bucket.len(), 2);
        assert!(std::ptr::eq(bucket[0], &keyset.entries()[0]));
        assert!(std::ptr::eq(bucket[1], &keyset.entries()[2]));

        assert_eq!(ids(keyset.lookup(&[0x08])), vec![vec![0x08]]);
        assert_eq!(keyset.lookup(&[0x09]).count(), 0);
    }

    #[test]
    fn raw_entries_are_not_in_lookup() {
        let entries = vec![
            KeyEntry::raw(TagAead::new(1)),
            KeyEntry::new(TagAead::new(2), [0x02]),
            KeyEntry::raw(TagAead::new(3)),
        ];
        let keyset = KeySet::build(config(), entries, 1).unwrap();

        assert_eq!(keyset.raw_entries().count(), 2);
        assert!(keyset.raw_entries().all(KeyEntry::is_raw));
        assert_eq!(keyset.lookup(&[]).count(), 0);
    }

    #[test]
    fn raw_entries_preserve_insertion_order() {
        let entries = vec![
            KeyEntry::raw(TagAead::new(1)),
            KeyEntry::new(TagAead::new(2), [0x02]),
            KeyEntry::raw(TagAead::new(3)),
            KeyEntry::raw(TagAead::new(4)),
        ];
        let keyset = KeySet::build(config(), entries, 1).unwrap();

        let raw: Vec<&KeyEntry> = keyset.raw_entries().collect();
        assert_eq!(raw.len(), 3);
        assert!(std::ptr::eq(raw[0], &keyset.entries()[0]));
        assert!(std::ptr::eq(raw[1], &keyset.entries()[2]));
        assert!(std::ptr::eq(raw[2], &keyset.entries()[3]));
    }

    #[test]
    fn keeps_build_config() {
        let keyset =
            KeySet::build(KeySetConfig::default(), vec![KeyEntry::raw(TagAead::new(1))], 0)
                .unwrap();

        assert_eq!(*keyset.config(), KeySetConfig::default());
        assert_eq!(keyset.prefix_size(), keyset.config().prefix_size);
    }

    #[test]
    fn every_entry_indexed_exactly_once() {
        let entries = vec![
            KeyEntry::new(TagAead::new(1), [0x01]),
            KeyEntry::raw(TagAead::new(2)),
            KeyEntry::new(TagAead::new(3), [0x01]),
            KeyEntry::new(TagAead::new(4), [0x02]),
            KeyEntry::raw(TagAead::new(5)),
        ];
        let keyset = KeySet::build(config(), entries, 0).unwrap();

        let bucketed = keyset.lookup(&[0x01]).count() + keyset.lookup(&[0x02]).count();
        assert_eq!(bucketed + keyset.raw_entries().count(), keyset.len());
    }

    #[test]
    fn builder_requires_primary() {
        let result =
            KeySetBuilder::new(config()).add_entry(KeyEntry::raw(TagAead::new(1))).build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingPrimary);

        let result = KeySetBuilder::new(config()).build();
        assert_eq!(result.unwrap_err(), ConfigError::EmptyKeySet);
    }

    #[test]
    fn builder_rejects_second_primary() {
        let result = KeySetBuilder::new(config())
            .add_primary_entry(KeyEntry::new(TagAead::new(1), [0x01]))
            .add_primary_entry(KeyEntry::new(TagAead::new(2), [0x02]))
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MultiplePrimaries);
    }

    #[test]
    fn builder_skips_disabled_keys() {
        let keyset = KeySetBuilder::new(KeySetConfig::default())
            .add_key(TagAead::new(1), KeyInfo {
                key_id: 10,
                status: KeyStatus::Disabled,
                output_prefix: OutputPrefix::Tink,
            })
            .add_primary_key(TagAead::new(2), KeyInfo::enabled(11, OutputPrefix::Tink))
            .add_key(TagAead::new(3), KeyInfo {
                key_id: 12,
                status: KeyStatus::Destroyed,
                output_prefix: OutputPrefix::Raw,
            })
            .build()
            .unwrap();

        assert_eq!(keyset.len(), 1);
        assert_eq!(keyset.primary().key_id(), Some(11));
        assert_eq!(keyset.primary().output_prefix(), Some(OutputPrefix::Tink));
        assert_eq!(keyset.primary().identifier(), OutputPrefix::Tink.identifier(11).as_bytes());
    }

    #[test]
    fn builder_rejects_disabled_primary() {
        let result = KeySetBuilder::new(KeySetConfig::default())
            .add_key(TagAead::new(1), KeyInfo::enabled(1, OutputPrefix::Tink))
            .add_primary_key(TagAead::new(2), KeyInfo {
                key_id: 2,
                status: KeyStatus::Disabled,
                output_prefix: OutputPrefix::Tink,
            })
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::PrimaryNotEnabled { key_id: 2 });
    }

    #[test]
    fn debug_omits_primitive() {
        let keyset = KeySet::build(config(), vec![KeyEntry::new(TagAead::new(1), [0x01])], 0)
            .unwrap();
        let rendered = format!("{keyset:?}");
        assert!(rendered.contains("Identifier(01)"));
        assert!(!rendered.contains("primitive"));
    }
}
