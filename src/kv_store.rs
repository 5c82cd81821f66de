//! A byte-slice key-value store with rank-based access.

use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::rank_trie::RankTrie;

/// A key-value store over byte slices with lookup and deletion by rank.
///
/// Keys are ASCII letters only; values are arbitrary bytes. Both are bounded
/// by the lengths in [`StoreConfig`] (255 bytes each by default) and
/// rejected with an error when longer, never truncated. Values are copied in
/// on [`put`](KvStore::put), and [`get`](KvStore::get) borrows the stored
/// copy.
///
/// # Examples
///
/// ```
/// use ostrie::KvStore;
///
/// let mut store = KvStore::new();
/// assert!(!store.put(b"apple", b"v2")?);
/// assert!(!store.put(b"Apple", b"v0")?);
///
/// assert_eq!(store.get(b"apple")?, Some(&b"v2"[..]));
/// assert_eq!(store.get_by_rank(1), Some((b"Apple".to_vec(), &b"v0"[..])));
///
/// assert!(store.delete_by_rank(1));
/// assert_eq!(store.get(b"Apple")?, None);
/// # Ok::<(), ostrie::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct KvStore {
    trie: RankTrie<Box<[u8]>>,
    config: StoreConfig,
}

impl Default for KvStore {
    fn default() -> Self {
        KvStore::new()
    }
}

impl KvStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Creates an empty store with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        let mut trie = RankTrie::with_capacity(config.initial_capacity);
        trie.set_prune_empty_nodes(config.prune_empty_nodes);
        debug!(
            max_key_len = config.max_key_len,
            max_value_len = config.max_value_len,
            initial_capacity = config.initial_capacity,
            prune_empty_nodes = config.prune_empty_nodes,
            "created key-value store"
        );
        KvStore { trie, config }
    }

    /// Returns the configuration this store was built with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Returns `true` if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        debug!(len = self.trie.len(), "clearing key-value store");
        self.trie.clear();
    }

    fn check_key(&self, key: &[u8]) -> Result<()> {
        let max = self.config.max_key_len;
        if key.len() > max {
            return Err(rejected(Error::KeyTooLong { len: key.len(), max }));
        }
        Ok(())
    }

    fn check_value(&self, value: &[u8]) -> Result<()> {
        let max = self.config.max_value_len;
        if value.len() > max {
            return Err(rejected(Error::ValueTooLong { len: value.len(), max }));
        }
        Ok(())
    }

    /// Returns the value stored under `key`.
    ///
    /// The slice borrows the store's copy and lives until the store is next
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyTooLong`] or [`Error::InvalidKeyByte`] for a key
    /// the store could never hold.
    pub fn get(&self, key: &[u8]) -> Result<Option<&[u8]>> {
        self.check_key(key)?;
        let value = self.trie.get(key).map_err(rejected)?.map(|value| &value[..]);
        trace!(key_len = key.len(), found = value.is_some(), "get");
        Ok(value)
    }

    /// Stores a copy of `value` under `key`. Returns `true` if an existing
    /// value was overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyTooLong`], [`Error::ValueTooLong`] or
    /// [`Error::InvalidKeyByte`]. The store is unchanged on error.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        self.check_key(key)?;
        self.check_value(value)?;
        let overwrote = self.trie.insert(key, Box::from(value)).map_err(rejected)?.is_some();
        trace!(key_len = key.len(), value_len = value.len(), overwrote, "put");
        Ok(overwrote)
    }

    /// Deletes `key`. Returns `true` if it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyTooLong`] or [`Error::InvalidKeyByte`].
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        self.check_key(key)?;
        let existed = self.trie.remove(key).map_err(rejected)?.is_some();
        trace!(key_len = key.len(), existed, "delete");
        Ok(existed)
    }

    /// Deletes a key the caller knows to be stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not stored, besides the
    /// input errors of [`delete`](KvStore::delete).
    pub fn delete_existing(&mut self, key: &[u8]) -> Result<()> {
        if self.delete(key)? { Ok(()) } else { Err(Error::KeyNotFound) }
    }

    /// Returns the key and value at one-based position `rank` in key order,
    /// or `None` if `rank` is zero or past the last key.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(Vec<u8>, &[u8])> {
        let entry = self.trie.get_by_rank(rank).map(|(key, value)| (key, &value[..]));
        trace!(rank, found = entry.is_some(), "get_by_rank");
        entry
    }

    /// Deletes the entry at one-based position `rank` in key order. Returns
    /// `true` if there was one; an out-of-range rank changes nothing.
    pub fn delete_by_rank(&mut self, rank: usize) -> bool {
        let existed = self.trie.remove_by_rank(rank).is_some();
        trace!(rank, existed, "delete_by_rank");
        existed
    }

    /// Returns the one-based rank of `key`, or `None` if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyTooLong`] or [`Error::InvalidKeyByte`].
    pub fn rank_of(&self, key: &[u8]) -> Result<Option<usize>> {
        self.check_key(key)?;
        self.trie.rank_of(key).map_err(rejected)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Vec<u8>, &[u8])> {
        self.trie.iter().map(|(key, value)| (key, &value[..]))
    }
}

fn rejected(error: Error) -> Error {
    debug!(%error, "rejected input");
    error
}
