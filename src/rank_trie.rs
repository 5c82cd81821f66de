use core::fmt;
use core::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::label::validate_key;
use crate::raw::{RawIter, RawRankTrie};

mod capacity;
mod order_statistic;

/// An ordered map from letter keys to values, backed by a character trie
/// that can find the key at any rank without enumerating the keys before it.
///
/// Keys are byte strings over `A-Z` and `a-z`; any other byte is rejected
/// with [`Error::InvalidKeyByte`]. Keys are ordered by byte value, so
/// uppercase letters sort before lowercase ones and a key sorts before every
/// key it is a prefix of: `"Apple" < "apple" < "applesauce" < "banana"`.
///
/// # Structure
///
/// Each trie node owns an unbalanced binary search tree of its outgoing
/// transitions, so a node pays only for the letters that actually follow it.
/// Each node also counts the keys stored in its subtree. Rank queries walk
/// down from the root, skipping whole sibling subtrees by their counts, so
/// they cost time proportional to the key length times the branching actually
/// scanned at each level, independent of the number of keys stored.
///
/// Deleting a key clears its value but leaves its nodes in place, so the same
/// key can be re-inserted without allocating. Call
/// [`set_prune_empty_nodes`](RankTrie::set_prune_empty_nodes) to free empty
/// branches instead.
///
/// # Examples
///
/// ```
/// use ostrie::RankTrie;
///
/// let mut fruit = RankTrie::new();
/// fruit.insert(b"banana", 1)?;
/// fruit.insert(b"apple", 2)?;
/// fruit.insert(b"Apple", 3)?;
///
/// assert_eq!(fruit.get(b"apple")?, Some(&2));
/// assert_eq!(fruit.get_by_rank(1), Some((b"Apple".to_vec(), &3)));
/// assert_eq!(fruit.rank_of(b"banana")?, Some(3));
///
/// assert_eq!(fruit.remove_by_rank(1), Some((b"Apple".to_vec(), 3)));
/// assert_eq!(fruit.len(), 2);
/// # Ok::<(), ostrie::Error>(())
/// ```
///
/// The trie is not internally synchronized; share it across threads behind a
/// lock.
pub struct RankTrie<V> {
    raw: RawRankTrie<V>,
}

/// An iterator over the entries of a `RankTrie`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`RankTrie`]. Keys are
/// rebuilt from the trie path, so each one is returned as an owned `Vec<u8>`.
///
/// [`iter`]: RankTrie::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, V> {
    inner: RawIter<'a, V>,
}

/// An iterator over the keys of a `RankTrie`, in order.
///
/// This `struct` is created by the [`keys`] method on [`RankTrie`].
///
/// [`keys`]: RankTrie::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

/// An iterator over the values of a `RankTrie`, in key order.
///
/// This `struct` is created by the [`values`] method on [`RankTrie`].
///
/// [`values`]: RankTrie::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> RankTrie<V> {
    /// Makes a new, empty `RankTrie`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::new();
    /// trie.insert(b"a", "first").unwrap();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        RankTrie { raw: RawRankTrie::new() }
    }

    /// Builds a trie from key-value pairs, stopping at the first invalid key.
    ///
    /// Later pairs overwrite earlier ones with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] for the first key that contains a
    /// non-letter byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let trie = RankTrie::try_from_iter([("b", 2), ("a", 1)]).unwrap();
    /// assert_eq!(trie.keys().collect::<Vec<_>>(), [b"a".to_vec(), b"b".to_vec()]);
    ///
    /// assert!(RankTrie::try_from_iter([("ok", 1), ("not ok", 2)]).is_err());
    /// ```
    pub fn try_from_iter<K, I>(iter: I) -> Result<Self>
    where
        K: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut trie = RankTrie::new();
        for (key, value) in iter {
            trie.insert(key, value)?;
        }
        Ok(trie)
    }

    /// Returns the number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key and frees all trie nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of trie nodes allocated, including the root and any
    /// nodes left behind by deleted keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::new();
    /// trie.insert(b"ab", ()).unwrap();
    /// trie.insert(b"ac", ()).unwrap();
    /// assert_eq!(trie.node_count(), 4);
    /// ```
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Returns whether deletes free branches that no longer lead to a key.
    #[must_use]
    pub fn prune_empty_nodes(&self) -> bool {
        self.raw.prune_empty()
    }

    /// Sets whether deletes free branches that no longer lead to a key.
    ///
    /// Only deletes made after the call are affected; branches already left
    /// empty stay allocated. Pruning never changes which keys are stored or
    /// their order.
    pub fn set_prune_empty_nodes(&mut self, prune: bool) {
        self.raw.set_prune_empty(prune);
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] if `key` contains a non-letter byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::new();
    /// trie.insert("key", 1).unwrap();
    /// assert_eq!(trie.get("key"), Ok(Some(&1)));
    /// assert_eq!(trie.get("ke"), Ok(None));
    /// assert!(trie.get("k3y").is_err());
    /// ```
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<&V>> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.get(key))
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] if `key` contains a non-letter byte.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Result<Option<&mut V>> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.get_mut(key))
    }

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] if `key` contains a non-letter byte.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.contains_key(key))
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] if `key` contains a non-letter byte.
    /// Nothing is inserted in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::new();
    /// assert_eq!(trie.insert(b"k", 1), Ok(None));
    /// assert_eq!(trie.insert(b"k", 2), Ok(Some(1)));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<Option<V>> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.insert(key, value))
    }

    /// Removes `key`, returning its value if it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`] if `key` contains a non-letter byte.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Result<Option<V>> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.remove(key))
    }

    /// Removes a key that the caller expects to be stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not stored, or
    /// [`Error::InvalidKeyByte`] if it contains a non-letter byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::{Error, RankTrie};
    ///
    /// let mut trie = RankTrie::new();
    /// trie.insert(b"k", 1).unwrap();
    /// assert_eq!(trie.remove_existing(b"k"), Ok(1));
    /// assert_eq!(trie.remove_existing(b"k"), Err(Error::KeyNotFound));
    /// ```
    pub fn remove_existing(&mut self, key: impl AsRef<[u8]>) -> Result<V> {
        self.remove(key)?.ok_or(Error::KeyNotFound)
    }

    /// Gets an iterator over the entries of the trie, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let trie = RankTrie::try_from_iter([("ab", 2), ("a", 1), ("B", 0)]).unwrap();
    /// let entries: Vec<_> = trie.iter().collect();
    /// assert_eq!(entries, [(b"B".to_vec(), &0), (b"a".to_vec(), &1), (b"ab".to_vec(), &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets an iterator over the keys of the trie, in order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the trie, in key order.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }
}

impl<V: Clone> Clone for RankTrie<V> {
    fn clone(&self) -> Self {
        RankTrie { raw: self.raw.clone() }
    }
}

impl<V: fmt::Debug> fmt::Debug for RankTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (String::from_utf8_lossy(&key).into_owned(), value)))
            .finish()
    }
}

impl<V> Default for RankTrie<V> {
    fn default() -> Self {
        RankTrie::new()
    }
}

impl<V: PartialEq> PartialEq for RankTrie<V> {
    fn eq(&self, other: &RankTrie<V>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for RankTrie<V> {}

impl<'a, V> IntoIterator for &'a RankTrie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Iterator for Keys<'_, V> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}
