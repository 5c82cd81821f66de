use core::ops::Index;

use super::RankTrie;
use crate::Rank;
use crate::error::Result;
use crate::label::validate_key;

impl<V> RankTrie<V> {
    /// Returns the key and value at position `rank` in key order.
    ///
    /// The rank is one-based. Returns `None` if `rank` is zero or greater
    /// than [`len`](RankTrie::len).
    ///
    /// # Complexity
    ///
    /// Proportional to the length of the returned key times the number of
    /// sibling transitions skipped on the way down; independent of `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let trie = RankTrie::try_from_iter([("cherry", 3), ("apple", 1), ("banana", 2)]).unwrap();
    ///
    /// assert_eq!(trie.get_by_rank(2), Some((b"banana".to_vec(), &2)));
    /// assert!(trie.get_by_rank(0).is_none());
    /// assert!(trie.get_by_rank(4).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(Vec<u8>, &V)> {
        self.raw.get_by_rank(rank)
    }

    /// Returns the key and a mutable reference to the value at position
    /// `rank` in key order.
    ///
    /// The rank is one-based. Returns `None` if it is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::try_from_iter([("b", 2), ("a", 1)]).unwrap();
    /// if let Some((key, value)) = trie.get_by_rank_mut(2) {
    ///     assert_eq!(key, b"b");
    ///     *value = 20;
    /// }
    /// assert_eq!(trie.get("b"), Ok(Some(&20)));
    /// ```
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(Vec<u8>, &mut V)> {
        self.raw.get_by_rank_mut(rank)
    }

    /// Removes the entry at position `rank` in key order and returns it.
    ///
    /// The rank is one-based. Every key after it moves down one rank. If
    /// `rank` is out of range, returns `None` and leaves the trie unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let mut trie = RankTrie::try_from_iter([("a", 1), ("b", 2), ("c", 3)]).unwrap();
    ///
    /// assert_eq!(trie.remove_by_rank(2), Some((b"b".to_vec(), 2)));
    /// assert_eq!(trie.get_by_rank(2), Some((b"c".to_vec(), &3)));
    /// assert_eq!(trie.remove_by_rank(3), None);
    /// assert_eq!(trie.len(), 2);
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<(Vec<u8>, V)> {
        self.raw.remove_by_rank(rank)
    }

    /// Returns the one-based rank of `key`, or `None` if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyByte`](crate::Error::InvalidKeyByte) if
    /// `key` contains a non-letter byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let trie = RankTrie::try_from_iter([("a", 1), ("ab", 2), ("B", 3)]).unwrap();
    ///
    /// assert_eq!(trie.rank_of("B"), Ok(Some(1)));
    /// assert_eq!(trie.rank_of("ab"), Ok(Some(3)));
    /// assert_eq!(trie.rank_of("b"), Ok(None));
    /// ```
    pub fn rank_of(&self, key: impl AsRef<[u8]>) -> Result<Option<usize>> {
        let key = key.as_ref();
        validate_key(key)?;
        Ok(self.raw.rank_of(key))
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(Vec<u8>, &V)> {
        self.get_by_rank(1)
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(Vec<u8>, &V)> {
        self.get_by_rank(self.len())
    }
}

/// Indexes into the trie by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use ostrie::{Rank, RankTrie};
///
/// let trie = RankTrie::try_from_iter([("b", 2), ("a", 1)]).unwrap();
/// assert_eq!(trie[Rank(2)], 2);
/// ```
impl<V> Index<Rank> for RankTrie<V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("rank out of bounds")
    }
}
