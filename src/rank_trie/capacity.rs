use super::RankTrie;
use crate::raw::RawRankTrie;

impl<V> RankTrie<V> {
    /// Creates an empty trie with room for at least `capacity` trie nodes.
    ///
    /// `capacity` is a hint and is clamped to
    /// [`MAX_INITIAL_CAPACITY`](crate::MAX_INITIAL_CAPACITY).
    ///
    /// A key of length `n` needs at most `n` new nodes, fewer when it shares
    /// a prefix with keys already stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostrie::RankTrie;
    ///
    /// let trie: RankTrie<u32> = RankTrie::with_capacity(64);
    /// assert!(trie.is_empty());
    /// assert!(trie.capacity() >= 64);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RankTrie {
            raw: RawRankTrie::with_capacity(capacity),
        }
    }

    /// Returns the number of trie nodes the trie can hold without
    /// reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
