/// A one-based rank into the key order of a [`RankTrie`](crate::RankTrie).
///
/// `Rank(1)` is the smallest key. Keys compare byte by byte, so every key
/// starting with an uppercase letter ranks before every key starting with a
/// lowercase one, and a key ranks before all keys it is a prefix of.
///
/// # Examples
///
/// ```
/// use ostrie::{RankTrie, Rank};
///
/// let mut trie = RankTrie::new();
/// trie.insert(b"b", 20).unwrap();
/// trie.insert(b"a", 10).unwrap();
///
/// assert_eq!(trie[Rank(1)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
