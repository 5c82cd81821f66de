//! Error types for trie and store operations.

/// Errors reported by [`RankTrie`](crate::RankTrie) and [`KvStore`](crate::KvStore).
///
/// An absent key or an out-of-range rank is not an error; those are
/// reported as `None` or `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A key contained a byte outside `A-Z` / `a-z`.
    #[error("key byte {byte:#04x} at position {position} is not an ASCII letter")]
    InvalidKeyByte {
        /// The offending byte.
        byte: u8,
        /// Its offset within the key.
        position: usize,
    },

    /// A key was longer than the store accepts.
    #[error("key is {len} bytes long, the limit is {max}")]
    KeyTooLong {
        /// Length of the rejected key.
        len: usize,
        /// Configured limit.
        max: usize,
    },

    /// A value was longer than the store accepts.
    #[error("value is {len} bytes long, the limit is {max}")]
    ValueTooLong {
        /// Length of the rejected value.
        len: usize,
        /// Configured limit.
        max: usize,
    },

    /// The key passed to a removal that requires it to exist was not stored.
    #[error("key not found")]
    KeyNotFound,

    /// Configuration failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for trie and store operations.
pub type Result<T> = core::result::Result<T, Error>;
