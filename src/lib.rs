//! An order-statistic character trie for Rust.
//!
//! This crate provides [`RankTrie`], an ordered map from letter keys to values
//! that answers "which key is N-th?" without walking the first N-1 keys, and
//! [`KvStore`], a byte-slice key-value store built on it:
//!
//! - [`get_by_rank`](RankTrie::get_by_rank) - Get the entry at a given sorted position
//! - [`remove_by_rank`](RankTrie::remove_by_rank) - Remove the entry at a given sorted position
//! - [`rank_of`](RankTrie::rank_of) - Get the sorted position of a key
//! - Indexing by [`Rank`] - e.g., `trie[Rank(1)]` for the first entry
//!
//! # Example
//!
//! ```
//! use ostrie::{KvStore, Rank, RankTrie};
//!
//! let mut store = KvStore::new();
//! store.put(b"apple", b"v2")?;
//! store.put(b"banana", b"v1")?;
//! store.put(b"cherry", b"v3")?;
//! store.put(b"Apple", b"v0")?;
//!
//! // Uppercase letters sort before lowercase ones.
//! assert_eq!(store.get_by_rank(1), Some((b"Apple".to_vec(), &b"v0"[..])));
//! assert_eq!(store.get_by_rank(4), Some((b"cherry".to_vec(), &b"v3"[..])));
//! assert_eq!(store.get_by_rank(5), None);
//!
//! // Ranks above a deleted one shift down.
//! assert!(store.delete_by_rank(1));
//! assert_eq!(store.get_by_rank(1), Some((b"apple".to_vec(), &b"v2"[..])));
//!
//! // The same operations on a generic trie.
//! let scores = RankTrie::try_from_iter([("Carol", 92), ("Alice", 100), ("Bob", 85)])?;
//! assert_eq!(scores[Rank(2)], 85);
//! assert_eq!(scores.rank_of("Carol")?, Some(3));
//! # Ok::<(), ostrie::Error>(())
//! ```
//!
//! # Implementation
//!
//! Every trie node stores its outgoing transitions in a small unbalanced
//! binary search tree keyed by letter, and counts the keys stored in its
//! subtree. Selecting rank N descends from the root, skipping sibling subtrees
//! whose counts fall wholly before N. Nodes and transition edges live in
//! arenas addressed by handles, so the structure is freed in bulk and holds no
//! reference-counted pointers.
//!
//! Neither type is internally synchronized.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod error;
mod label;
mod order_statistic;
mod raw;

pub mod kv_store;
pub mod rank_trie;

pub use config::{DEFAULT_MAX_LEN, MAX_INITIAL_CAPACITY, StoreConfig};
pub use error::{Error, Result};
pub use kv_store::KvStore;
pub use order_statistic::Rank;
pub use rank_trie::RankTrie;
