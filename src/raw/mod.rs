mod arena;
mod handle;
mod node;
mod raw_rank_trie;
mod transitions;

pub(crate) use raw_rank_trie::{RawIter, RawRankTrie};
