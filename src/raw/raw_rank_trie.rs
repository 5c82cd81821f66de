use core::iter::once;

use smallvec::{SmallVec, smallvec};
use tracing::debug;

use super::arena::Arena;
use crate::config::MAX_INITIAL_CAPACITY;
use super::handle::Handle;
use super::node::TrieNode;
use super::transitions::{Edge, InOrder};

/// The core trie backing `RankTrie`.
#[derive(Clone, Debug)]
pub(crate) struct RawRankTrie<V> {
    /// Arena storing all trie nodes.
    nodes: Arena<TrieNode<V>>,
    /// Arena storing the transition BST nodes of every trie node.
    edges: Arena<Edge>,
    /// The node for the empty prefix. Always allocated.
    root: Handle,
    /// Detach transitions whose subtree no longer holds any key on erase.
    prune_empty: bool,
}

/// Path element recorded while descending.
#[derive(Clone, Copy, Debug)]
struct PathElement {
    /// Handle to the node at this level.
    node: Handle,
    /// Label of the transition followed out of `node`.
    label: u8,
}

/// Stack of path elements from the root down to (excluding) the target node.
type Path = SmallVec<[PathElement; 16]>;

impl<V> RawRankTrie<V> {
    /// Creates a trie holding only its root node.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a trie with room for `capacity` nodes before reallocating,
    /// clamped to what the arenas can address.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_INITIAL_CAPACITY).min(Handle::MAX);
        let mut nodes = Arena::with_capacity(capacity.max(1));
        let root = nodes.alloc(TrieNode::new());
        Self {
            nodes,
            edges: Arena::with_capacity(capacity.saturating_sub(1)),
            root,
            prune_empty: false,
        }
    }

    /// Number of keys stored.
    pub(crate) fn len(&self) -> usize {
        self.nodes.get(self.root).count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of trie nodes currently allocated, the root included.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn prune_empty(&self) -> bool {
        self.prune_empty
    }

    pub(crate) fn set_prune_empty(&mut self, prune_empty: bool) {
        self.prune_empty = prune_empty;
    }

    /// Drops every key and every node but a fresh root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.root = self.nodes.alloc(TrieNode::new());
    }

    /// Follows `key` one transition at a time.
    fn find(&self, key: &[u8]) -> Option<Handle> {
        let mut current = self.root;
        for &label in key {
            current = self.nodes.get(current).transitions().search(&self.edges, label)?;
        }
        Some(current)
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&V> {
        self.nodes.get(self.find(key)?).value()
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let handle = self.find(key)?;
        self.nodes.get_mut(handle).value_mut()
    }

    pub(crate) fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Returns the child of `node` under `label`, creating an empty node for
    /// it if the transition does not exist yet.
    fn child_or_insert(&mut self, node: Handle, label: u8) -> Handle {
        let mut transitions = self.nodes.get(node).transitions();
        let nodes = &mut self.nodes;
        let child = transitions.get_or_insert_with(&mut self.edges, label, || nodes.alloc(TrieNode::new()));
        self.nodes.get_mut(node).set_transitions(transitions);
        child
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// Every ancestor's count grows by one only when the key is new; an
    /// overwrite leaves all counts untouched.
    pub(crate) fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        let mut path = Path::new();
        let mut current = self.root;
        for &label in key {
            path.push(PathElement { node: current, label });
            current = self.child_or_insert(current, label);
        }

        let previous = self.nodes.get_mut(current).replace_value(value);
        if previous.is_none() {
            for elem in &path {
                self.nodes.get_mut(elem.node).increment_count();
            }
        }
        previous
    }

    /// Clears the value stored under `key` and returns it.
    ///
    /// Nodes are kept in place unless pruning is enabled.
    pub(crate) fn remove(&mut self, key: &[u8]) -> Option<V> {
        let mut path = Path::new();
        let mut current = self.root;
        for &label in key {
            let child = self.nodes.get(current).transitions().search(&self.edges, label)?;
            path.push(PathElement { node: current, label });
            current = child;
        }

        let value = self.nodes.get_mut(current).take_value()?;
        self.decrement_counts_along_path(&path);
        self.prune_along_path(&path, current);
        Some(value)
    }

    fn decrement_counts_along_path(&mut self, path: &Path) {
        for elem in path.iter().rev() {
            self.nodes.get_mut(elem.node).decrement_count();
        }
    }

    /// Detaches the shallowest subtree on `path` that holds no key.
    ///
    /// Counts never increase with depth, so everything below the detached
    /// edge is empty as well.
    fn prune_along_path(&mut self, path: &Path, target: Handle) {
        if !self.prune_empty {
            return;
        }

        let children = path.iter().skip(1).map(|elem| elem.node).chain(once(target));
        let Some((parent, child)) = path.iter().zip(children).find(|&(_, child)| self.nodes.get(child).count() == 0)
        else {
            return;
        };

        let mut transitions = self.nodes.get(parent.node).transitions();
        let detached = transitions.remove(&mut self.edges, parent.label);
        self.nodes.get_mut(parent.node).set_transitions(transitions);
        debug_assert_eq!(detached, Some(child), "pruned transition led to an unexpected node");

        let freed = self.free_subtree(child);
        debug!(label = %char::from(parent.label), freed, "pruned empty trie subtree");
    }

    /// Frees `subtree` and everything below it, returning the number of trie
    /// nodes released.
    fn free_subtree(&mut self, subtree: Handle) -> usize {
        let mut pending: SmallVec<[Handle; 16]> = smallvec![subtree];
        let mut freed = 0;
        while let Some(handle) = pending.pop() {
            let node = self.nodes.take(handle);
            node.transitions().release(&mut self.edges, &mut pending);
            freed += 1;
        }
        freed
    }

    /// Resolves the 1-based `rank` to the terminal node holding the key at
    /// that position, recording the descent in `path`.
    ///
    /// A node's own key sorts before every key below it, and children are
    /// visited in label order. Whole child subtrees are skipped by their
    /// count, so the walk never enumerates the keys it passes over.
    fn select(&self, rank: usize, path: &mut Path) -> Option<Handle> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut remaining = rank;
        let mut current = self.root;
        'descend: loop {
            let node = self.nodes.get(current);
            if node.is_terminal() {
                remaining -= 1;
                if remaining == 0 {
                    return Some(current);
                }
            }

            let mut skipped = 0;
            for edge in node.transitions().iter(&self.edges) {
                let count = self.nodes.get(edge.child()).count();
                if skipped + count < remaining {
                    skipped += count;
                    continue;
                }

                path.push(PathElement {
                    node: current,
                    label: edge.label(),
                });
                remaining -= skipped;
                current = edge.child();
                continue 'descend;
            }

            debug_assert!(
                skipped >= remaining,
                "select: subtree count invariant violated - rank {rank} not found ({skipped} of {remaining} skipped)"
            );
            return None;
        }
    }

    /// Returns the key and value at 1-based `rank` in key order.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(Vec<u8>, &V)> {
        let mut path = Path::new();
        let target = self.select(rank, &mut path)?;
        let value = self.nodes.get(target).value()?;
        Some((path.iter().map(|elem| elem.label).collect(), value))
    }

    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(Vec<u8>, &mut V)> {
        let mut path = Path::new();
        let target = self.select(rank, &mut path)?;
        let value = self.nodes.get_mut(target).value_mut()?;
        Some((path.iter().map(|elem| elem.label).collect(), value))
    }

    /// Removes the entry at 1-based `rank`.
    ///
    /// The rank is first resolved by a read-only select that records the path
    /// it takes. Only once it is known to land on a stored key are the counts
    /// decremented, by replaying that recorded path without searching again,
    /// so an out-of-range rank leaves the trie untouched.
    pub(crate) fn remove_by_rank(&mut self, rank: usize) -> Option<(Vec<u8>, V)> {
        let mut path = Path::new();
        let target = self.select(rank, &mut path)?;

        let value = self.nodes.get_mut(target).take_value()?;
        self.decrement_counts_along_path(&path);
        self.prune_along_path(&path, target);
        Some((path.iter().map(|elem| elem.label).collect(), value))
    }

    /// Returns the 1-based rank of `key`, or `None` if it is not stored.
    pub(crate) fn rank_of(&self, key: &[u8]) -> Option<usize> {
        let mut preceding = 0;
        let mut current = self.root;
        for &label in key {
            let node = self.nodes.get(current);
            if node.is_terminal() {
                preceding += 1;
            }

            let mut next = None;
            for edge in node.transitions().iter(&self.edges) {
                if edge.label() < label {
                    preceding += self.nodes.get(edge.child()).count();
                } else {
                    if edge.label() == label {
                        next = Some(edge.child());
                    }
                    break;
                }
            }
            current = next?;
        }

        self.nodes.get(current).is_terminal().then_some(preceding + 1)
    }

    pub(crate) fn iter(&self) -> RawIter<'_, V> {
        RawIter {
            trie: self,
            frames: SmallVec::new(),
            pending: Some(self.root),
            key: Vec::new(),
            remaining: self.len(),
        }
    }
}

impl<V> Default for RawRankTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first, pre-order walk yielding keys in rank order.
pub(crate) struct RawIter<'a, V> {
    trie: &'a RawRankTrie<V>,
    frames: SmallVec<[Frame<'a>; 16]>,
    /// Node reached by the last edge taken, not yet visited.
    pending: Option<Handle>,
    key: Vec<u8>,
    remaining: usize,
}

struct Frame<'a> {
    edges: InOrder<'a>,
    /// Length of the key spelled by the node this frame walks.
    depth: usize,
}

impl<'a, V> Iterator for RawIter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some(handle) = self.pending.take() {
                let trie = self.trie;
                let node = trie.nodes.get(handle);
                self.frames.push(Frame {
                    edges: node.transitions().iter(&trie.edges),
                    depth: self.key.len(),
                });
                if let Some(value) = node.value() {
                    self.remaining -= 1;
                    return Some((self.key.clone(), value));
                }
                continue;
            }

            let frame = self.frames.last_mut()?;
            match frame.edges.next() {
                Some(edge) => {
                    self.key.truncate(frame.depth);
                    self.key.push(edge.label());
                    self.pending = Some(edge.child());
                }
                None => {
                    self.frames.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for RawIter<'_, V> {}
