use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;

/// One labeled edge of a trie node, stored as a node of that node's
/// unbalanced binary search tree of outgoing transitions.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Edge {
    label: u8,
    /// Trie node reached by following `label`.
    child: Handle,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl Edge {
    const fn new(label: u8, child: Handle) -> Self {
        Self {
            label,
            child,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn label(&self) -> u8 {
        self.label
    }

    #[inline]
    pub(crate) const fn child(&self) -> Handle {
        self.child
    }
}

/// The transition index of a single trie node.
///
/// Edges live in a shared [`Arena`] owned by the trie; a `Transitions` only
/// records the root of its BST, so it is `Copy` and can be read out of a node
/// while the arenas are mutated. Labels are ordered by their byte value, which
/// puts every uppercase letter before every lowercase one.
///
/// The tree is never rebalanced.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Transitions {
    root: Option<Handle>,
}

impl Transitions {
    pub(crate) const fn new() -> Self {
        Self { root: None }
    }

    /// Root of the BST, for callers that walk it themselves.
    #[inline]
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns the child reached by `label`, if the edge exists.
    pub(crate) fn search(&self, edges: &Arena<Edge>, label: u8) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let edge = edges.get(handle);
            current = match label.cmp(&edge.label) {
                Ordering::Less => edge.left,
                Ordering::Greater => edge.right,
                Ordering::Equal => return Some(edge.child),
            };
        }
        None
    }

    /// Returns the child reached by `label`, attaching the node produced by
    /// `make_child` under a new edge if there is none yet.
    ///
    /// `make_child` runs at most once, and only when the edge is created.
    pub(crate) fn get_or_insert_with(
        &mut self,
        edges: &mut Arena<Edge>,
        label: u8,
        make_child: impl FnOnce() -> Handle,
    ) -> Handle {
        let Some(mut current) = self.root else {
            let child = make_child();
            self.root = Some(edges.alloc(Edge::new(label, child)));
            return child;
        };

        loop {
            let edge = edges.get(current);
            let next = match label.cmp(&edge.label) {
                Ordering::Less => edge.left,
                Ordering::Greater => edge.right,
                Ordering::Equal => return edge.child,
            };

            match next {
                Some(handle) => current = handle,
                None => {
                    let child = make_child();
                    let inserted = edges.alloc(Edge::new(label, child));
                    let parent = edges.get_mut(current);
                    if label < parent.label {
                        parent.left = Some(inserted);
                    } else {
                        parent.right = Some(inserted);
                    }
                    return child;
                }
            }
        }
    }

    /// Detaches the edge labeled `label` and returns the child it led to.
    ///
    /// Only that one edge leaves the BST; its left and right siblings are
    /// relinked through the in-order successor. The returned child subtree is
    /// still allocated and must be freed by the caller.
    pub(crate) fn remove(&mut self, edges: &mut Arena<Edge>, label: u8) -> Option<Handle> {
        let mut removed = None;
        self.root = remove_from(edges, self.root, label, &mut removed);
        removed
    }

    /// Frees every edge of this index, handing each child it led to over to
    /// `children` so the caller can free the trie nodes in turn.
    pub(crate) fn release(self, edges: &mut Arena<Edge>, children: &mut impl Extend<Handle>) {
        let mut pending: SmallVec<[Handle; 8]> = self.root.into_iter().collect();
        while let Some(handle) = pending.pop() {
            let edge = edges.take(handle);
            children.extend(Some(edge.child));
            pending.extend(edge.left);
            pending.extend(edge.right);
        }
    }

    /// Iterates the edges in ascending label order.
    pub(crate) fn iter<'a>(&self, edges: &'a Arena<Edge>) -> InOrder<'a> {
        let mut iter = InOrder {
            edges,
            stack: SmallVec::new(),
        };
        iter.push_left_spine(self.root());
        iter
    }
}

fn remove_from(edges: &mut Arena<Edge>, subtree: Option<Handle>, label: u8, removed: &mut Option<Handle>) -> Option<Handle> {
    let current = subtree?;
    let edge = *edges.get(current);

    match label.cmp(&edge.label) {
        Ordering::Less => {
            let left = remove_from(edges, edge.left, label, removed);
            edges.get_mut(current).left = left;
            Some(current)
        }
        Ordering::Greater => {
            let right = remove_from(edges, edge.right, label, removed);
            edges.get_mut(current).right = right;
            Some(current)
        }
        Ordering::Equal => {
            edges.take(current);
            *removed = Some(edge.child);
            match (edge.left, edge.right) {
                (None, right) => right,
                (left, None) => left,
                (Some(left), Some(right)) => {
                    let (successor, rest) = detach_min(edges, right);
                    let successor_edge = edges.get_mut(successor);
                    successor_edge.left = Some(left);
                    successor_edge.right = rest;
                    Some(successor)
                }
            }
        }
    }
}

/// Unlinks the minimum edge of the subtree at `root`, returning it together
/// with what remains of the subtree.
fn detach_min(edges: &mut Arena<Edge>, root: Handle) -> (Handle, Option<Handle>) {
    let edge = *edges.get(root);
    match edge.left {
        None => (root, edge.right),
        Some(left) => {
            let (min, rest) = detach_min(edges, left);
            edges.get_mut(root).left = rest;
            (min, Some(root))
        }
    }
}

/// In-order walk over a transition BST.
///
/// A BST over a 52-letter alphabet is at most 52 deep, and usually far less.
pub(crate) struct InOrder<'a> {
    edges: &'a Arena<Edge>,
    stack: SmallVec<[Handle; 8]>,
}

impl InOrder<'_> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.edges.get(handle).left;
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let edge = self.edges.get(handle);
        self.push_left_spine(edge.right);
        Some(edge)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    /// Hands out distinct fake child handles so tests can tell edges apart.
    struct Children(usize);

    impl Children {
        fn next(&mut self) -> Handle {
            self.0 += 1;
            Handle::from_index(self.0)
        }
    }

    fn labels(transitions: &Transitions, edges: &Arena<Edge>) -> Vec<u8> {
        transitions.iter(edges).map(Edge::label).collect()
    }

    #[test]
    fn empty_index_has_no_edges() {
        let edges = Arena::with_capacity(8);
        let transitions = Transitions::new();
        assert!(transitions.root().is_none());
        assert_eq!(transitions.search(&edges, b'a'), None);
        assert_eq!(transitions.iter(&edges).count(), 0);
    }

    #[test]
    fn get_or_insert_returns_existing_child() {
        let mut edges = Arena::with_capacity(8);
        let mut transitions = Transitions::new();
        let mut children = Children(0);

        let first = transitions.get_or_insert_with(&mut edges, b'm', || children.next());
        let again = transitions.get_or_insert_with(&mut edges, b'm', || panic!("edge already exists"));
        assert_eq!(first, again);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let mut edges = Arena::with_capacity(8);
        let mut transitions = Transitions::new();
        let mut children = Children(0);

        for &label in b"bZaAzc" {
            transitions.get_or_insert_with(&mut edges, label, || children.next());
        }
        assert_eq!(labels(&transitions, &edges), b"AZabcz");
    }

    #[test]
    fn remove_keeps_siblings() {
        let mut edges = Arena::with_capacity(8);
        let mut transitions = Transitions::new();
        let mut children = Children(0);
        let mut by_label = BTreeMap::new();

        // `m` ends up as the BST root with both subtrees populated.
        for &label in b"mdtaghpz" {
            let child = transitions.get_or_insert_with(&mut edges, label, || children.next());
            by_label.insert(label, child);
        }

        assert_eq!(transitions.remove(&mut edges, b'm'), Some(by_label[&b'm']));
        assert_eq!(labels(&transitions, &edges), b"adghptz");
        for &label in b"adghptz" {
            assert_eq!(transitions.search(&edges, label), Some(by_label[&label]));
        }
        assert_eq!(transitions.search(&edges, b'm'), None);
        assert_eq!(transitions.remove(&mut edges, b'm'), None);
        assert_eq!(edges.len(), 7);
    }

    #[test]
    fn release_frees_every_edge() {
        let mut edges = Arena::with_capacity(8);
        let mut transitions = Transitions::new();
        let mut children = Children(0);
        let mut expected = Vec::new();

        for &label in b"qWeRty" {
            expected.push(transitions.get_or_insert_with(&mut edges, label, || children.next()));
        }

        let mut released: Vec<Handle> = Vec::new();
        transitions.release(&mut edges, &mut released);
        released.sort_by_key(|handle| handle.to_index());
        assert_eq!(released, expected);
        assert_eq!(edges.len(), 0);
    }

    proptest! {
        #[test]
        fn index_matches_ordered_map(operations in prop::collection::vec((any::<bool>(), prop::sample::select(b"ABCXYZabcxyz".to_vec())), 0..200)) {
            let mut edges = Arena::with_capacity(8);
            let mut transitions = Transitions::new();
            let mut children = Children(0);
            let mut model: BTreeMap<u8, Handle> = BTreeMap::new();

            for (insert, label) in operations {
                if insert {
                    let child = transitions.get_or_insert_with(&mut edges, label, || children.next());
                    prop_assert_eq!(*model.entry(label).or_insert(child), child);
                } else {
                    prop_assert_eq!(transitions.remove(&mut edges, label), model.remove(&label));
                }

                let expected: Vec<u8> = model.keys().copied().collect();
                prop_assert_eq!(labels(&transitions, &edges), expected);
                prop_assert_eq!(edges.len(), model.len());
            }
        }
    }
}
