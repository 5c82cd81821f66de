use super::transitions::Transitions;

/// The state reached after consuming one particular key prefix.
///
/// `count` holds the number of terminal keys in the subtree rooted here,
/// this node included: `value.is_some() as usize` plus the counts of all
/// children. Every mutation that adds or removes a terminal key adjusts the
/// counts of all nodes on the path from the root.
#[derive(Clone, Debug)]
pub(crate) struct TrieNode<V> {
    value: Option<V>,
    count: usize,
    transitions: Transitions,
}

impl<V> TrieNode<V> {
    pub(crate) const fn new() -> Self {
        Self {
            value: None,
            count: 0,
            transitions: Transitions::new(),
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    #[inline]
    pub(crate) const fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// Stores `value`, returning the value it replaced.
    ///
    /// The count is bumped only when the node was not already terminal.
    pub(crate) fn replace_value(&mut self, value: V) -> Option<V> {
        let previous = self.value.replace(value);
        if previous.is_none() {
            self.count += 1;
        }
        previous
    }

    /// Clears the terminal value, if any, and drops this node's own slot
    /// from its count.
    pub(crate) fn take_value(&mut self) -> Option<V> {
        let previous = self.value.take();
        if previous.is_some() {
            self.count -= 1;
        }
        previous
    }

    #[inline]
    pub(crate) const fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn increment_count(&mut self) {
        self.count += 1;
    }

    #[inline]
    pub(crate) fn decrement_count(&mut self) {
        debug_assert!(self.count > 0, "`TrieNode::decrement_count()` - count is already zero!");
        self.count -= 1;
    }

    #[inline]
    pub(crate) const fn transitions(&self) -> Transitions {
        self.transitions
    }

    #[inline]
    pub(crate) fn set_transitions(&mut self, transitions: Transitions) {
        self.transitions = transitions;
    }
}
