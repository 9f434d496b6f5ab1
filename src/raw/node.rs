use smallvec::SmallVec;

use super::node_id::NodeId;

/// Inline key capacity; orders above this spill to the heap.
///
/// The split and merge routines rely on one slot of transient overshoot
/// (`order + 1` keys, `order + 2` children) before restructuring, which the
/// growable backing accommodates without a sentinel scheme.
pub(crate) const INLINE_KEYS: usize = 8;
pub(crate) const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

/// A single B-tree node: sorted keys, child links, and a parent back-link.
///
/// A node is a leaf iff it has no children. For internal nodes the tree
/// maintains `children.len() == keys.len() + 1` between operations.
/// Occupancy is exactly the live length of each array; there is no "empty
/// slot" key value.
pub(crate) struct Node {
    pub(crate) keys: SmallVec<[i64; INLINE_KEYS]>,
    pub(crate) children: SmallVec<[NodeId; INLINE_CHILDREN]>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
            parent,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Inserts `key` at its sorted position. Never splits; the caller checks
    /// for overflow afterwards.
    pub(crate) fn insert_key(&mut self, key: i64) {
        let index = self.next_index_by_key(key);
        self.keys.insert(index, key);
    }

    /// First index whose key exceeds `key`, or `keys.len()` if none.
    ///
    /// Doubles as the insertion position for `key` and as the index of the
    /// child whose range contains `key`.
    #[inline]
    pub(crate) fn next_index_by_key(&self, key: i64) -> usize {
        match self.keys.binary_search(&key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Exact position of `key` in this node, if present.
    #[inline]
    pub(crate) fn index_of_key(&self, key: i64) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: i64) -> bool {
        self.index_of_key(key).is_some()
    }

    /// Removes and returns the least key (a right sibling's donation).
    pub(crate) fn remove_first_key(&mut self) -> i64 {
        self.keys.remove(0)
    }

    /// Removes and returns the greatest key (a left sibling's donation).
    pub(crate) fn remove_last_key(&mut self) -> i64 {
        self.keys.pop().expect("`Node::remove_last_key()` - node has no keys!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_key_keeps_sorted_order() {
        let mut node = Node::new(None);
        for key in [34, 14, 54, 24, 44] {
            node.insert_key(key);
        }
        assert_eq!(node.keys.as_slice(), &[14, 24, 34, 44, 54]);
        assert_eq!(node.key_count(), 5);
        assert!(node.is_leaf());
    }

    #[test]
    fn next_index_by_key_is_first_greater() {
        let mut node = Node::new(None);
        for key in [10, 20, 30] {
            node.insert_key(key);
        }
        assert_eq!(node.next_index_by_key(5), 0);
        assert_eq!(node.next_index_by_key(10), 1);
        assert_eq!(node.next_index_by_key(25), 2);
        assert_eq!(node.next_index_by_key(30), 3);
        assert_eq!(node.next_index_by_key(99), 3);
    }

    #[test]
    fn index_of_key_reports_absence() {
        let mut node = Node::new(None);
        node.insert_key(7);
        assert_eq!(node.index_of_key(7), Some(0));
        assert_eq!(node.index_of_key(8), None);
    }

    #[test]
    fn zero_is_an_ordinary_key() {
        let mut node = Node::new(None);
        node.insert_key(0);
        node.insert_key(-5);
        node.insert_key(5);
        assert_eq!(node.keys.as_slice(), &[-5, 0, 5]);
        assert!(node.contains_key(0));
        assert_eq!(node.remove_first_key(), -5);
        assert_eq!(node.remove_last_key(), 5);
        assert_eq!(node.keys.as_slice(), &[0]);
    }
}
