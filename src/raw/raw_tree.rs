use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::node::{INLINE_CHILDREN, INLINE_KEYS, Node};
use super::node_id::NodeId;
use crate::error::Error;

/// The core B-tree implementation backing [`BTree`](crate::BTree).
///
/// All nodes live in the arena and point at each other by [`NodeId`]; the
/// parent back-link on every node is what lets the split and borrow/merge
/// cascades run as plain loops up the ancestor chain instead of recursion.
pub(crate) struct RawBTree {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Handle to the root node. The tree always owns exactly one root, even
    /// when empty.
    root: NodeId,
    /// Maximum number of keys a node may stably hold.
    order: usize,
    /// Minimum keys for a non-root node: `ceil((order + 1) / 2) - 1`.
    min_keys: usize,
    /// Total number of keys in the tree.
    len: usize,
}

impl RawBTree {
    pub(crate) fn new(order: usize) -> Self {
        assert!(order >= 3, "`RawBTree::new()` - `order` must be at least 3!");
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(None));
        Self {
            nodes,
            root,
            order,
            min_keys: (order + 1).div_ceil(2) - 1,
            len: 0,
        }
    }

    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Whether the node can give up one key without underflowing.
    fn can_lend(&self, id: NodeId) -> bool {
        self.nodes.get(id).key_count() > self.min_keys
    }

    /// Descends from the root to the node owning `key`: the node that already
    /// contains it, or the leaf where it would be inserted.
    ///
    /// `Error::NodeNotFound` means an internal node was missing the child its
    /// key range promised, which a well-formed tree never exhibits.
    fn find_owner(&self, key: i64) -> Result<NodeId, Error> {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if node.contains_key(key) || node.is_leaf() {
                return Ok(current);
            }
            let index = node.next_index_by_key(key);
            current = node.children.get(index).copied().ok_or(Error::NodeNotFound)?;
        }
    }

    pub(crate) fn contains_key(&self, key: i64) -> bool {
        self.find_owner(key)
            .is_ok_and(|owner| self.nodes.get(owner).contains_key(key))
    }

    /// Inserts `key`, splitting overflowing nodes up to the root as needed.
    /// Returns `Ok(false)` without modifying the tree if the key is already
    /// present.
    pub(crate) fn insert(&mut self, key: i64) -> Result<bool, Error> {
        let owner = self.find_owner(key)?;
        if self.nodes.get(owner).contains_key(key) {
            return Ok(false);
        }

        self.nodes.get_mut(owner).insert_key(key);
        self.len += 1;

        // Split cascade: each split promotes a pivot into the parent, which
        // may in turn overflow. Terminates at the root, growing the tree by
        // one level.
        let mut current = owner;
        while self.nodes.get(current).key_count() > self.order {
            current = self.split(current);
        }
        Ok(true)
    }

    /// Splits an overflowing node around its middle key and returns the
    /// parent that received the pivot.
    fn split(&mut self, node_id: NodeId) -> NodeId {
        let (pivot_key, right_keys, right_children, parent_link) = {
            let node = self.nodes.get_mut(node_id);
            let pivot = node.key_count() / 2;
            let right_keys: SmallVec<[i64; INLINE_KEYS]> = node.keys.drain(pivot + 1..).collect();
            let pivot_key = node.keys.pop().expect("`RawBTree::split()` - splitting an empty node!");
            let right_children: SmallVec<[NodeId; INLINE_CHILDREN]> = if node.is_leaf() {
                SmallVec::new()
            } else {
                node.children.drain(pivot + 1..).collect()
            };
            (pivot_key, right_keys, right_children, node.parent)
        };

        let parent_id = match parent_link {
            Some(parent_id) => parent_id,
            None => {
                // The root itself is splitting; grow a fresh root above it.
                let new_root = self.nodes.alloc(Node::new(None));
                self.nodes.get_mut(new_root).children.push(node_id);
                self.nodes.get_mut(node_id).parent = Some(new_root);
                self.root = new_root;
                new_root
            }
        };

        let moved_children = right_children.clone();
        let right_id = self.nodes.alloc(Node {
            keys: right_keys,
            children: right_children,
            parent: Some(parent_id),
        });
        for child in moved_children {
            self.nodes.get_mut(child).parent = Some(right_id);
        }

        // The pivot goes into the parent at its sorted position, with the new
        // right node linked immediately after it.
        let parent = self.nodes.get_mut(parent_id);
        let position = parent.next_index_by_key(pivot_key);
        parent.keys.insert(position, pivot_key);
        parent.children.insert(position + 1, right_id);
        parent_id
    }

    /// Deletes `key`, rebalancing underflowing nodes up to the root as
    /// needed.
    pub(crate) fn delete(&mut self, key: i64) -> Result<bool, Error> {
        let owner = self.find_owner(key)?;
        let node = self.nodes.get(owner);
        let Some(index) = node.index_of_key(key) else {
            return Err(Error::KeyNotFound);
        };

        if node.is_leaf() {
            self.nodes.get_mut(owner).keys.remove(index);
            self.rebalance_upward(owner);
        } else {
            self.delete_from_internal(owner, index);
        }

        self.len -= 1;
        self.collapse_root();
        Ok(true)
    }

    /// Deletes the key at `key_index` of an internal node.
    ///
    /// Preferred repairs, in order: replace the key with the predecessor
    /// leaf's greatest key, or the successor leaf's least key, whichever leaf
    /// can lend one. When neither can, two flanking leaves at minimum merge
    /// into one (dropping the key outright); flanking subtrees deeper than a
    /// leaf instead give up the predecessor anyway and repair the resulting
    /// leaf underflow through the ordinary rebalance walk.
    fn delete_from_internal(&mut self, node_id: NodeId, key_index: usize) {
        let left_child = self.nodes.get(node_id).children[key_index];
        let right_child = self.nodes.get(node_id).children[key_index + 1];
        let predecessor = self.rightmost_leaf(left_child);
        let successor = self.leftmost_leaf(right_child);

        if self.can_lend(predecessor) {
            // The left subtree's greatest key slots in exactly where the
            // deleted key sat.
            let donated = self.nodes.get_mut(predecessor).remove_last_key();
            self.nodes.get_mut(node_id).keys[key_index] = donated;
        } else if self.can_lend(successor) {
            let donated = self.nodes.get_mut(successor).remove_first_key();
            self.nodes.get_mut(node_id).keys[key_index] = donated;
        } else if self.nodes.get(left_child).is_leaf() {
            // Both flanking leaves sit at minimum: fold the right one into
            // the left and drop the deleted key outright. The node lost a
            // key, so it may now underflow itself.
            let removed = self.nodes.take(right_child);
            self.nodes.get_mut(left_child).keys.extend(removed.keys);

            let node = self.nodes.get_mut(node_id);
            node.keys.remove(key_index);
            node.children.remove(key_index + 1);
            self.rebalance_upward(node_id);
        } else {
            let donated = self.nodes.get_mut(predecessor).remove_last_key();
            self.nodes.get_mut(node_id).keys[key_index] = donated;
            self.rebalance_upward(predecessor);
        }
    }

    fn rightmost_leaf(&self, start: NodeId) -> NodeId {
        let mut current = start;
        while let Some(&child) = self.nodes.get(current).children.last() {
            current = child;
        }
        current
    }

    fn leftmost_leaf(&self, start: NodeId) -> NodeId {
        let mut current = start;
        while let Some(&child) = self.nodes.get(current).children.first() {
            current = child;
        }
        current
    }

    /// Repairs underflow by walking the parent chain to the root: at each
    /// underflowing node, borrow from a sibling that can lend, else merge
    /// into one. A borrow leaves the parent's key count unchanged; a merge
    /// pulls a separator out of the parent, which may underflow in turn. The
    /// walk always continues to the root so every damaged ancestor is seen.
    fn rebalance_upward(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            let node = self.nodes.get(current);
            let Some(parent_id) = node.parent else { break };
            if node.key_count() >= self.min_keys {
                current = parent_id;
                continue;
            }

            let position = self.child_position(parent_id, current);
            let parent = self.nodes.get(parent_id);
            let left = position.checked_sub(1).map(|i| parent.children[i]);
            let right = parent.children.get(position + 1).copied();

            if let Some(sibling) = left.filter(|&s| self.can_lend(s)) {
                self.borrow_from_left(parent_id, position, current, sibling);
            } else if let Some(sibling) = right.filter(|&s| self.can_lend(s)) {
                self.borrow_from_right(parent_id, position, current, sibling);
            } else if let Some(sibling) = left {
                self.merge_into_left(parent_id, position, current, sibling);
            } else if let Some(sibling) = right {
                self.merge_into_right(parent_id, position, current, sibling);
            }
            current = parent_id;
        }
    }

    /// Index of `child` in the parent's child array.
    fn child_position(&self, parent_id: NodeId, child: NodeId) -> usize {
        self.nodes
            .get(parent_id)
            .children
            .iter()
            .position(|&c| c == child)
            .expect("`RawBTree::child_position()` - node is not a child of its parent!")
    }

    /// Rotation through the parent: the left sibling's greatest key replaces
    /// the separator, which drops down into the underflowing node. For
    /// internal nodes the sibling's last child crosses over as the node's
    /// new first child.
    fn borrow_from_left(&mut self, parent_id: NodeId, position: usize, node_id: NodeId, sibling: NodeId) {
        let donated = self.nodes.get_mut(sibling).remove_last_key();
        let donated_child = self.nodes.get_mut(sibling).children.pop();

        let separator_index = position - 1;
        let separator = core::mem::replace(&mut self.nodes.get_mut(parent_id).keys[separator_index], donated);

        let node = self.nodes.get_mut(node_id);
        node.keys.insert(0, separator);
        if let Some(child) = donated_child {
            node.children.insert(0, child);
            self.nodes.get_mut(child).parent = Some(node_id);
        }
    }

    /// Mirror of [`Self::borrow_from_left`] using the right sibling's least
    /// key and first child.
    fn borrow_from_right(&mut self, parent_id: NodeId, position: usize, node_id: NodeId, sibling: NodeId) {
        let donated = self.nodes.get_mut(sibling).remove_first_key();
        let sibling_node = self.nodes.get_mut(sibling);
        let donated_child = if sibling_node.is_leaf() {
            None
        } else {
            Some(sibling_node.children.remove(0))
        };

        let separator = core::mem::replace(&mut self.nodes.get_mut(parent_id).keys[position], donated);

        let node = self.nodes.get_mut(node_id);
        node.keys.push(separator);
        if let Some(child) = donated_child {
            node.children.push(child);
            self.nodes.get_mut(child).parent = Some(node_id);
        }
    }

    /// Absorbs the underflowing node into its left sibling, pulling the
    /// separator between them down into the sibling. The node is freed and
    /// the parent loses one key and one child.
    fn merge_into_left(&mut self, parent_id: NodeId, position: usize, node_id: NodeId, sibling: NodeId) {
        let separator = {
            let parent = self.nodes.get_mut(parent_id);
            let separator = parent.keys.remove(position - 1);
            parent.children.remove(position);
            separator
        };

        let removed = self.nodes.take(node_id);
        let absorber = self.nodes.get_mut(sibling);
        absorber.keys.push(separator);
        absorber.keys.extend(removed.keys);
        absorber.children.extend(removed.children.iter().copied());
        for child in removed.children {
            self.nodes.get_mut(child).parent = Some(sibling);
        }
    }

    /// Mirror of [`Self::merge_into_left`] for a leftmost node, which only
    /// has a right sibling: the node's contents are spliced in front of the
    /// sibling's.
    fn merge_into_right(&mut self, parent_id: NodeId, position: usize, node_id: NodeId, sibling: NodeId) {
        let separator = {
            let parent = self.nodes.get_mut(parent_id);
            let separator = parent.keys.remove(position);
            parent.children.remove(position);
            separator
        };

        let removed = self.nodes.take(node_id);
        let absorber = self.nodes.get_mut(sibling);
        absorber.keys.insert(0, separator);
        absorber.keys.insert_from_slice(0, &removed.keys);
        absorber.children.insert_from_slice(0, &removed.children);
        for child in removed.children {
            self.nodes.get_mut(child).parent = Some(sibling);
        }
    }

    /// A merge cascade can leave the root with zero keys and a single child;
    /// that child becomes the new root, shrinking the tree by one level. An
    /// empty root leaf (last key deleted) stays in place.
    fn collapse_root(&mut self) {
        let root = self.nodes.get(self.root);
        if root.keys.is_empty() && root.children.len() == 1 {
            let child = root.children[0];
            self.nodes.free(self.root);
            self.nodes.get_mut(child).parent = None;
            self.root = child;
        }
    }

    /// Keys in pre-order: each node's keys before its children's.
    pub(crate) fn keys_pre_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        self.visit_pre(self.root, &mut out);
        out
    }

    /// Keys in in-order: children and keys interleaved by position, which
    /// yields ascending key order.
    pub(crate) fn keys_in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        self.visit_in(self.root, &mut out);
        out
    }

    /// Keys in post-order: each node's keys after its children's.
    pub(crate) fn keys_post_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        self.visit_post(self.root, &mut out);
        out
    }

    fn visit_pre(&self, id: NodeId, out: &mut Vec<i64>) {
        let node = self.nodes.get(id);
        out.extend_from_slice(&node.keys);
        for &child in &node.children {
            self.visit_pre(child, out);
        }
    }

    fn visit_in(&self, id: NodeId, out: &mut Vec<i64>) {
        let node = self.nodes.get(id);
        if node.is_leaf() {
            out.extend_from_slice(&node.keys);
            return;
        }
        for (index, &key) in node.keys.iter().enumerate() {
            self.visit_in(node.children[index], out);
            out.push(key);
        }
        if let Some(&last) = node.children.last() {
            self.visit_in(last, out);
        }
    }

    fn visit_post(&self, id: NodeId, out: &mut Vec<i64>) {
        let node = self.nodes.get(id);
        for &child in &node.children {
            self.visit_post(child, out);
        }
        out.extend_from_slice(&node.keys);
    }

    /// Checks every structural invariant; test support.
    #[cfg(test)]
    fn check_invariants(&self) {
        self.check_node(self.root, None, i64::MIN, i64::MAX);
    }

    #[cfg(test)]
    fn check_node(&self, id: NodeId, parent: Option<NodeId>, lower: i64, upper: i64) {
        let node = self.nodes.get(id);
        assert_eq!(node.parent, parent, "parent back-link mismatch");
        assert!(node.keys.windows(2).all(|w| w[0] < w[1]), "keys not strictly increasing");
        assert!(node.keys.iter().all(|&k| lower < k && k < upper), "key outside separator range");
        assert!(node.key_count() <= self.order, "node overflowing after operation");
        if parent.is_some() {
            assert!(node.key_count() >= self.min_keys, "non-root node underflowing after operation");
        }
        if !node.is_leaf() {
            assert_eq!(node.children.len(), node.key_count() + 1, "child count != key count + 1");
            for (index, &child) in node.children.iter().enumerate() {
                let low = if index == 0 { lower } else { node.keys[index - 1] };
                let high = node.keys.get(index).copied().unwrap_or(upper);
                self.check_node(child, Some(id), low, high);
            }
        }
    }
}
