//! The public B-tree facade.

use alloc::string::String;
use core::fmt::Write;

use crate::error::Error;
use crate::raw::RawBTree;

/// An in-memory B-tree over `i64` keys.
///
/// `order` is the maximum number of keys a node may stably hold; nodes
/// exceeding it are split, and non-root nodes falling below
/// `ceil((order + 1) / 2) - 1` keys are repaired by borrowing from or
/// merging with a sibling. Both repairs cascade toward the root, so the tree
/// satisfies its fan-out bounds between any two operations.
///
/// Keys are unique; inserting a key that is already present is a no-op
/// reported through the return value. The tree supports a single logical
/// writer with no concurrent readers, which `&mut self` on every mutating
/// operation enforces.
///
/// # Examples
///
/// ```
/// use grove::BTree;
///
/// let mut tree = BTree::new(4);
/// for key in [34, 44, 54, 24, 14] {
///     tree.insert(key).unwrap();
/// }
/// assert_eq!(tree.in_order(), "14 -> 24 -> 34 -> 44 -> 54");
/// ```
pub struct BTree {
    raw: RawBTree,
}

impl BTree {
    /// Creates an empty tree of the given order (maximum keys per node).
    ///
    /// # Panics
    ///
    /// Panics if `order < 3`; smaller orders cannot satisfy the fan-out
    /// bounds.
    #[must_use]
    pub fn new(order: usize) -> Self {
        Self {
            raw: RawBTree::new(order),
        }
    }

    /// The maximum number of keys a node may stably hold.
    #[must_use]
    pub fn order(&self) -> usize {
        self.raw.order()
    }

    /// Number of keys currently in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Inserts `key`, returning `Ok(true)` if it was placed and `Ok(false)`
    /// if it was already present.
    ///
    /// # Errors
    ///
    /// [`Error::NodeNotFound`] if the structural search fails, which signals
    /// a corrupted tree rather than bad input.
    pub fn insert(&mut self, key: i64) -> Result<bool, Error> {
        self.raw.insert(key)
    }

    /// Deletes `key`, rebalancing as needed. Returns `Ok(true)` on success.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent (the tree is left
    /// unchanged); [`Error::NodeNotFound`] if the structural search fails.
    pub fn delete(&mut self, key: i64) -> Result<bool, Error> {
        self.raw.delete(key)
    }

    /// Whether `key` is present in the tree.
    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.raw.contains_key(key)
    }

    /// Keys in pre-order (each node's keys before its children's), rendered
    /// as decimal tokens joined by `" -> "`. The empty tree renders as `""`.
    #[must_use]
    pub fn pre_order(&self) -> String {
        render(&self.raw.keys_pre_order())
    }

    /// Keys in ascending order, rendered as decimal tokens joined by
    /// `" -> "`. The empty tree renders as `""`.
    #[must_use]
    pub fn in_order(&self) -> String {
        render(&self.raw.keys_in_order())
    }

    /// Keys in post-order (each node's keys after its children's), rendered
    /// as decimal tokens joined by `" -> "`. The empty tree renders as `""`.
    #[must_use]
    pub fn post_order(&self) -> String {
        render(&self.raw.keys_post_order())
    }
}

/// Joins keys with `" -> "`; empty input yields the empty string.
fn render(keys: &[i64]) -> String {
    let mut out = String::new();
    for (index, key) in keys.iter().enumerate() {
        if index > 0 {
            out.push_str(" -> ");
        }
        write!(out, "{key}").expect("writing to a String cannot fail");
    }
    out
}
