use core::num::NonZero;

/// Index of a node slot in the tree's arena.
///
/// Stored shifted by one so that `Option<NodeId>` benefits from the niche
/// optimization; every node carries an `Option<NodeId>` parent link, so this
/// keeps the link to four bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZero<u32>);

impl NodeId {
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeId::from_index()` - `index` > `NodeId::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as u32).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
