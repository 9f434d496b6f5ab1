use alloc::vec::Vec;

use super::node_id::NodeId;

/// Flat slot storage for tree nodes, addressed by [`NodeId`].
///
/// Freed slots are recycled through a free list, so merge-heavy delete
/// workloads do not grow the backing vector.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live (non-freed) elements.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.to_index()] = Some(element);
            id
        } else {
            // NodeId::from_index asserts the arena stays within handle range.
            self.slots.push(Some(element));
            NodeId::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.to_index()].as_ref().expect("`Arena::get()` - `id` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.to_index()].as_mut().expect("`Arena::get_mut()` - `id` is invalid!")
    }

    /// Removes the element, returning it and recycling the slot.
    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let element = self.slots[id.to_index()].take().expect("`Arena::take()` - `id` is invalid!");
        self.free.push(id);
        element
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        drop(self.take(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Mutate(usize, u32),
        Free(usize),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            4 => any::<u32>().prop_map(Operation::Alloc),
            2 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Mutate(which, value)),
            2 => any::<usize>().prop_map(Operation::Free),
        ]
    }

    proptest! {
        /// Random alloc/mutate/free sequences agree with a Vec model, and
        /// freed slots get reused instead of growing the arena.
        #[test]
        fn arena_matches_model(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(NodeId, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let id = arena.alloc(value);
                        model.push((id, value));
                    }
                    Operation::Mutate(which, value) => {
                        if model.is_empty() {
                            continue;
                        }
                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Free(which) => {
                        if model.is_empty() {
                            continue;
                        }
                        let index = which % model.len();
                        let (id, value) = model.swap_remove(index);
                        prop_assert_eq!(arena.take(id), value);
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(id, value) in &model {
                    prop_assert_eq!(*arena.get(id), value);
                }
            }
        }
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let _b = arena.alloc(2);
        arena.free(a);
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(*arena.get(c), 3);
        assert_eq!(arena.len(), 2);
    }
}
