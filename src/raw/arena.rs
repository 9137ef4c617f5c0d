use alloc::vec::Vec;
use core::mem;

use super::handle::Handle;
use super::node::Node;

/// One cell of a [`NodeArena`].
#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    // Released cells chain to the next released cell, most recent first.
    Vacant { next: Option<Handle> },
}

/// Owns every node of one tree.
///
/// A node lives here from the moment it is grown as a leaf until it is released by an unlink, so
/// the tree's child links decide lifetimes and parent links never do. Released cells form an
/// intrusive chain that new leaves draw from before the slot vector grows.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    next_vacant: Option<Handle>,
    occupied: usize,
}

impl<T> NodeArena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_vacant: None,
            occupied: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            next_vacant: None,
            occupied: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of live nodes.
    pub(crate) const fn len(&self) -> usize {
        self.occupied
    }

    /// Stores a fresh leaf holding `value` under `parent` and returns its handle.
    ///
    /// The caller links the leaf into `parent` (or makes it the root).
    pub(crate) fn grow_leaf(&mut self, value: T, parent: Option<Handle>) -> Handle {
        let leaf = Slot::Occupied(Node::leaf(value, parent));
        self.occupied += 1;

        if let Some(handle) = self.next_vacant {
            let slot = &mut self.slots[handle.slot()];
            let Slot::Vacant { next } = *slot else {
                unreachable!("`NodeArena::grow_leaf()` - vacancy chain reached a live node!");
            };
            self.next_vacant = next;
            *slot = leaf;
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX,
            "`NodeArena::grow_leaf()` - arena is full ({} nodes)",
            Handle::MAX + 1
        );
        self.slots.push(leaf);
        Handle::from_slot(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &Node<T> {
        match &self.slots[handle.slot()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("`NodeArena::get()` - `handle` was released!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut Node<T> {
        match &mut self.slots[handle.slot()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("`NodeArena::get_mut()` - `handle` was released!"),
        }
    }

    /// Takes the node out of the arena and puts its cell at the head of the vacancy chain.
    ///
    /// The node's links are returned as they were; nothing else is touched.
    pub(crate) fn release(&mut self, handle: Handle) -> Node<T> {
        let vacant = Slot::Vacant {
            next: self.next_vacant,
        };
        match mem::replace(&mut self.slots[handle.slot()], vacant) {
            Slot::Occupied(node) => {
                self.next_vacant = Some(handle);
                self.occupied -= 1;
                node
            }
            Slot::Vacant { next } => {
                self.slots[handle.slot()] = Slot::Vacant { next };
                panic!("`NodeArena::release()` - `handle` was already released!");
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.next_vacant = None;
        self.occupied = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn with_capacity_reserves_slots() {
        let arena: NodeArena<u8> = NodeArena::with_capacity(24);
        assert!(arena.capacity() >= 24);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn grown_leaf_records_parent() {
        let mut arena = NodeArena::new();
        let root = arena.grow_leaf('m', None);
        let leaf = arena.grow_leaf('a', Some(root));
        assert_eq!(arena.get(leaf).parent(), Some(root));
        assert_eq!(*arena.get(leaf).value(), 'a');
        assert_eq!(arena.get(leaf).size(), 1);
    }

    #[test]
    fn released_cells_are_reused_most_recent_first() {
        let mut arena = NodeArena::new();
        let a = arena.grow_leaf('a', None);
        let b = arena.grow_leaf('b', None);
        let c = arena.grow_leaf('c', None);
        assert_eq!(arena.release(a).into_value(), 'a');
        assert_eq!(arena.release(c).into_value(), 'c');
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.grow_leaf('d', None), c);
        assert_eq!(arena.grow_leaf('e', None), a);
        assert_eq!(*arena.get(b).value(), 'b');
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`NodeArena::get()` - `handle` was released!")]
    fn get_after_release_panics() {
        let mut arena = NodeArena::new();
        let handle = arena.grow_leaf(7u32, None);
        arena.release(handle);
        let _ = arena.get(handle);
    }

    #[test]
    #[should_panic(expected = "`NodeArena::release()` - `handle` was already released!")]
    fn double_release_panics() {
        let mut arena = NodeArena::new();
        let handle = arena.grow_leaf(7u32, None);
        arena.release(handle);
        arena.release(handle);
    }

    #[derive(Clone, Debug)]
    enum Step {
        Grow(u32),
        Rewrite(usize, u32),
        Release(usize),
        Clear,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            12 => any::<u32>().prop_map(Step::Grow),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Step::Rewrite(which, value)),
            6 => any::<usize>().prop_map(Step::Release),
            1 => Just(Step::Clear),
        ]
    }

    proptest! {
        #[test]
        fn live_handles_keep_their_nodes(steps in prop::collection::vec(step_strategy(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: NodeArena<u32> = NodeArena::new();

            for step in steps {
                match step {
                    Step::Grow(value) => live.push((arena.grow_leaf(value, None), value)),
                    Step::Rewrite(which, value) if !live.is_empty() => {
                        let index = which % live.len();
                        arena.get_mut(live[index].0).replace_value(value);
                        live[index].1 = value;
                    }
                    Step::Release(which) if !live.is_empty() => {
                        let (handle, expected) = live.swap_remove(which % live.len());
                        prop_assert_eq!(arena.release(handle).into_value(), expected);
                    }
                    Step::Clear => {
                        arena.clear();
                        live.clear();
                    }
                    Step::Rewrite(..) | Step::Release(_) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle).value(), value);
                }
            }
        }
    }
}
