use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::cmp::max;
use core::ops::Bound;

use log::{debug, trace};

use super::arena::NodeArena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::walk::SortedWalk;

/// The AVL tree backing `OrderedIndex`.
///
/// Every node lives in one arena. Child links own (in the sense that a node is released exactly
/// when it is unlinked from its parent) and parent links are plain lookups used to walk back up
/// after a mutation.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    /// Arena storing all tree nodes.
    nodes: NodeArena<T>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the number of keys in the tree.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree, 0 when empty.
    pub(crate) fn depth(&self) -> usize {
        self.height_of(self.root)
    }

    /// Returns the root's balance factor, 0 when empty.
    pub(crate) fn balance(&self) -> isize {
        self.root.map_or(0, |root| self.balance_factor(root))
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Releases every node.
    pub(crate) fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Handle of the smallest key.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Handle of the largest key.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Follows `side` links from `handle` until there are none left.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// Returns the handle holding the key of zero-based `rank` in sorted order.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        let mut current = self.root?;
        let mut remaining = rank;

        loop {
            let node = self.nodes.get(current);
            let left_size = self.size_of(node.left());
            match remaining.cmp(&left_size) {
                Less => current = node.left()?,
                Equal => return Some(current),
                Greater => {
                    remaining -= left_size + 1;
                    current = node.right()?;
                }
            }
        }
    }

    /// Counts the leading keys (in sorted order) for which `pred` holds.
    ///
    /// `pred` must be monotone: true for a prefix of the sorted keys and false afterwards.
    pub(crate) fn count_while<F>(&self, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut count = 0;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if pred(node.value()) {
                count += self.size_of(node.left()) + 1;
                current = node.right();
            } else {
                current = node.left();
            }
        }
        count
    }

    /// Removes the node at `handle` and returns its key, rebalancing up to the root.
    pub(crate) fn remove_node(&mut self, handle: Handle) -> T {
        let node = self.nodes.get(handle);
        match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                // The successor has no left child, so it can be spliced out directly; its key then
                // takes the place of the one being removed.
                let successor = self.extreme(right, Side::Left);
                let successor_value = self.unlink(successor);
                self.nodes.get_mut(handle).replace_value(successor_value)
            }
            _ => self.unlink(handle),
        }
    }

    /// Splices out a node with at most one child, moving that child into its place.
    fn unlink(&mut self, handle: Handle) -> T {
        let node = self.nodes.release(handle);
        debug_assert!(
            node.left().is_none() || node.right().is_none(),
            "`RawAvlTree::unlink()` - node has two children!"
        );
        let child = node.left().or(node.right());
        let parent = node.parent();

        self.replace_child(parent, handle, child);
        self.retrace(parent);
        node.into_value()
    }

    /// Points `parent`'s link to `old` (or the root, when `parent` is `None`) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = self.nodes.get_mut(parent);
                let side = parent_node
                    .side_of(old)
                    .expect("`RawAvlTree::replace_child()` - `old` is not a child of `parent`!");
                parent_node.set_child(side, new);
            }
        }
        if let Some(new) = new {
            self.nodes.get_mut(new).set_parent(parent);
        }
    }

    #[inline]
    fn size_of(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).size())
    }

    #[inline]
    fn height_of(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).height())
    }

    // AVL heights stay below 64 for any addressable arena, so the casts cannot wrap.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self, handle: Handle) -> isize {
        let node = self.nodes.get(handle);
        self.height_of(node.left()) as isize - self.height_of(node.right()) as isize
    }

    /// Recomputes `handle`'s cached size and height from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        let size = 1 + self.size_of(left) + self.size_of(right);
        let height = 1 + max(self.height_of(left), self.height_of(right));
        self.nodes.get_mut(handle).set_stats(size, height);
    }

    /// Rotates the subtree at `handle` toward `side`.
    ///
    /// The child opposite `side` (the pivot) takes `handle`'s place under its parent, `handle`
    /// becomes the pivot's `side` child, and the pivot's former `side` child moves across to
    /// `handle`. Returns the pivot.
    fn rotate(&mut self, handle: Handle, side: Side) -> Handle {
        let far = side.opposite();
        let node = self.nodes.get(handle);
        let parent = node.parent();
        let pivot = node.child(far).expect("`RawAvlTree::rotate()` - no child to promote!");
        let inner = self.nodes.get(pivot).child(side);

        self.nodes.get_mut(handle).set_child(far, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(handle));
        }
        self.replace_child(parent, handle, Some(pivot));
        self.nodes.get_mut(pivot).set_child(side, Some(handle));
        self.nodes.get_mut(handle).set_parent(Some(pivot));

        self.refresh(handle);
        self.refresh(pivot);
        trace!("rotated {side:?} at {handle:?}, {pivot:?} is the new subtree root");
        pivot
    }

    /// Promotes the right child of `handle`. Returns the new subtree root.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        self.rotate(handle, Side::Left)
    }

    /// Promotes the left child of `handle`. Returns the new subtree root.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        self.rotate(handle, Side::Right)
    }

    /// Refreshes `handle` and restores its balance factor to `[-1, 1]`.
    ///
    /// Both subtrees must already be balanced with exact statistics. Returns the handle now
    /// occupying `handle`'s former position.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.refresh(handle);
        let balance = self.balance_factor(handle);
        let node = self.nodes.get(handle);

        if balance < -1 {
            let right = node.right().expect("`RawAvlTree::rebalance()` - right-heavy without a right child!");
            if self.balance_factor(right) > 0 {
                self.rotate_right(right);
            }
            self.rotate_left(handle)
        } else if balance > 1 {
            let left = node.left().expect("`RawAvlTree::rebalance()` - left-heavy without a left child!");
            if self.balance_factor(left) < 0 {
                self.rotate_left(left);
            }
            self.rotate_right(handle)
        } else {
            handle
        }
    }

    /// Rebalances every node from `start` up to the root.
    ///
    /// Sizes change along the whole path after any insertion or removal, so the walk never stops
    /// early even once heights settle.
    fn retrace(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            let subtree_root = self.rebalance(handle);
            current = self.nodes.get(subtree_root).parent();
        }
    }
}

impl<T: Ord> RawAvlTree<T> {
    /// Searches for a key and returns its node handle if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.value().borrow()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts `value`, returning `false` (and dropping `value`) if an equal key is present.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        let Some(mut current) = self.root else {
            self.root = Some(self.nodes.grow_leaf(value, None));
            return true;
        };

        loop {
            let node = self.nodes.get(current);
            let side = match value.cmp(node.value()) {
                Less => Side::Left,
                Greater => Side::Right,
                Equal => return false,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let leaf = self.nodes.grow_leaf(value, Some(current));
                    self.nodes.get_mut(current).set_child(side, Some(leaf));
                    break;
                }
            }
        }

        self.retrace(Some(current));
        true
    }

    /// Removes the key equal to `key`, returning it.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }

    /// Returns the zero-based rank of `key`, or `None` if it is absent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut rank = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.value().borrow()) {
                Less => current = node.left(),
                Greater => {
                    rank += self.size_of(node.left()) + 1;
                    current = node.right();
                }
                Equal => return Some(rank + self.size_of(node.left())),
            }
        }
        None
    }

    /// Builds an ascending walk over the keys inside `start..end`.
    ///
    /// The walk seeks straight to the first key past `start` and is told up front how many keys
    /// fall inside the bounds, so it never enters a subtree lying wholly outside them. Inverted
    /// bounds produce an empty walk.
    pub(crate) fn range_walk<Q>(&self, start: Bound<&Q>, end: Bound<&Q>) -> SortedWalk<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let below_start = |value: &T| match start {
            Bound::Included(start) => value.borrow() < start,
            Bound::Excluded(start) => value.borrow() <= start,
            Bound::Unbounded => false,
        };
        let within_end = |value: &T| match end {
            Bound::Included(end) => value.borrow() <= end,
            Bound::Excluded(end) => value.borrow() < end,
            Bound::Unbounded => true,
        };

        let skipped = self.count_while(&below_start);
        let taken = self.count_while(within_end);
        SortedWalk::seek(self, below_start, taken.saturating_sub(skipped))
    }
}
