//! Explicit-stack traversals over a [`RawAvlTree`].
//!
//! Each walk borrows the tree, never mutates it, and keeps memory proportional to the tree's
//! height (its widest level, for [`LevelWalk`]). A walk also tracks how many keys it has left to
//! yield, which backs the public iterators' `ExactSizeIterator` impls.

use alloc::collections::VecDeque;

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::Side;
use super::raw_avl_tree::RawAvlTree;

// An AVL tree over 2^32 nodes is at most 45 levels deep; smallvec 1.x has no `Array` impl for
// sizes between 36 and 64.
const STACK_INLINE: usize = 64;

type Stack<E> = SmallVec<[E; STACK_INLINE]>;

/// In-order walk, ascending or descending.
pub(crate) struct SortedWalk<'a, T> {
    tree: &'a RawAvlTree<T>,
    // Nodes whose `near` subtree is done but which are not yet yielded; the top is next.
    stack: Stack<Handle>,
    // `Left` walks ascending, `Right` descending.
    near: Side,
    remaining: usize,
}

impl<'a, T> SortedWalk<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>, near: Side) -> Self {
        let mut walk = Self {
            tree,
            stack: Stack::new(),
            near,
            remaining: tree.len(),
        };
        walk.descend(tree.root());
        walk
    }

    /// Starts an ascending walk at the first key for which `below` is false and stops after
    /// `remaining` keys.
    ///
    /// `below` must be monotone over the sorted keys. Subtrees that lie wholly below are skipped
    /// without being entered.
    pub(crate) fn seek<F>(tree: &'a RawAvlTree<T>, below: F, remaining: usize) -> Self
    where
        F: Fn(&T) -> bool,
    {
        let mut stack = Stack::new();
        let mut current = tree.root();
        while let Some(handle) = current {
            let node = tree.node(handle);
            if below(node.value()) {
                current = node.right();
            } else {
                stack.push(handle);
                current = node.left();
            }
        }

        Self {
            tree,
            stack,
            near: Side::Left,
            remaining,
        }
    }

    fn descend(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).child(self.near);
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.stack.pop()?;
        self.remaining -= 1;

        let tree = self.tree;
        let node = tree.node(handle);
        self.descend(node.child(self.near.opposite()));
        Some(node.value())
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }

    /// Nodes discovered but not yet yielded.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.stack.len()
    }
}

impl<T> Clone for SortedWalk<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            near: self.near,
            remaining: self.remaining,
        }
    }
}

/// Pre-order walk: node, left subtree, right subtree.
pub(crate) struct PreOrderWalk<'a, T> {
    tree: &'a RawAvlTree<T>,
    stack: Stack<Handle>,
    remaining: usize,
}

impl<'a, T> PreOrderWalk<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
            remaining: tree.len(),
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        let handle = self.stack.pop()?;
        self.remaining -= 1;

        let node = self.tree.node(handle);
        // Right goes under left so that the left subtree is finished first.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node.value())
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> Clone for PreOrderWalk<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// Post-order walk: left subtree, right subtree, node.
pub(crate) struct PostOrderWalk<'a, T> {
    tree: &'a RawAvlTree<T>,
    // The flag marks nodes whose children are already on the stack.
    stack: Stack<(Handle, bool)>,
    remaining: usize,
}

impl<'a, T> PostOrderWalk<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>) -> Self {
        Self {
            tree,
            stack: tree.root().map(|root| (root, false)).into_iter().collect(),
            remaining: tree.len(),
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        loop {
            let (handle, expanded) = self.stack.pop()?;
            let node = self.tree.node(handle);
            if expanded {
                self.remaining -= 1;
                return Some(node.value());
            }
            self.stack.push((handle, true));
            self.stack.extend(node.right().map(|right| (right, false)));
            self.stack.extend(node.left().map(|left| (left, false)));
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> Clone for PostOrderWalk<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// Breadth-first walk: levels top to bottom, each level left to right.
pub(crate) struct LevelWalk<'a, T> {
    tree: &'a RawAvlTree<T>,
    queue: VecDeque<Handle>,
    remaining: usize,
}

impl<'a, T> LevelWalk<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>) -> Self {
        Self {
            tree,
            queue: tree.root().into_iter().collect(),
            remaining: tree.len(),
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        let handle = self.queue.pop_front()?;
        self.remaining -= 1;

        let node = self.tree.node(handle);
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node.value())
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> Clone for LevelWalk<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            queue: self.queue.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn tree_of(items: impl IntoIterator<Item = u32>) -> RawAvlTree<u32> {
        let mut tree = RawAvlTree::new();
        for item in items {
            tree.insert(item);
        }
        tree
    }

    fn drain<'a>(mut next: impl FnMut() -> Option<&'a u32>) -> Vec<u32> {
        core::iter::from_fn(|| next()).copied().collect()
    }

    #[test]
    fn walks_over_empty_tree_yield_nothing() {
        let tree = tree_of(core::iter::empty());
        assert_eq!(SortedWalk::new(&tree, Side::Left).next(), None);
        assert_eq!(SortedWalk::new(&tree, Side::Right).next(), None);
        assert_eq!(PreOrderWalk::new(&tree).next(), None);
        assert_eq!(PostOrderWalk::new(&tree).next(), None);
        assert_eq!(LevelWalk::new(&tree).next(), None);
    }

    #[test]
    fn sorted_walk_both_directions() {
        let tree = tree_of([8, 3, 10, 1, 6, 14, 4, 7, 13]);

        let mut ascending = SortedWalk::new(&tree, Side::Left);
        assert_eq!(ascending.len(), 9);
        assert_eq!(drain(|| ascending.next()), [1, 3, 4, 6, 7, 8, 10, 13, 14]);
        assert_eq!(ascending.len(), 0);

        let mut descending = SortedWalk::new(&tree, Side::Right);
        assert_eq!(drain(|| descending.next()), [14, 13, 10, 8, 7, 6, 4, 3, 1]);
    }

    #[test]
    fn seek_skips_keys_below_and_honours_remaining() {
        let tree = tree_of(0..32);
        let mut walk = SortedWalk::seek(&tree, |&key| key < 20, 5);
        assert_eq!(drain(|| walk.next()), [20, 21, 22, 23, 24]);
    }

    #[test]
    fn stacks_stay_inline_for_the_largest_test_tree() {
        // Descending inserts up to the test handle limit.
        let tree = tree_of((0..60_000).rev());
        assert!(tree.depth() < STACK_INLINE);

        let mut sorted = SortedWalk::new(&tree, Side::Right);
        let mut post = PostOrderWalk::new(&tree);
        for _ in 0..1_000 {
            sorted.next();
            post.next();
            assert!(!sorted.stack.spilled() && !post.stack.spilled());
        }
        assert_eq!(sorted.len(), 59_000);
    }

    #[test]
    fn cloned_walk_restarts_from_the_same_point() {
        let tree = tree_of(0..10);
        let mut walk = SortedWalk::new(&tree, Side::Left);
        walk.next();
        walk.next();
        let mut copy = walk.clone();
        assert_eq!(drain(|| walk.next()), drain(|| copy.next()));
    }

    #[test]
    fn every_walk_visits_each_key_once() {
        let tree = tree_of((0..200).map(|i| (i * 37) % 211));
        let mut expected = drain({
            let mut walk = SortedWalk::new(&tree, Side::Left);
            move || walk.next()
        });
        expected.sort_unstable();

        for mut keys in [
            drain({
                let mut walk = PreOrderWalk::new(&tree);
                move || walk.next()
            }),
            drain({
                let mut walk = PostOrderWalk::new(&tree);
                move || walk.next()
            }),
            drain({
                let mut walk = LevelWalk::new(&tree);
                move || walk.next()
            }),
        ] {
            keys.sort_unstable();
            assert_eq!(keys, expected);
        }
    }
}
