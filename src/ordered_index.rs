use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Bound, RangeBounds};

use crate::raw::{LevelWalk, PostOrderWalk, PreOrderWalk, RawAvlTree, Side, SortedWalk};

mod capacity;
mod iter;
mod order_statistic;

pub use iter::{BreadthFirst, IntoIter, Iter, PostOrder, PreOrder, Range, ReverseOrder};

/// An ordered set of keys stored in a height-balanced (AVL) binary search tree.
///
/// Every node caches the size and height of its subtree, which makes [`len`](Self::len),
/// [`depth`](Self::depth) and [`balance`](Self::balance) O(1) and rank lookups
/// ([`get`](Self::get), [`remove_at`](Self::remove_at)) O(log n). Insertion and removal rebalance
/// every ancestor of the changed node, so the tree's depth stays within about 1.44 log2(n).
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key, as determined by the [`Ord`] trait, changes while it is in the index. The index
/// never hands out mutable references to its keys, so this is only possible through interior
/// mutability, global state, I/O, or unsafe code. The behavior resulting from such a logic error
/// is not specified, but will be encapsulated to the `OrderedIndex` that observed it and not
/// result in undefined behavior.
///
/// All traversals are lazy, borrow the index immutably and keep their own explicit stack (or
/// queue), so they never recurse and can be restarted by simply calling the method again.
///
/// # Examples
///
/// ```
/// use avl_index::OrderedIndex;
///
/// let mut index = OrderedIndex::new();
/// for key in [12, 5, 9, 137, 42, 13, 28] {
///     index.insert(key);
/// }
///
/// assert_eq!(index.len(), 7);
/// assert_eq!(index.depth(), 4);
/// assert_eq!(index.balance(), -1);
/// assert!(index.contains(&42));
///
/// // Ranks count from the front, negative ranks from the back.
/// assert_eq!(index.get(0), Ok(&5));
/// assert_eq!(index.get(-1), Ok(&137));
///
/// // Bounded ranges, inclusive or exclusive at either end.
/// let middle: Vec<_> = index.irange(Some(&9), Some(&42), (false, true)).copied().collect();
/// assert_eq!(middle, [12, 13, 28, 42]);
///
/// let levels: Vec<_> = index.breadth_first().copied().collect();
/// assert_eq!(levels, [12, 9, 42, 5, 13, 137, 28]);
/// ```
pub struct OrderedIndex<T> {
    tree: RawAvlTree<T>,
}

impl<T> OrderedIndex<T> {
    /// Makes a new, empty `OrderedIndex`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index: OrderedIndex<i32> = OrderedIndex::new();
    /// assert!(index.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OrderedIndex {
            tree: RawAvlTree::new(),
        }
    }

    /// Removes every key, releasing all nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::from([1, 2, 3]);
    /// index.clear();
    /// assert!(index.is_empty());
    /// assert_eq!(index.depth(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the number of keys in the index. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the index holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of levels in the tree: 0 when empty, 1 for a single key. O(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// // Sequential inserts still produce a perfectly balanced tree.
    /// let index: OrderedIndex<u32> = (0..63).collect();
    /// assert_eq!(index.depth(), 6);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns the depth of the root's left subtree minus the depth of its right subtree.
    ///
    /// Always within `[-1, 1]`; 0 when empty. Positive means the left side is deeper.
    #[must_use]
    pub fn balance(&self) -> isize {
        self.tree.balance()
    }

    /// Returns the smallest key, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|handle| self.tree.node(handle).value())
    }

    /// Returns the largest key, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|handle| self.tree.node(handle).value())
    }

    /// Removes and returns the smallest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::from([2, 1]);
    /// assert_eq!(index.pop_first(), Some(1));
    /// assert_eq!(index.pop_first(), Some(2));
    /// assert_eq!(index.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        let handle = self.tree.first()?;
        Some(self.tree.remove_node(handle))
    }

    /// Removes and returns the largest key, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        let handle = self.tree.last()?;
        Some(self.tree.remove_node(handle))
    }

    /// Gets an iterator over the keys in ascending order (in-order traversal).
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([3, 1, 2]);
    /// assert_eq!(index.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: SortedWalk::new(&self.tree, Side::Left),
        }
    }

    /// Gets an iterator over the keys in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([3, 1, 2]);
    /// assert_eq!(index.reverse_order().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn reverse_order(&self) -> ReverseOrder<'_, T> {
        ReverseOrder {
            inner: SortedWalk::new(&self.tree, Side::Right),
        }
    }

    /// Gets an iterator visiting each node before its left subtree, and its left subtree before
    /// its right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([1, 2, 3]);
    /// assert_eq!(index.pre_order().copied().collect::<Vec<_>>(), [2, 1, 3]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder {
            inner: PreOrderWalk::new(&self.tree),
        }
    }

    /// Gets an iterator visiting both subtrees of a node, left first, before the node itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([1, 2, 3]);
    /// assert_eq!(index.post_order().copied().collect::<Vec<_>>(), [1, 3, 2]);
    /// ```
    pub fn post_order(&self) -> PostOrder<'_, T> {
        PostOrder {
            inner: PostOrderWalk::new(&self.tree),
        }
    }

    /// Gets an iterator over the tree level by level, each level left to right.
    pub fn breadth_first(&self) -> BreadthFirst<'_, T> {
        BreadthFirst {
            inner: LevelWalk::new(&self.tree),
        }
    }
}

impl<T: Ord> OrderedIndex<T> {
    /// Adds a key to the index.
    ///
    /// Returns whether the key was newly inserted. An equal key already in the index is left
    /// untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new();
    /// assert!(index.insert(2));
    /// assert!(!index.insert(2));
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value)
    }

    /// Returns `true` if the index contains a key equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from(["a", "b"]);
    /// assert!(index.contains("a"));
    /// assert!(!index.contains("z"));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`, if any.
    pub fn get_key<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search(key).map(|handle| self.tree.node(handle).value())
    }

    /// Removes the key equal to `key`. Returns whether such a key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::from([1, 2]);
    /// assert!(index.remove(&2));
    /// assert!(!index.remove(&2));
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(key).is_some()
    }

    /// Removes and returns the key equal to `key`, if any.
    pub fn take<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(key)
    }

    /// Gets an ascending iterator over the keys within `range`.
    ///
    /// Unlike `BTreeSet::range`, an empty or inverted range is not an error: it simply yields
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    /// use std::ops::Bound::{Excluded, Included};
    ///
    /// let index: OrderedIndex<i32> = (0..10).collect();
    /// assert_eq!(index.range(3..6).copied().collect::<Vec<_>>(), [3, 4, 5]);
    /// assert_eq!(index.range((Excluded(7), Included(9))).copied().collect::<Vec<_>>(), [8, 9]);
    /// assert_eq!(index.range(6..3).count(), 0);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        T: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized + Ord,
    {
        Range {
            inner: self.tree.range_walk(range.start_bound(), range.end_bound()),
        }
    }

    /// Gets an ascending iterator over the keys between `start` and `stop`.
    ///
    /// A missing bound leaves that side open. `inclusive` says, for `start` and `stop`
    /// respectively, whether a key equal to the bound is included. With both bounds missing this
    /// is the same as [`iter`](Self::iter); with `stop < start` it yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([0, 1, 2, 3, 4]);
    /// let keys: Vec<_> = index.irange(Some(&1), Some(&3), (true, false)).copied().collect();
    /// assert_eq!(keys, [1, 2]);
    ///
    /// let tail: Vec<_> = index.irange(Some(&2), None, (false, true)).copied().collect();
    /// assert_eq!(tail, [3, 4]);
    /// ```
    pub fn irange<Q>(&self, start: Option<&Q>, stop: Option<&Q>, inclusive: (bool, bool)) -> Range<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if start.is_none() && stop.is_none() {
            return Range {
                inner: SortedWalk::new(&self.tree, Side::Left),
            };
        }
        Range {
            inner: self.tree.range_walk(to_bound(start, inclusive.0), to_bound(stop, inclusive.1)),
        }
    }
}

fn to_bound<Q: ?Sized>(limit: Option<&Q>, inclusive: bool) -> Bound<&Q> {
    match limit {
        None => Bound::Unbounded,
        Some(limit) if inclusive => Bound::Included(limit),
        Some(limit) => Bound::Excluded(limit),
    }
}

impl<T> Default for OrderedIndex<T> {
    /// Creates an empty `OrderedIndex`.
    fn default() -> Self {
        OrderedIndex::new()
    }
}

impl<T: Clone> Clone for OrderedIndex<T> {
    fn clone(&self) -> Self {
        OrderedIndex {
            tree: self.tree.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OrderedIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedIndex<T> {}

impl<T: Hash> Hash for OrderedIndex<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut index = OrderedIndex::new();
        index.extend(iter);
        index
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedIndex<T> {
    /// Converts a `[T; N]` into an `OrderedIndex<T>`, dropping duplicates.
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index1 = OrderedIndex::from([1, 2, 3, 4]);
    /// let index2: OrderedIndex<_> = [4, 3, 2, 1, 1].into();
    /// assert_eq!(index1, index2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Ord> Extend<T> for OrderedIndex<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for OrderedIndex<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a OrderedIndex<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for OrderedIndex<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the keys in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            index: self,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn keys<'a>(iter: impl Iterator<Item = &'a i32>) -> Vec<i32> {
        iter.copied().collect()
    }

    #[test]
    fn irange_without_bounds_is_in_order() {
        let index: OrderedIndex<i32> = [8, 3, 5, 1, 9].into();
        assert_eq!(keys(index.irange::<i32>(None, None, (false, false))), keys(index.iter()));
    }

    #[test]
    fn irange_inclusive_flags() {
        let index: OrderedIndex<i32> = (0..5).collect();
        assert_eq!(keys(index.irange(Some(&1), Some(&3), (true, true))), [1, 2, 3]);
        assert_eq!(keys(index.irange(Some(&1), Some(&3), (true, false))), [1, 2]);
        assert_eq!(keys(index.irange(Some(&1), Some(&3), (false, true))), [2, 3]);
        assert_eq!(keys(index.irange(Some(&1), Some(&3), (false, false))), [2]);
        assert_eq!(keys(index.irange(None, Some(&1), (true, true))), [0, 1]);
        assert_eq!(keys(index.irange(Some(&3), Some(&1), (true, true))), Vec::<i32>::new());
    }

    #[test]
    fn pops_from_both_ends() {
        let mut index: OrderedIndex<i32> = (1..=4).collect();
        assert_eq!(index.pop_last(), Some(4));
        assert_eq!(index.pop_first(), Some(1));
        assert_eq!(index.first(), Some(&2));
        assert_eq!(index.last(), Some(&3));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn take_and_get_key() {
        let mut index = OrderedIndex::from([10, 20]);
        assert_eq!(index.get_key(&10), Some(&10));
        assert_eq!(index.take(&10), Some(10));
        assert_eq!(index.take(&10), None);
        assert_eq!(index.get_key(&10), None);
    }

    #[test]
    fn debug_prints_as_set() {
        let index = OrderedIndex::from([2, 1]);
        assert_eq!(alloc::format!("{index:?}"), "{1, 2}");
        assert_eq!(alloc::format!("{:?}", index.reverse_order()), "[2, 1]");
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = OrderedIndex::from([1, 2, 3, 4, 5]);
        let b = OrderedIndex::from([5, 4, 3, 2, 1]);
        assert_eq!(a, b);
        assert_ne!(a, OrderedIndex::from([1, 2, 3]));
    }
}
