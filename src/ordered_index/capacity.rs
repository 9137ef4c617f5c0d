use super::OrderedIndex;
use crate::raw::RawAvlTree;

impl<T> OrderedIndex<T> {
    /// Creates an empty index with room for at least `capacity` keys before its node storage
    /// reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index: OrderedIndex<i32> = OrderedIndex::with_capacity(16);
    /// assert!(index.is_empty());
    /// assert!(index.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedIndex {
            tree: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns how many keys the index can hold before its node storage reallocates.
    ///
    /// Slots released by removals are reused, so this never shrinks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }
}
