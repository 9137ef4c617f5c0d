use core::borrow::Borrow;
use core::ops::Index;

use log::debug;

use super::OrderedIndex;
use crate::{IndexError, Rank};

impl<T> OrderedIndex<T> {
    /// Returns the key at position `index` in sorted order.
    ///
    /// Non-negative indices count from the smallest key (0 is the first); negative indices count
    /// from the largest (-1 is the last). Anything outside `[-len, len)` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] when `index` is outside `[-len, len)`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::{IndexError, OrderedIndex};
    ///
    /// let index: OrderedIndex<i32> = (100..120).collect();
    /// assert_eq!(index.get(0), Ok(&100));
    /// assert_eq!(index.get(-1), Ok(&119));
    /// assert_eq!(index.get(20), Err(IndexError::OutOfRange { index: 20, len: 20 }));
    /// assert!(index.get(-21).is_err());
    /// ```
    pub fn get(&self, index: isize) -> Result<&T, IndexError> {
        let rank = self.resolve(index)?;
        Ok(self.get_by_rank(rank).expect("`OrderedIndex::get()` - subtree sizes disagree with `len`!"))
    }

    /// Removes and returns the key at position `index` in sorted order.
    ///
    /// Accepts the same positions as [`get`](Self::get). The index is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] when `index` is outside `[-len, len)`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::from([5, 1, 3]);
    /// assert_eq!(index.remove_at(-1), Ok(5));
    /// assert_eq!(index.remove_at(0), Ok(1));
    /// assert!(index.remove_at(1).is_err());
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn remove_at(&mut self, index: isize) -> Result<T, IndexError> {
        let rank = self.resolve(index)?;
        let handle = self.tree.select(rank).expect("`OrderedIndex::remove_at()` - subtree sizes disagree with `len`!");
        Ok(self.tree.remove_node(handle))
    }

    /// Returns the key at zero-based `rank` in sorted order, or `None` if `rank >= len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([10, 20, 30]);
    /// assert_eq!(index.get_by_rank(1), Some(&20));
    /// assert!(index.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.tree.select(rank).map(|handle| self.tree.node(handle).value())
    }

    /// Maps a possibly negative position onto a rank in `[0, len)`.
    fn resolve(&self, index: isize) -> Result<usize, IndexError> {
        let len = self.len();
        let rank = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };

        match rank {
            Some(rank) if rank < len => Ok(rank),
            _ => {
                debug!("rejected index {index} for ordered index of length {len}");
                Err(IndexError::OutOfRange {
                    index,
                    len,
                })
            }
        }
    }
}

impl<T: Ord> OrderedIndex<T> {
    /// Returns the zero-based rank of `key` in sorted order, or `None` if it is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([10, 20]);
    /// assert_eq!(index.rank_of(&20), Some(1));
    /// assert_eq!(index.rank_of(&15), None);
    /// ```
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.rank_of(key)
    }
}

/// Indexes into the ordered index by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<T> Index<Rank> for OrderedIndex<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn negative_indices_count_from_the_end() {
        let index: OrderedIndex<i32> = (100..120).collect();
        assert_eq!(index.get(-1), Ok(&119));
        assert_eq!(index.get(-20), Ok(&100));
        assert_eq!(
            index.get(-21),
            Err(IndexError::OutOfRange {
                index: -21,
                len: 20
            })
        );
        assert_eq!(
            index.get(isize::MIN),
            Err(IndexError::OutOfRange {
                index: isize::MIN,
                len: 20
            })
        );
    }

    #[test]
    fn empty_index_rejects_every_position() {
        let mut index: OrderedIndex<i32> = OrderedIndex::new();
        assert!(index.get(0).is_err());
        assert!(index.get(-1).is_err());
        assert!(index.remove_at(0).is_err());
    }

    #[test]
    fn failed_remove_at_leaves_index_untouched() {
        let mut index = OrderedIndex::from([1, 2, 3]);
        assert!(index.remove_at(3).is_err());
        assert!(index.remove_at(-4).is_err());
        assert_eq!(index, OrderedIndex::from([1, 2, 3]));
    }

    #[test]
    fn index_by_rank() {
        let index = OrderedIndex::from(['c', 'a', 'b']);
        assert_eq!(index[Rank(0)], 'a');
        assert_eq!(index[Rank(2)], 'c');
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_by_rank_past_end_panics() {
        let index = OrderedIndex::from([1]);
        let _ = index[Rank(1)];
    }
}
