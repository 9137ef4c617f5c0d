use core::fmt;
use core::iter::FusedIterator;

use super::OrderedIndex;
use crate::raw::{LevelWalk, PostOrderWalk, PreOrderWalk, SortedWalk};

/// Declares a borrowing iterator that forwards to one of the raw walks.
macro_rules! walk_iterator {
    ($(#[$meta:meta])* $name:ident => $walk:ident) => {
        $(#[$meta])*
        #[must_use = "iterators are lazy and do nothing unless consumed"]
        pub struct $name<'a, T: 'a> {
            pub(super) inner: $walk<'a, T>,
        }

        impl<'a, T> Iterator for $name<'a, T> {
            type Item = &'a T;

            #[inline]
            fn next(&mut self) -> Option<&'a T> {
                self.inner.next()
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.inner.len(), Some(self.inner.len()))
            }
        }

        impl<T> ExactSizeIterator for $name<'_, T> {
            fn len(&self) -> usize {
                self.inner.len()
            }
        }

        impl<T> FusedIterator for $name<'_, T> {}

        impl<T> Clone for $name<'_, T> {
            fn clone(&self) -> Self {
                Self {
                    inner: self.inner.clone(),
                }
            }
        }

        impl<T: fmt::Debug> fmt::Debug for $name<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.clone()).finish()
            }
        }
    };
}

walk_iterator! {
    /// An ascending (in-order) iterator over the keys of an `OrderedIndex`.
    ///
    /// This `struct` is created by the [`iter`] method on [`OrderedIndex`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([3, 1, 2]);
    /// let mut iter = index.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.len(), 2);
    /// ```
    ///
    /// [`iter`]: OrderedIndex::iter
    Iter => SortedWalk
}

walk_iterator! {
    /// A descending iterator over the keys of an `OrderedIndex`.
    ///
    /// This `struct` is created by the [`reverse_order`] method on [`OrderedIndex`].
    ///
    /// [`reverse_order`]: OrderedIndex::reverse_order
    ReverseOrder => SortedWalk
}

walk_iterator! {
    /// A pre-order (node, left, right) iterator over the keys of an `OrderedIndex`.
    ///
    /// This `struct` is created by the [`pre_order`] method on [`OrderedIndex`].
    ///
    /// [`pre_order`]: OrderedIndex::pre_order
    PreOrder => PreOrderWalk
}

walk_iterator! {
    /// A post-order (left, right, node) iterator over the keys of an `OrderedIndex`.
    ///
    /// This `struct` is created by the [`post_order`] method on [`OrderedIndex`].
    ///
    /// [`post_order`]: OrderedIndex::post_order
    PostOrder => PostOrderWalk
}

walk_iterator! {
    /// A level-order iterator over the keys of an `OrderedIndex`: the root, then its children
    /// left to right, then their children, and so on.
    ///
    /// This `struct` is created by the [`breadth_first`] method on [`OrderedIndex`].
    ///
    /// [`breadth_first`]: OrderedIndex::breadth_first
    BreadthFirst => LevelWalk
}

walk_iterator! {
    /// An ascending iterator over the keys of an `OrderedIndex` that fall within bounds.
    ///
    /// This `struct` is created by the [`range`] and [`irange`] methods on [`OrderedIndex`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::from([1, 2, 3, 4]);
    /// let range = index.range(2..=3);
    /// assert_eq!(range.len(), 2);
    /// assert_eq!(range.copied().collect::<Vec<_>>(), [2, 3]);
    /// ```
    ///
    /// [`range`]: OrderedIndex::range
    /// [`irange`]: OrderedIndex::irange
    Range => SortedWalk
}

/// An owning iterator over the keys of an `OrderedIndex` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedIndex`]
/// (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use avl_index::OrderedIndex;
///
/// let index = OrderedIndex::from([1, 2, 3]);
/// let mut iter = index.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: OrderedIndex#method.into_iter
pub struct IntoIter<T> {
    pub(super) index: OrderedIndex<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.index.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.index.len(), Some(self.index.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.index.pop_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.index.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.index).finish()
    }
}
