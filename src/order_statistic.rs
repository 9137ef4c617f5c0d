/// A zero-based rank into the sorted order of an [`OrderedIndex`](crate::OrderedIndex).
///
/// Indexing with a `Rank` panics when out of bounds, like slice indexing. Use
/// [`OrderedIndex::get`](crate::OrderedIndex::get) for a fallible lookup that also accepts
/// negative (from-the-end) positions.
///
/// # Examples
///
/// ```
/// use avl_index::{OrderedIndex, Rank};
///
/// let index = OrderedIndex::from([30, 10, 20]);
///
/// assert_eq!(index[Rank(0)], 10);
/// assert_eq!(index[Rank(2)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
