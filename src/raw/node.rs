use core::mem;

use super::handle::Handle;

/// A single tree cell.
///
/// Children are owned (through the arena); `parent` is a lookup aid only. `size` and `height`
/// cache the statistics of the subtree rooted here and are refreshed by the tree whenever this
/// node's children change.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    value: T,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    // Number of nodes in this subtree, including this one.
    size: usize,
    // Longest root-to-leaf path in this subtree, counted in nodes.
    height: usize,
}

impl<T> Node<T> {
    /// Creates a leaf hanging under `parent`.
    pub(crate) const fn leaf(value: T, parent: Option<Handle>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
            size: 1,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    /// Swaps in a new key, returning the old one. Callers keep the ordering invariant.
    pub(crate) fn replace_value(&mut self, value: T) -> T {
        mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Returns which side `child` hangs on, or `None` if it is not a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn set_stats(&mut self, size: usize, height: usize) {
        self.size = size;
        self.height = height;
    }
}

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
