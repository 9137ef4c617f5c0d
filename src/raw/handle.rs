use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable reference to a node slot in the [`NodeArena`](super::arena::NodeArena).
///
/// Child and parent links are both handles, so a parent link never owns the node it points to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest slot index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        assert!(slot <= Self::MAX, "`Handle::from_slot()` - `slot` > `Handle::MAX`!");
        // Slots are stored off by one so that zero stays free for the `Option<Handle>` niche.
        match NonZero::new((slot + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Links are stored as `Option<Handle>`, which must not cost extra space.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_slot()` - `slot` > `Handle::MAX`!")]
    fn slot_past_max_panics() {
        let _ = Handle::from_slot(Handle::MAX + 1);
    }

    #[test]
    fn extreme_slots() {
        assert_eq!(Handle::from_slot(0).slot(), 0);
        assert_eq!(Handle::from_slot(Handle::MAX).slot(), Handle::MAX);
        assert_ne!(Handle::from_slot(0), Handle::from_slot(1));
    }

    proptest! {
        #[test]
        fn slot_survives_handle(slot in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::from_slot(slot).slot(), slot);
        }
    }
}
