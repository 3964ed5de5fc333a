use super::handle::{Handle, RawHandle};

/// The number of nodes in a subtree, stored as narrowly as a handle.
///
/// A store never holds more than `Handle::MAX` nodes, so every subtree size
/// fits in the handle's raw width.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub(crate) struct Size(RawHandle);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ZERO: Self = Self(0);
    pub(crate) const ONE: Self = Self(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(size as RawHandle)
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// The size of a node whose children have sizes `left` and `right`.
    #[inline]
    pub(crate) const fn parent_of(left: usize, right: usize) -> Self {
        Self::from_usize(1 + left + right)
    }
}
