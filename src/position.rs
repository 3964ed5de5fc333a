use crate::store::Handle;

/// A lightweight position within an [`OSList`](crate::OSList).
///
/// A position names either one element or the end of the list (one past the
/// last element). It does not borrow the list, so it can be kept across
/// mutations; it stays valid until the element it names is erased. Using a
/// position after that, or with a different list, is a logic error: it never
/// causes undefined behavior but may panic or name an unrelated element.
///
/// Positions compare equal when they name the same element. Their order
/// depends on the list they belong to; see [`OSList::index_of`](crate::OSList::index_of)
/// and [`Cursor`](crate::oslist::Cursor), which is ordered by index.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let mut list = OSList::from([1, 2, 4]);
/// let four = list.position_at(2).unwrap();
/// list.insert(four, 3);
///
/// // `four` still names the element 4, now at index 3.
/// assert_eq!(list.index_of(four), 3);
/// assert_eq!(list.value_at(four), Some(&4));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(pub(crate) Option<Handle>);

impl Position {
    /// The end position of every list.
    pub const END: Position = Position(None);

    /// Returns `true` if this is the end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }
}
