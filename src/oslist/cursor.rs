use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use super::{OSList, capacity_exhausted};
use crate::raw::{Arena, Handle, Node};
use crate::store::NodeStore;
use crate::{CapacityError, OutOfRange, Position};

/// A cursor over an `OSList`.
///
/// A cursor points at an element, or at the "ghost" end position that sits
/// between the last and the first element. Stepping with
/// [`move_next`](Cursor::move_next) and [`move_prev`](Cursor::move_prev) is
/// O(1) and wraps through the ghost. Jumping with [`advance`](Cursor::advance)
/// or `cursor + offset` is O(log n) however far the jump is, and does not wrap.
///
/// Cursors of the same list are ordered by index, and subtracting two cursors
/// gives the signed distance between them. Comparing cursors of different
/// lists is a logic error.
///
/// This `struct` is created by [`OSList::cursor_front`], [`OSList::cursor_at`]
/// and related methods.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let list: OSList<u32> = (0..100).collect();
/// let start = list.cursor_at(10).unwrap();
/// let end = start + 45;
/// assert_eq!(end.current(), Some(&55));
/// assert_eq!(end - start, 45);
/// assert!(start < end);
/// assert_eq!(end.peek(-5), Some(&50));
/// ```
pub struct Cursor<'a, T, S = Arena<Node<T>>> {
    list: &'a OSList<T, S>,
    current: Option<Handle>,
}

/// A cursor over an `OSList` with editing operations.
///
/// Positions and movement work as for [`Cursor`]. In addition the list can be
/// edited around the cursor in O(log n) per element.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let mut list = OSList::from([1, 2, 4]);
/// let mut cursor = list.cursor_back_mut();
/// cursor.insert_before(3);
/// cursor.insert_after(5);
/// assert_eq!(cursor.index(), 3);
///
/// // The ghost position inserts at the front when inserting after it.
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.current(), None);
/// cursor.insert_after(0);
///
/// assert!(list.iter().eq(&[0, 1, 2, 3, 4, 5]));
/// ```
pub struct CursorMut<'a, T, S = Arena<Node<T>>> {
    list: &'a mut OSList<T, S>,
    current: Option<Handle>,
}

/// Converts an index into an offset. Indices never exceed `Handle::MAX`.
#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn signed(index: usize) -> isize {
    index as isize
}

impl<T, S: NodeStore<T>> OSList<T, S> {
    /// Returns a cursor at `pos`.
    pub fn cursor(&self, pos: Position) -> Cursor<'_, T, S> {
        Cursor { list: self, current: pos.0 }
    }

    /// Returns a cursor at the first element, or at the ghost position if the
    /// list is empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn cursor_front(&self) -> Cursor<'_, T, S> {
        self.cursor(self.begin())
    }

    /// Returns a cursor at the last element, or at the ghost position if the
    /// list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list = OSList::from([1, 2, 3]);
    /// let mut cursor = list.cursor_back();
    /// let mut reversed = Vec::new();
    /// while let Some(value) = cursor.current() {
    ///     reversed.push(*value);
    ///     cursor.move_prev();
    /// }
    /// assert_eq!(reversed, [3, 2, 1]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn cursor_back(&self) -> Cursor<'_, T, S> {
        self.cursor(Position(self.raw.last()))
    }

    /// Returns a cursor at the ghost position.
    pub fn cursor_end(&self) -> Cursor<'_, T, S> {
        self.cursor(Position::END)
    }

    /// Returns a cursor at `index`; `index == len` gives the ghost position.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Index`] if `index > len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<'_, T, S>, OutOfRange> {
        let pos = self.position_at(index)?;
        Ok(self.cursor(pos))
    }

    /// Returns an editing cursor at `pos`.
    pub fn cursor_mut(&mut self, pos: Position) -> CursorMut<'_, T, S> {
        CursorMut { list: self, current: pos.0 }
    }

    /// Returns an editing cursor at the first element, or at the ghost
    /// position if the list is empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, S> {
        let pos = self.begin();
        self.cursor_mut(pos)
    }

    /// Returns an editing cursor at the last element, or at the ghost position
    /// if the list is empty.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, S> {
        let pos = Position(self.raw.last());
        self.cursor_mut(pos)
    }

    /// Returns an editing cursor at the ghost position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, S> {
        self.cursor_mut(Position::END)
    }

    /// Returns an editing cursor at `index`; `index == len` gives the ghost
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Index`] if `index > len`.
    pub fn cursor_at_mut(&mut self, index: usize) -> Result<CursorMut<'_, T, S>, OutOfRange> {
        let pos = self.position_at(index)?;
        Ok(self.cursor_mut(pos))
    }
}

impl<'a, T, S: NodeStore<T>> Cursor<'a, T, S> {
    /// Returns the position the cursor points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position(self.current)
    }

    /// Returns the index the cursor points at; the ghost position is at `len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn index(&self) -> usize {
        self.list.raw.index_of(self.current)
    }

    /// Returns the element the cursor points at, or `None` at the ghost position.
    #[must_use]
    pub fn current(&self) -> Option<&'a T> {
        let list = self.list;
        self.current.map(|h| list.raw.value(h))
    }

    /// Moves to the next element. The ghost position moves to the first
    /// element, and the last element moves to the ghost position.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn move_next(&mut self) {
        self.current = self.list.raw.next_of(self.current);
    }

    /// Moves to the previous element. The ghost position moves to the last
    /// element, and the first element moves to the ghost position.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn move_prev(&mut self) {
        self.current = self.list.raw.prev_of(self.current);
    }

    /// Moves `offset` elements forward (or backward if negative).
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Offset`] if the target lies before the first
    /// element or past the ghost position; the cursor does not move.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::{OSList, OutOfRange};
    ///
    /// let list = OSList::from(['a', 'b', 'c']);
    /// let mut cursor = list.cursor_front();
    /// cursor.advance(2).unwrap();
    /// assert_eq!(cursor.current(), Some(&'c'));
    /// cursor.advance(1).unwrap();
    /// assert_eq!(cursor.current(), None);
    /// assert_eq!(cursor.advance(1), Err(OutOfRange::Offset { offset: 1, len: 3 }));
    /// cursor.advance(-3).unwrap();
    /// assert_eq!(cursor.current(), Some(&'a'));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn advance(&mut self, offset: isize) -> Result<(), OutOfRange> {
        self.current = self.list.raw.offset(self.current, offset)?;
        Ok(())
    }

    /// Returns the element `offset` positions away, or `None` if that is the
    /// ghost position or outside the list.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn peek(&self, offset: isize) -> Option<&'a T> {
        let list = self.list;
        let target = list.raw.offset(self.current, offset).ok()??;
        Some(list.raw.value(target))
    }

    /// Returns the next element without moving. Wraps like [`move_next`](Self::move_next).
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        let list = self.list;
        list.raw.next_of(self.current).map(|h| list.raw.value(h))
    }

    /// Returns the previous element without moving. Wraps like [`move_prev`](Self::move_prev).
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        let list = self.list;
        list.raw.prev_of(self.current).map(|h| list.raw.value(h))
    }

    /// Returns the list this cursor belongs to.
    #[must_use]
    pub const fn as_list(&self) -> &'a OSList<T, S> {
        self.list
    }
}

impl<T, S> Clone for Cursor<'_, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S> Copy for Cursor<'_, T, S> {}

impl<T, S> PartialEq for Cursor<'_, T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T, S> Eq for Cursor<'_, T, S> {}

impl<T, S: NodeStore<T>> PartialOrd for Cursor<'_, T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, S: NodeStore<T>> Ord for Cursor<'_, T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.current == other.current {
            return Ordering::Equal;
        }
        self.index().cmp(&other.index())
    }
}

impl<T, S: NodeStore<T>> AddAssign<isize> for Cursor<'_, T, S> {
    /// Moves the cursor `offset` elements.
    ///
    /// # Panics
    ///
    /// Panics if the target is outside the list. See [`Cursor::advance`].
    #[track_caller]
    fn add_assign(&mut self, offset: isize) {
        if let Err(error) = self.advance(offset) {
            panic!("`Cursor::add_assign()` - {error}!");
        }
    }
}

impl<T, S: NodeStore<T>> SubAssign<isize> for Cursor<'_, T, S> {
    /// Moves the cursor `offset` elements backward.
    ///
    /// # Panics
    ///
    /// Panics if the target is outside the list. See [`Cursor::advance`].
    #[track_caller]
    fn sub_assign(&mut self, offset: isize) {
        let moved = offset.checked_neg().map(|back| self.advance(back));
        if !matches!(moved, Some(Ok(()))) {
            let error = OutOfRange::Offset {
                offset,
                len: self.list.len(),
            };
            panic!("`Cursor::sub_assign()` - {error}!");
        }
    }
}

impl<T, S: NodeStore<T>> Add<isize> for Cursor<'_, T, S> {
    type Output = Self;

    #[track_caller]
    fn add(mut self, offset: isize) -> Self {
        self += offset;
        self
    }
}

impl<T, S: NodeStore<T>> Sub<isize> for Cursor<'_, T, S> {
    type Output = Self;

    #[track_caller]
    fn sub(mut self, offset: isize) -> Self {
        self -= offset;
        self
    }
}

impl<T, S: NodeStore<T>> Sub for Cursor<'_, T, S> {
    type Output = isize;

    /// Returns the signed distance from `other` to `self`.
    fn sub(self, other: Self) -> isize {
        signed(self.index()) - signed(other.index())
    }
}

impl<T: fmt::Debug, S: NodeStore<T>> fmt::Debug for Cursor<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}

impl<'a, T, S: NodeStore<T>> CursorMut<'a, T, S> {
    /// Returns the position the cursor points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position(self.current)
    }

    /// Returns the index the cursor points at; the ghost position is at `len`.
    #[must_use]
    pub fn index(&self) -> usize {
        self.list.raw.index_of(self.current)
    }

    /// Returns the element the cursor points at, or `None` at the ghost position.
    #[must_use]
    pub fn current(&mut self) -> Option<&mut T> {
        let handle = self.current?;
        Some(self.list.raw.value_mut(handle))
    }

    /// Moves to the next element, wrapping through the ghost position.
    pub fn move_next(&mut self) {
        self.current = self.list.raw.next_of(self.current);
    }

    /// Moves to the previous element, wrapping through the ghost position.
    pub fn move_prev(&mut self) {
        self.current = self.list.raw.prev_of(self.current);
    }

    /// Moves `offset` elements forward (or backward if negative).
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Offset`] if the target lies before the first
    /// element or past the ghost position; the cursor does not move.
    pub fn advance(&mut self, offset: isize) -> Result<(), OutOfRange> {
        self.current = self.list.raw.offset(self.current, offset)?;
        Ok(())
    }

    /// Returns a read-only cursor at the same position, borrowing this one.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, T, S> {
        Cursor {
            list: &*self.list,
            current: self.current,
        }
    }

    /// Inserts `value` before the cursor; at the ghost position this appends.
    ///
    /// The cursor keeps pointing at the same element.
    ///
    /// # Panics
    ///
    /// Panics if the node store is full.
    #[track_caller]
    pub fn insert_before(&mut self, value: T) {
        if let Err(error) = self.try_insert_before(value) {
            capacity_exhausted("insert", error);
        }
    }

    /// Inserts `value` before the cursor; at the ghost position this appends.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store is full.
    pub fn try_insert_before(&mut self, value: T) -> Result<(), CapacityError> {
        self.list.raw.insert_before(self.current, value).map(drop)
    }

    /// Inserts `value` after the cursor; at the ghost position this prepends.
    ///
    /// The cursor keeps pointing at the same element.
    ///
    /// # Panics
    ///
    /// Panics if the node store is full.
    #[track_caller]
    pub fn insert_after(&mut self, value: T) {
        if let Err(error) = self.try_insert_after(value) {
            capacity_exhausted("insert", error);
        }
    }

    /// Inserts `value` after the cursor; at the ghost position this prepends.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store is full.
    pub fn try_insert_after(&mut self, value: T) -> Result<(), CapacityError> {
        let next = self.list.raw.next_of(self.current);
        self.list.raw.insert_before(next, value).map(drop)
    }

    /// Removes the current element and moves to its successor.
    ///
    /// Returns `None`, without moving, at the ghost position.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// let mut cursor = list.cursor_at_mut(1).unwrap();
    /// assert_eq!(cursor.remove_current(), Some(2));
    /// assert_eq!(cursor.current(), Some(&mut 3));
    /// assert!(list.iter().eq(&[1, 3]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_current(&mut self) -> Option<T> {
        let (value, next) = self.list.raw.remove(self.current?);
        self.current = next;
        Some(value)
    }

    /// Returns the list this cursor belongs to.
    #[must_use]
    pub fn as_list(&self) -> &OSList<T, S> {
        &*self.list
    }
}

impl<T: fmt::Debug, S: NodeStore<T>> fmt::Debug for CursorMut<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index())
            .field("current", &self.current.map(|h| self.list.raw.value(h)))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::format;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stepping_wraps_through_the_ghost() {
        let list = OSList::from([1, 2]);
        let mut cursor = list.cursor_front();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(cursor.current().copied());
            cursor.move_next();
        }
        assert_eq!(seen, vec![Some(1), Some(2), None, Some(1), Some(2), None]);

        for _ in 0..3 {
            cursor.move_prev();
        }
        assert_eq!(cursor.current(), Some(&1));
    }

    #[test]
    fn empty_list_cursors() {
        let list: OSList<i32> = OSList::new();
        let mut cursor = list.cursor_front();
        assert_eq!(cursor, list.cursor_end());
        assert_eq!(cursor, list.cursor_back());
        assert_eq!(cursor.index(), 0);
        cursor.move_next();
        assert_eq!(cursor.current(), None);
        assert!(cursor.advance(0).is_ok());
        assert_eq!(cursor.advance(1), Err(OutOfRange::Offset { offset: 1, len: 0 }));
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.peek_prev(), None);
    }

    #[test]
    fn failed_advance_does_not_move() {
        let list = OSList::from([1, 2, 3]);
        let mut cursor = list.cursor_at(1).unwrap();
        assert_eq!(cursor.advance(-2), Err(OutOfRange::Offset { offset: -2, len: 3 }));
        assert_eq!(cursor.advance(3), Err(OutOfRange::Offset { offset: 3, len: 3 }));
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.peek(-2), None);
        assert_eq!(cursor.peek(2), None);
        assert_eq!(cursor.peek(1), Some(&3));
    }

    #[test]
    fn ordering_by_index() {
        let list: OSList<u8> = (0..10).collect();
        let a = list.cursor_at(3).unwrap();
        let b = list.cursor_at(7).unwrap();
        let end = list.cursor_end();
        assert!(a < b);
        assert!(b < end);
        assert_eq!(a.max(b), b);
        assert_eq!(end - a, 7);
        assert_eq!(a - end, -7);
        assert_eq!(b - 4, a);
    }

    #[test]
    #[should_panic(expected = "`Cursor::add_assign()` - offset 4 moves a cursor outside a list of length 3!")]
    fn add_past_the_end_panics() {
        let list = OSList::from([1, 2, 3]);
        let _ = list.cursor_front() + 4;
    }

    #[test]
    fn debug_shows_index_and_value() {
        let mut list = OSList::from(['q']);
        assert_eq!(format!("{:?}", list.cursor_front()), "Cursor { index: 0, current: Some('q') }");
        assert_eq!(format!("{:?}", list.cursor_end_mut()), "CursorMut { index: 1, current: None }");
    }

    #[test]
    fn editing_around_the_cursor() {
        let mut list = OSList::from([10, 20, 30]);
        let mut cursor = list.cursor_at_mut(1).unwrap();
        cursor.insert_before(15);
        cursor.insert_after(25);
        assert_eq!(cursor.index(), 2);
        *cursor.current().unwrap() += 1;
        cursor.advance(2).unwrap();
        assert_eq!(cursor.remove_current(), Some(30));
        assert_eq!(cursor.position(), Position::END);
        assert_eq!(cursor.remove_current(), None);
        assert_eq!(cursor.as_cursor().peek_prev(), Some(&25));
        assert_eq!(cursor.as_list().len(), 4);
        assert_eq!(list.raw.to_vec(), vec![10, 15, 21, 25]);
        list.raw.validate_invariants();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn offset_arithmetic(len in 0usize..200, from in any::<usize>(), to in any::<usize>()) {
            let list: OSList<usize> = (0..len).collect();
            let from = from % (len + 1);
            let to = to % (len + 1);
            let distance = signed(to) - signed(from);

            let start = list.cursor_at(from).unwrap();
            let target = start + distance;
            prop_assert_eq!(target.index(), to);
            prop_assert_eq!(target - start, distance);
            prop_assert_eq!(target - distance, start);
            prop_assert_eq!(target.current(), list.get(to));
            prop_assert_eq!(start.peek(distance), list.get(to));
            prop_assert_eq!(start.cmp(&target), from.cmp(&to));
        }

        #[test]
        fn stepping_matches_indices(len in 1usize..100, steps in prop::collection::vec(any::<bool>(), 0..300)) {
            let list: OSList<usize> = (0..len).collect();
            let mut cursor = list.cursor_front();
            let mut index = 0;

            for forward in steps {
                if forward {
                    cursor.move_next();
                    index = (index + 1) % (len + 1);
                } else {
                    cursor.move_prev();
                    index = (index + len) % (len + 1);
                }
                prop_assert_eq!(cursor.index(), index);
                prop_assert_eq!(cursor.current(), list.get(index));
            }
        }
    }
}
