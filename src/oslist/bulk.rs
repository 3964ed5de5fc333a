use core::convert::Infallible;
use core::iter;

use super::{OSList, capacity_exhausted};
use crate::raw::{Handle, RawOSList};
use crate::store::NodeStore;
use crate::{CapacityError, InsertError, Position};

/// Removes a partially inserted run when a bulk insertion does not complete.
///
/// The run sits immediately before `anchor`, newest element last, so it is
/// removed newest first by repeatedly taking the anchor's predecessor. This
/// also runs during unwinding if producing an element panics.
struct Rollback<'a, T, S: NodeStore<T>> {
    raw: &'a mut RawOSList<T, S>,
    anchor: Option<Handle>,
    inserted: usize,
}

impl<T, S: NodeStore<T>> Rollback<'_, T, S> {
    /// Keeps the inserted run.
    fn commit(mut self) {
        self.inserted = 0;
    }
}

impl<T, S: NodeStore<T>> Drop for Rollback<'_, T, S> {
    fn drop(&mut self) {
        for _ in 0..self.inserted {
            let handle = self
                .raw
                .prev_of(self.anchor)
                .expect("`Rollback::drop()` - inserted run is shorter than recorded!");
            self.raw.remove(handle);
        }
    }
}

fn into_capacity_error(error: InsertError<Infallible>) -> CapacityError {
    match error {
        InsertError::Capacity(error) => error,
        InsertError::Element(never) => match never {},
    }
}

impl<T, S: NodeStore<T>> OSList<T, S> {
    /// Inserts the produced elements before `pos`, in order, or none of them.
    fn insert_results<E, I>(&mut self, pos: Position, iter: I) -> Result<Position, InsertError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let anchor = pos.0;
        let mut rollback = Rollback {
            raw: &mut self.raw,
            anchor,
            inserted: 0,
        };

        let mut first = None;
        for item in iter {
            let value = item.map_err(InsertError::Element)?;
            let handle = rollback.raw.insert_before(anchor, value)?;
            first = first.or(Some(handle));
            rollback.inserted += 1;
        }

        rollback.commit();
        Ok(first.map_or(pos, |h| Position(Some(h))))
    }

    /// Inserts `n` copies of `value` before `pos` and returns the position of
    /// the first copy, or `pos` if `n` is zero.
    ///
    /// # Panics
    ///
    /// Panics if the node store fills up, after removing the copies already
    /// inserted. See [`try_insert_n`](Self::try_insert_n).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 5]);
    /// let five = list.position_at(1).unwrap();
    /// let first = list.insert_n(five, 3, 0);
    /// assert_eq!(list.index_of(first), 1);
    /// assert!(list.iter().eq(&[1, 0, 0, 0, 5]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log (len + n))
    #[track_caller]
    pub fn insert_n(&mut self, pos: Position, n: usize, value: T) -> Position
    where
        T: Clone,
    {
        self.try_insert_n(pos, n, value).unwrap_or_else(|error| capacity_exhausted("insert_n", error))
    }

    /// Inserts `n` copies of `value` before `pos` and returns the position of
    /// the first copy, or `pos` if `n` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store fills up. The list is left
    /// exactly as it was before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    /// use wabi_list::store::Arena;
    ///
    /// let mut list = OSList::with_store(Arena::with_limit(4));
    /// list.push_back('a');
    /// list.push_back('b');
    /// assert!(list.try_insert_n(list.end(), 3, 'z').is_err());
    /// assert!(list.iter().eq(&['a', 'b']));
    /// ```
    pub fn try_insert_n(&mut self, pos: Position, n: usize, value: T) -> Result<Position, CapacityError>
    where
        T: Clone,
    {
        self.insert_results(pos, iter::repeat_n(value, n).map(Ok::<T, Infallible>))
            .map_err(into_capacity_error)
    }

    /// Inserts every element of `iter` before `pos`, in order, and returns the
    /// position of the first one, or `pos` if `iter` is empty.
    ///
    /// The source is iterated exactly once. If it panics, the elements already
    /// inserted are removed before the panic continues.
    ///
    /// # Panics
    ///
    /// Panics if the node store fills up, after removing the elements already
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 5]);
    /// let five = list.position_at(1).unwrap();
    /// let two = list.insert_range(five, 2..=4);
    /// assert_eq!(list.value_at(two), Some(&2));
    /// assert!(list.iter().eq(&[1, 2, 3, 4, 5]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log (len + k)) for `k` inserted elements.
    #[track_caller]
    pub fn insert_range<I: IntoIterator<Item = T>>(&mut self, pos: Position, iter: I) -> Position {
        self.insert_results(pos, iter.into_iter().map(Ok::<T, Infallible>))
            .unwrap_or_else(|error| capacity_exhausted("insert_range", into_capacity_error(error)))
    }

    /// Inserts the elements produced by `iter` before `pos`, in order, and
    /// returns the position of the first one, or `pos` if `iter` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Element`] with the first error `iter` produces, or
    /// [`InsertError::Capacity`] if the node store fills up. Either way the
    /// list is left exactly as it was before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::{InsertError, OSList};
    ///
    /// let mut list = OSList::from([0, 100]);
    /// let hundred = list.position_at(1).unwrap();
    ///
    /// let parsed = ["1", "2", "x", "4"].into_iter().map(str::parse::<i32>);
    /// let result = list.try_insert_range(hundred, parsed);
    /// assert!(matches!(result, Err(InsertError::Element(_))));
    /// assert!(list.iter().eq(&[0, 100]));
    ///
    /// let parsed = ["1", "2", "3"].into_iter().map(str::parse::<i32>);
    /// list.try_insert_range(hundred, parsed).unwrap();
    /// assert!(list.iter().eq(&[0, 1, 2, 3, 100]));
    /// ```
    pub fn try_insert_range<E, I>(&mut self, pos: Position, iter: I) -> Result<Position, InsertError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        self.insert_results(pos, iter)
    }

    /// Resizes the list to `len` elements, appending copies of `value` or
    /// popping elements from the back.
    ///
    /// # Panics
    ///
    /// Panics if the node store fills up, after removing the copies already
    /// appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// list.resize(5, 0);
    /// assert!(list.iter().eq(&[1, 2, 3, 0, 0]));
    /// list.resize(2, 0);
    /// assert!(list.iter().eq(&[1, 2]));
    /// ```
    #[track_caller]
    pub fn resize(&mut self, len: usize, value: T)
    where
        T: Clone,
    {
        let current = self.len();
        if len > current {
            self.insert_n(Position::END, len - current, value);
        } else {
            for _ in len..current {
                self.pop_back();
            }
        }
    }

    /// Replaces the contents with `n` copies of `value`.
    ///
    /// The replacement is built in a fresh store before the old contents are
    /// dropped, so the list is untouched if building it panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// list.assign_n(2, 7);
    /// assert!(list.iter().eq(&[7, 7]));
    /// ```
    #[track_caller]
    pub fn assign_n(&mut self, n: usize, value: T)
    where
        T: Clone,
    {
        let mut list = Self::with_store(self.raw.store().new_like());
        list.insert_n(Position::END, n, value);
        self.swap(&mut list);
    }

    /// Replaces the contents with the elements of `iter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// list.assign_range("ab".chars().map(u32::from));
    /// assert!(list.iter().eq(&[97, 98]));
    /// ```
    #[track_caller]
    pub fn assign_range<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut list = Self::with_store(self.raw.store().new_like());
        list.insert_range(Position::END, iter);
        self.swap(&mut list);
    }

    /// Replaces the contents with the elements produced by `iter`.
    ///
    /// # Errors
    ///
    /// Returns the first failure as in [`try_insert_range`](Self::try_insert_range);
    /// the list keeps its old contents.
    pub fn try_assign_range<E, I>(&mut self, iter: I) -> Result<(), InsertError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut list = Self::with_store(self.raw.store().new_like());
        list.try_insert_range(Position::END, iter)?;
        self.swap(&mut list);
        Ok(())
    }
}

impl<T> OSList<T> {
    /// Creates a list of `n` copies of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list = OSList::from_elem("-", 3);
    /// assert!(list.iter().eq(&["-", "-", "-"]));
    /// ```
    #[must_use]
    #[track_caller]
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut list = OSList::new();
        list.insert_n(Position::END, n, value);
        list
    }

    /// Creates a list of `n` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `n` exceeds the number of nodes an arena
    /// can address.
    pub fn try_from_elem(value: T, n: usize) -> Result<Self, CapacityError>
    where
        T: Clone,
    {
        let mut list = OSList::new();
        list.try_insert_n(Position::END, n, value)?;
        Ok(list)
    }

    /// Creates a list from the elements produced by `iter`, stopping at the
    /// first error.
    ///
    /// # Errors
    ///
    /// Returns the first failure as in [`try_insert_range`](Self::try_insert_range).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::{InsertError, OSList};
    ///
    /// let ok = OSList::try_from_results([Ok::<_, &str>(1), Ok(2)]).unwrap();
    /// assert!(ok.iter().eq(&[1, 2]));
    ///
    /// let err = OSList::try_from_results([Ok(1), Err("bad")]);
    /// assert_eq!(err.unwrap_err(), InsertError::Element("bad"));
    /// ```
    pub fn try_from_results<E, I>(iter: I) -> Result<Self, InsertError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut list = OSList::new();
        list.try_insert_range(Position::END, iter)?;
        Ok(list)
    }
}
