use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use crate::raw::{Arena, Handle, Node, RawOSList};
use crate::store::NodeStore;
use crate::{CapacityError, OutOfRange, Position};

mod bulk;
mod capacity;
mod cursor;

pub use cursor::{Cursor, CursorMut};

/// Panics after the node store refused an allocation.
#[cold]
#[track_caller]
fn capacity_exhausted(method: &str, error: CapacityError) -> ! {
    panic!("`OSList::{method}()` - {error}!")
}

/// A sequence with O(log n) indexing, insertion and removal anywhere.
///
/// `OSList` ("order-statistic list") stores its elements in the in-order
/// traversal of a weight-balanced binary tree. Each node records the size of
/// its subtree, so finding the element at an index, or the index of an
/// element, takes a single walk between a node and the root. Nodes are also
/// threaded into a doubly linked list in sequence order, which makes stepping,
/// iteration and access to both ends O(1).
///
/// Compared to the standard collections:
///
/// | Operation               | `Vec`    | `VecDeque` | `LinkedList` | `OSList`   |
/// |-------------------------|----------|------------|--------------|------------|
/// | index                   | O(1)     | O(1)       | O(n)         | O(log n)   |
/// | push/pop at either end  | O(1)/O(n)| O(1)       | O(1)         | O(log n)   |
/// | insert/remove in middle | O(n)     | O(n)       | O(1)*        | O(log n)   |
/// | step to neighbour       | O(1)     | O(1)       | O(1)         | O(1)       |
///
/// \* given a cursor, which `LinkedList` needs O(n) to obtain.
///
/// Elements are addressed either by index or by [`Position`], a small token
/// that keeps naming the same element while other elements are inserted or
/// removed around it. [`Cursor`] and [`CursorMut`] combine a position with a
/// borrow of the list for navigation and editing.
///
/// Nodes are kept in a [`NodeStore`], an [`Arena`] unless another store is
/// supplied with [`OSList::with_store`].
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `OSList<&str>` in this example).
/// let mut playlist = OSList::new();
///
/// playlist.push_back("Blue in Green");
/// playlist.push_back("So What");
/// playlist.push_front("Flamenco Sketches");
///
/// // Insert in the middle, by index.
/// let second = playlist.position_at(1).unwrap();
/// playlist.insert(second, "All Blues");
///
/// assert_eq!(playlist.len(), 4);
/// assert_eq!(playlist[1], "All Blues");
/// assert!(playlist.at(7).is_err());
///
/// // Remove by index.
/// assert_eq!(playlist.remove(0), Some("Flamenco Sketches"));
///
/// for (number, track) in playlist.iter().enumerate() {
///     println!("{number}: {track}");
/// }
/// ```
///
/// An `OSList` with a known list of items can be initialized from an array:
///
/// ```
/// use wabi_list::OSList;
///
/// let planets = OSList::from(["Mercury", "Venus", "Earth", "Mars"]);
/// assert_eq!(planets[2], "Earth");
/// ```
pub struct OSList<T, S = Arena<Node<T>>> {
    raw: RawOSList<T, S>,
}

/// An iterator over the elements of an `OSList`.
///
/// This `struct` is created by the [`iter`] method on [`OSList`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let list = OSList::from([1, 2]);
/// let mut iter = list.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OSList::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, S = Arena<Node<T>>> {
    raw: &'a RawOSList<T, S>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// A mutable iterator over the elements of an `OSList`.
///
/// This `struct` is created by the [`iter_mut`] method on [`OSList`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let mut list = OSList::from([1, 2]);
/// for value in list.iter_mut() {
///     *value *= 10;
/// }
/// assert!(list.iter().eq(&[10, 20]));
/// ```
///
/// [`iter_mut`]: OSList::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T, S = Arena<Node<T>>> {
    raw: *mut RawOSList<T, S>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

// SAFETY: IterMut behaves as &mut RawOSList<T, S>, so it is Send when T and S are Send.
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<T: Send, S: Send> Send for IterMut<'_, T, S> {}

/// An owning iterator over the elements of an `OSList`.
///
/// This `struct` is created by the [`into_iter`] method on [`OSList`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
///
/// let list = OSList::from(["a".to_string(), "b".to_string()]);
/// let values: Vec<String> = list.into_iter().rev().collect();
/// assert_eq!(values, ["b", "a"]);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T, S = Arena<Node<T>>> {
    store: S,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<T> OSList<T> {
    /// Makes a new, empty `OSList`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::new();
    ///
    /// // entries can now be inserted into the empty list
    /// list.push_back("a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OSList {
            raw: RawOSList::with_store(Arena::new()),
        }
    }
}

impl<T, S: NodeStore<T>> OSList<T, S> {
    /// Returns the number of elements in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut a = OSList::new();
    /// assert_eq!(a.len(), 0);
    /// a.push_back(1);
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the list contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut a = OSList::new();
    /// assert!(a.is_empty());
    /// a.push_back(1);
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Index`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::{OSList, OutOfRange};
    ///
    /// let list = OSList::from([1, 2, 3, 4, 5]);
    /// assert_eq!(list.at(2), Ok(&3));
    /// assert_eq!(list.at(5), Err(OutOfRange::Index { index: 5, len: 5 }));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.get(index).ok_or(OutOfRange::Index { index, len: self.len() })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Index`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// *list.at_mut(1).unwrap() = 20;
    /// assert_eq!(list[1], 20);
    /// assert!(list.at_mut(3).is_err());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.get_mut(index).ok_or(OutOfRange::Index { index, len })
    }

    /// Returns a reference to the element at `index`, or `None` if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list = OSList::from(['a', 'b']);
    /// assert_eq!(list.get(1), Some(&'b'));
    /// assert_eq!(list.get(2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.raw.select(index).map(|h| self.raw.value(h))
    }

    /// Returns a mutable reference to the element at `index`, or `None` if
    /// `index >= len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let handle = self.raw.select(index)?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns the first element, or `None` if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::new();
    /// assert_eq!(list.front(), None);
    /// list.push_back(1);
    /// list.push_back(2);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.raw.first().map(|h| self.raw.value(h))
    }

    /// Returns the first element mutably, or `None` if the list is empty.
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let handle = self.raw.first()?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns the last element, or `None` if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::new();
    /// assert_eq!(list.back(), None);
    /// list.push_back(1);
    /// list.push_back(2);
    /// assert_eq!(list.back(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.raw.last().map(|h| self.raw.value(h))
    }

    /// Returns the last element mutably, or `None` if the list is empty.
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let handle = self.raw.last()?;
        Some(self.raw.value_mut(handle))
    }

    /// Appends `value` to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if the node store is full. See [`try_push_back`](Self::try_push_back).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::new();
    /// list.push_back(1);
    /// list.push_back(2);
    /// assert_eq!(list.back(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        if let Err(error) = self.try_push_back(value) {
            capacity_exhausted("push_back", error);
        }
    }

    /// Appends `value` to the back of the list.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store is full; `value` is dropped
    /// and the list is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), CapacityError> {
        self.raw.push_back(value).map(drop)
    }

    /// Prepends `value` to the front of the list.
    ///
    /// # Panics
    ///
    /// Panics if the node store is full. See [`try_push_front`](Self::try_push_front).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::new();
    /// list.push_front(2);
    /// list.push_front(1);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[track_caller]
    pub fn push_front(&mut self, value: T) {
        if let Err(error) = self.try_push_front(value) {
            capacity_exhausted("push_front", error);
        }
    }

    /// Prepends `value` to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store is full; `value` is dropped
    /// and the list is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), CapacityError> {
        self.raw.push_front(value).map(drop)
    }

    /// Removes the last element and returns it, or `None` if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2]);
    /// assert_eq!(list.pop_back(), Some(2));
    /// assert_eq!(list.pop_back(), Some(1));
    /// assert_eq!(list.pop_back(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_back(&mut self) -> Option<T> {
        self.raw.pop_back()
    }

    /// Removes the first element and returns it, or `None` if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2]);
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), Some(2));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_front(&mut self) -> Option<T> {
        self.raw.pop_front()
    }

    /// Inserts `value` before `pos` and returns the position of the new element.
    ///
    /// Inserting before [`end`](Self::end) appends. Every existing position
    /// stays valid.
    ///
    /// # Panics
    ///
    /// Panics if the node store is full. See [`try_insert`](Self::try_insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 4, 5]);
    /// let four = list.position_at(2).unwrap();
    /// let three = list.insert(four, 3);
    /// assert_eq!(list.index_of(three), 2);
    /// assert!(list.iter().eq(&[1, 2, 3, 4, 5]));
    ///
    /// list.insert(list.end(), 6);
    /// assert_eq!(list.back(), Some(&6));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[track_caller]
    pub fn insert(&mut self, pos: Position, value: T) -> Position {
        self.try_insert(pos, value).unwrap_or_else(|error| capacity_exhausted("insert", error))
    }

    /// Inserts `value` before `pos` and returns the position of the new element.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the node store is full; `value` is dropped
    /// and the list is unchanged.
    pub fn try_insert(&mut self, pos: Position, value: T) -> Result<Position, CapacityError> {
        self.raw.insert_before(pos.0, value).map(|h| Position(Some(h)))
    }

    /// Removes the element at `pos` and returns the position of its successor.
    ///
    /// `pos` is invalidated; every other position stays valid. Erasing the end
    /// position does nothing and returns the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3, 4, 5]);
    /// let three = list.position_at(2).unwrap();
    /// let four = list.erase(three);
    /// assert_eq!(list.value_at(four), Some(&4));
    /// assert!(list.iter().eq(&[1, 2, 4, 5]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, pos: Position) -> Position {
        match pos.0 {
            Some(handle) => Position(self.raw.remove(handle).1),
            None => Position::END,
        }
    }

    /// Removes the elements from `first` up to, but not including, `last`
    /// and returns `last`.
    ///
    /// `first` must not come after `last`; if it does, everything from
    /// `first` to the end is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3, 4, 5]);
    /// let first = list.position_at(1).unwrap();
    /// let last = list.position_at(4).unwrap();
    /// list.erase_range(first, last);
    /// assert!(list.iter().eq(&[1, 5]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n) for `k` removed elements.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        let mut current = first;
        while current != last && !current.is_end() {
            current = self.erase(current);
        }
        current
    }

    /// Removes and returns the element at `index`, or `None` if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from(['a', 'b', 'c']);
    /// assert_eq!(list.remove(1), Some('b'));
    /// assert_eq!(list.remove(2), None);
    /// assert!(list.iter().eq(&['a', 'c']));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let handle = self.raw.select(index)?;
        Some(self.raw.remove(handle).0)
    }

    /// Removes every element.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([1, 2, 3]);
    /// list.clear();
    /// assert!(list.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents of `self` and `other`.
    ///
    /// Positions keep naming the same elements, which now live in the other
    /// list.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut a = OSList::from([1, 2, 3]);
    /// let mut b = OSList::from([4]);
    /// a.swap(&mut b);
    /// assert!(a.iter().eq(&[4]));
    /// assert!(b.iter().eq(&[1, 2, 3]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Returns the position of the first element, which is [`end`](Self::end)
    /// if the list is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position(self.raw.first())
    }

    /// Returns the end position, one past the last element.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Returns the position of the element at `index`; `index == len` gives
    /// the end position.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange::Index`] if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list = OSList::from([1, 2, 3]);
    /// assert_eq!(list.position_at(0), Ok(list.begin()));
    /// assert_eq!(list.position_at(3), Ok(list.end()));
    /// assert!(list.position_at(4).is_err());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn position_at(&self, index: usize) -> Result<Position, OutOfRange> {
        let len = self.len();
        match index.cmp(&len) {
            Ordering::Less => Ok(Position(self.raw.select(index))),
            Ordering::Equal => Ok(Position::END),
            Ordering::Greater => Err(OutOfRange::Index { index, len }),
        }
    }

    /// Returns the index of the element at `pos`; the end position gives `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let mut list = OSList::from([2, 3]);
    /// let three = list.position_at(1).unwrap();
    /// list.push_front(1);
    /// assert_eq!(list.index_of(three), 2);
    /// assert_eq!(list.index_of(list.end()), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn index_of(&self, pos: Position) -> usize {
        self.raw.index_of(pos.0)
    }

    /// Returns the element at `pos`, or `None` for the end position.
    #[must_use]
    pub fn value_at(&self, pos: Position) -> Option<&T> {
        pos.0.map(|h| self.raw.value(h))
    }

    /// Returns the element at `pos` mutably, or `None` for the end position.
    #[must_use]
    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut T> {
        let handle = pos.0?;
        Some(self.raw.value_mut(handle))
    }

    /// Gets an iterator over the elements of the list, front to back.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list = OSList::from([1, 2, 3]);
    /// let forward: Vec<_> = list.iter().copied().collect();
    /// let backward: Vec<_> = list.iter().rev().copied().collect();
    /// assert_eq!(forward, [1, 2, 3]);
    /// assert_eq!(backward, [3, 2, 1]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) per iteration step.
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the elements of the list, front to back.
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) per iteration step.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, S> {
        IterMut {
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            raw: &raw mut self.raw,
            _marker: PhantomData,
        }
    }
}

impl<T: Clone, S: NodeStore<T>> Clone for OSList<T, S> {
    /// Clones every element into a new store made by [`NodeStore::new_like`].
    ///
    /// # Panics
    ///
    /// Panics if the new store fills up.
    fn clone(&self) -> Self {
        let mut list = Self::with_store(self.raw.store().new_like());
        list.extend(self.iter().cloned());
        list
    }

    /// Builds the copy completely before replacing `self`, so a panicking
    /// `T::clone` leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let mut list = source.clone();
        self.swap(&mut list);
    }
}

impl<T: Hash, S: NodeStore<T>> Hash for OSList<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq, S: NodeStore<T>> PartialEq for OSList<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq, S: NodeStore<T>> Eq for OSList<T, S> {}

impl<T: PartialOrd, S: NodeStore<T>> PartialOrd for OSList<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, S: NodeStore<T>> Ord for OSList<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: fmt::Debug, S: NodeStore<T>> fmt::Debug for OSList<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, S: NodeStore<T> + Default> Default for OSList<T, S> {
    /// Creates an empty `OSList`.
    fn default() -> OSList<T, S> {
        OSList::with_store(S::default())
    }
}

impl<T, S: NodeStore<T> + Default> FromIterator<T> for OSList<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> OSList<T, S> {
        let mut list = OSList::default();
        list.extend(iter);
        list
    }
}

impl<T, S: NodeStore<T>> Extend<T> for OSList<T, S> {
    /// Appends every element of `iter`; on a panic nothing is appended.
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_range(Position::END, iter);
    }
}

impl<'a, T: Copy + 'a, S: NodeStore<T>> Extend<&'a T> for OSList<T, S> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for OSList<T> {
    /// Converts a `[T; N]` into an `OSList<T>`, keeping the array's order.
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list1 = OSList::from([1, 2, 3, 4]);
    /// let list2: OSList<_> = [1, 2, 3, 4].into();
    /// assert_eq!(list1, list2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        OSList::from_iter(arr)
    }
}

impl<T, S: NodeStore<T>> Index<usize> for OSList<T, S> {
    type Output = T;

    /// Returns a reference to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(error) => panic!("`OSList::index()` - {error}!"),
        }
    }
}

impl<T, S: NodeStore<T>> IndexMut<usize> for OSList<T, S> {
    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(error) => panic!("`OSList::index_mut()` - {error}!"),
        }
    }
}

impl<T, S: NodeStore<T>> IntoIterator for OSList<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    /// Gets an owning iterator over the elements of the list, front to back.
    fn into_iter(self) -> IntoIter<T, S> {
        let (store, front, back, remaining) = self.raw.into_parts();
        IntoIter {
            store,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, S: NodeStore<T>> IntoIterator for &'a OSList<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Iter<'a, T, S> {
        self.iter()
    }
}

impl<'a, T, S: NodeStore<T>> IntoIterator for &'a mut OSList<T, S> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, S>;

    fn into_iter(self) -> IterMut<'a, T, S> {
        self.iter_mut()
    }
}

// ─── Iter ───────────────────────────────────────────────────────────────────

impl<'a, T, S: NodeStore<T>> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let raw = self.raw;
        let node = raw.node(self.front?);
        self.front = node.next();
        self.remaining -= 1;
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S: NodeStore<T>> DoubleEndedIterator for Iter<'_, T, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let raw = self.raw;
        let node = raw.node(self.back?);
        self.back = node.prev();
        self.remaining -= 1;
        Some(node.value())
    }
}

impl<T, S: NodeStore<T>> ExactSizeIterator for Iter<'_, T, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, S: NodeStore<T>> FusedIterator for Iter<'_, T, S> {}

impl<T, S> Clone for Iter<'_, T, S> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, S: NodeStore<T>> fmt::Debug for Iter<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── IterMut ────────────────────────────────────────────────────────────────

impl<'a, T, S: NodeStore<T> + 'a> Iterator for IterMut<'a, T, S> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;

        // SAFETY: `raw` comes from the `&'a mut` borrow taken by `iter_mut()`, which this
        // iterator holds for `'a`. `node_ptr` borrows only the node behind `handle`, and the
        // front and back walks stop once `remaining` reaches zero, so every node is borrowed
        // at most once and the references handed out never alias.
        let node: &'a mut Node<T> = unsafe { &mut *RawOSList::node_ptr(self.raw, handle) };
        self.front = node.next();
        self.remaining -= 1;
        Some(node.value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, S: NodeStore<T> + 'a> DoubleEndedIterator for IterMut<'a, T, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;

        // SAFETY: Same as in next() - exclusive access, and no node is borrowed twice.
        let node: &'a mut Node<T> = unsafe { &mut *RawOSList::node_ptr(self.raw, handle) };
        self.back = node.prev();
        self.remaining -= 1;
        Some(node.value_mut())
    }
}

impl<'a, T, S: NodeStore<T> + 'a> ExactSizeIterator for IterMut<'a, T, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, T, S: NodeStore<T> + 'a> FusedIterator for IterMut<'a, T, S> {}

impl<T, S> fmt::Debug for IterMut<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

// ─── IntoIter ───────────────────────────────────────────────────────────────

impl<T, S: NodeStore<T>> Iterator for IntoIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.store.free(self.front?);
        self.front = node.next();
        self.remaining -= 1;
        Some(node.into_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S: NodeStore<T>> DoubleEndedIterator for IntoIter<T, S> {
    fn next_back(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.store.free(self.back?);
        self.back = node.prev();
        self.remaining -= 1;
        Some(node.into_value())
    }
}

impl<T, S: NodeStore<T>> ExactSizeIterator for IntoIter<T, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, S: NodeStore<T>> FusedIterator for IntoIter<T, S> {}

impl<T, S> fmt::Debug for IntoIter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish()
    }
}
