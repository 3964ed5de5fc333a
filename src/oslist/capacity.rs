use super::OSList;
use crate::raw::{Arena, Handle, RawOSList};
use crate::store::NodeStore;

impl<T> OSList<T> {
    /// Creates an empty list with room for at least `capacity` elements before
    /// the arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    ///
    /// let list: OSList<i32> = OSList::with_capacity(32);
    /// assert!(list.is_empty());
    /// assert!(list.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSList {
            raw: RawOSList::with_store(Arena::with_capacity(capacity)),
        }
    }
}

impl<T, S: NodeStore<T>> OSList<T, S> {
    /// Creates an empty list that keeps its nodes in `store`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    /// use wabi_list::store::Arena;
    ///
    /// // A list that never holds more than 100 elements.
    /// let mut list = OSList::with_store(Arena::with_limit(100));
    /// list.push_back(1);
    /// assert_eq!(list.store().limit(), 100);
    /// ```
    pub const fn with_store(store: S) -> Self {
        OSList {
            raw: RawOSList::with_store(store),
        }
    }

    /// Returns the node store.
    #[must_use]
    pub const fn store(&self) -> &S {
        self.raw.store()
    }

    /// Returns the number of elements the node store can hold without
    /// reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.store().capacity()
    }

    /// Returns the largest number of elements any list can hold.
    ///
    /// Nodes are addressed by [`Handle`](crate::store::Handle), so this is
    /// `Handle::MAX` regardless of the store. A store may refuse allocations
    /// sooner, see [`Arena::with_limit`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_list::OSList;
    /// use wabi_list::store::Handle;
    ///
    /// let list: OSList<u8> = OSList::new();
    /// assert_eq!(list.max_size(), Handle::MAX);
    /// assert!(list.max_size() >= list.capacity());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn max_size(&self) -> usize {
        Handle::MAX
    }
}
