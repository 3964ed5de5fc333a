use alloc::vec::Vec;

use super::handle::Handle;
use super::node::Node;
use crate::CapacityError;
use crate::store::NodeStore;

/// The default [`NodeStore`]: a growable slot vector with a free list.
///
/// An arena can optionally be limited to a maximum number of live nodes, in
/// which case allocations beyond the limit fail with [`CapacityError`].
///
/// # Examples
///
/// ```
/// use wabi_list::OSList;
/// use wabi_list::store::Arena;
///
/// let mut list = OSList::with_store(Arena::with_limit(2));
/// assert!(list.try_push_back('a').is_ok());
/// assert!(list.try_push_back('b').is_ok());
/// assert!(list.try_push_back('c').is_err());
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
    limit: usize,
}

impl<T> Arena<T> {
    /// Creates an empty arena that grows up to `Handle::MAX` slots.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            limit: Handle::MAX,
        }
    }

    /// Creates an empty arena with room for `capacity` elements before it
    /// reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            limit: Handle::MAX,
        }
    }

    /// Creates an empty arena that holds at most `limit` live elements.
    ///
    /// `limit` is clamped to `Handle::MAX`.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            limit: limit.min(Handle::MAX),
        }
    }

    /// Returns the maximum number of live elements.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of slots allocated without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of live elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Returns `true` if the arena holds no live elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves `element` into a slot and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the arena already holds `limit` elements.
    pub fn alloc(&mut self, element: T) -> Result<Handle, CapacityError> {
        if self.len() >= self.limit {
            return Err(CapacityError { capacity: self.limit });
        }

        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            Ok(h)
        } else {
            // `len() < limit <= Handle::MAX` and no slot is free, so the new index is addressable.
            self.slots.push(Some(element));
            Ok(Handle::from_index(self.slots.len() - 1))
        }
    }

    /// Returns the element behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Returns the element behind `handle` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns a pointer to the element behind `handle` from a raw pointer.
    ///
    /// Only the slot at `handle` is borrowed, so pointers to other elements
    /// stay valid.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live.
    #[inline]
    pub unsafe fn get_ptr(ptr: *mut Self, handle: Handle) -> *mut T {
        let index = handle.to_index();
        // SAFETY: Caller guarantees ptr is valid. We borrow the `slots` header through
        // addr_of_mut, and `as_mut_ptr` never borrows the slot buffer itself. The only
        // reference formed into the buffer covers the slot at `index`, which is in bounds.
        unsafe {
            let slots = &mut *core::ptr::addr_of_mut!((*ptr).slots);
            assert!(index < slots.len(), "`Arena::get_ptr()` - `handle` is invalid!");
            let slot = &mut *slots.as_mut_ptr().add(index);
            slot.as_mut().map(core::ptr::from_mut).expect("`Arena::get_ptr()` - `handle` is invalid!")
        }
    }

    /// Removes the element behind `handle` and frees its slot.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live.
    pub fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    /// Drops every element and forgets every handle.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: Every live handle indexes its own slot, and `get_ptr` borrows only that slot.
unsafe impl<T> NodeStore<T> for Arena<Node<T>> {
    #[inline]
    fn try_alloc(&mut self, node: Node<T>) -> Result<Handle, CapacityError> {
        self.alloc(node)
    }

    #[inline]
    fn free(&mut self, handle: Handle) -> Node<T> {
        self.take(handle)
    }

    #[inline]
    fn get(&self, handle: Handle) -> &Node<T> {
        Arena::get(self, handle)
    }

    #[inline]
    fn get_mut(&mut self, handle: Handle) -> &mut Node<T> {
        Arena::get_mut(self, handle)
    }

    #[inline]
    unsafe fn node_ptr(this: *mut Self, handle: Handle) -> *mut Node<T> {
        // SAFETY: Forwarded from the caller.
        unsafe { Arena::get_ptr(this, handle) }
    }

    fn clear(&mut self) {
        Arena::clear(self);
    }

    fn len(&self) -> usize {
        Arena::len(self)
    }

    fn capacity(&self) -> usize {
        Arena::capacity(self)
    }

    fn new_like(&self) -> Self {
        Self::with_limit(self.limit)
    }
}
