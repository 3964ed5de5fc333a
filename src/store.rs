//! Pluggable node storage.
//!
//! An [`OSList`](crate::OSList) never allocates nodes itself. It asks its
//! [`NodeStore`] for a slot, gets back a [`Handle`], and links nodes to each
//! other by handle. The default store is [`Arena`], a growable slot vector with
//! a free list; supply another store through
//! [`OSList::with_store`](crate::OSList::with_store).

pub use crate::raw::{Arena, Handle, Node};
use crate::CapacityError;

/// Slab-like storage for list nodes with stable handles.
///
/// # Requirements
///
/// - **Stable handles**: a handle stays valid until it is passed to
///   [`free`](NodeStore::free).
/// - **O(1)** allocate, free, and access.
/// - Handles of freed slots may be handed out again.
///
/// Implementations may panic when given a handle they did not hand out or
/// have already freed; the list never does that unless the caller uses a
/// stale [`Position`](crate::Position).
///
/// # Safety
///
/// [`IterMut`](crate::oslist::IterMut) hands out a mutable borrow of every
/// element at once through [`node_ptr`](NodeStore::node_ptr). Implementations
/// must therefore map distinct live handles to distinct nodes, and `node_ptr`
/// must not create a reference to any node other than the one it returns.
pub unsafe trait NodeStore<T> {
    /// Moves `node` into a free slot and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the store cannot hold another node. The
    /// node (and the value inside it) is dropped.
    fn try_alloc(&mut self, node: Node<T>) -> Result<Handle, CapacityError>;

    /// Releases the slot behind `handle` and returns the node it held.
    fn free(&mut self, handle: Handle) -> Node<T>;

    /// Returns the node behind `handle`.
    fn get(&self, handle: Handle) -> &Node<T>;

    /// Returns the node behind `handle` mutably.
    fn get_mut(&mut self, handle: Handle) -> &mut Node<T>;

    /// Returns a pointer to the node behind `handle`, borrowing nothing else.
    ///
    /// # Safety
    ///
    /// - `this` must point to a valid, allocated store.
    /// - `handle` must be live.
    unsafe fn node_ptr(this: *mut Self, handle: Handle) -> *mut Node<T>
    where
        Self: Sized;

    /// Drops every node and forgets every handle.
    fn clear(&mut self);

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of nodes the store can hold without reallocating.
    fn capacity(&self) -> usize;

    /// Creates an empty store configured like this one.
    ///
    /// Copies of a list (clone, assign) are built in a store made this way.
    #[must_use]
    fn new_like(&self) -> Self
    where
        Self: Sized;
}
