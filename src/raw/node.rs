use super::handle::Handle;
use super::size::Size;

/// One stored element plus its place in the tree and in the sequence.
///
/// Nodes are opaque outside this crate; they are exposed only so that a
/// custom [`NodeStore`](crate::store::NodeStore) can hold them.
///
/// A `None` link points at the list's sentinel. For the tree links that means
/// "no child" (or "this is the root" for `parent`), for the sequence links it
/// means "no neighbour" on that side.
pub struct Node<T> {
    value: T,
    // The number of nodes in the subtree rooted here, including this one.
    size: Size,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    // In-order neighbours, independent of the tree shape.
    prev: Option<Handle>,
    next: Option<Handle>,
}

impl<T> Node<T> {
    /// Creates a detached leaf holding `value`.
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value,
            size: Size::ONE,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }

    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size.to_usize()
    }

    #[inline]
    pub(crate) const fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    #[inline]
    pub(crate) const fn prev(&self) -> Option<Handle> {
        self.prev
    }

    #[inline]
    pub(crate) const fn set_prev(&mut self, prev: Option<Handle>) {
        self.prev = prev;
    }

    #[inline]
    pub(crate) const fn next(&self) -> Option<Handle> {
        self.next
    }

    #[inline]
    pub(crate) const fn set_next(&mut self, next: Option<Handle>) {
        self.next = next;
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("size", &self.size.to_usize())
            .field("parent", &self.parent)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}
