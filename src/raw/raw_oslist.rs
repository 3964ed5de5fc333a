use core::cmp::Ordering;
use core::marker::PhantomData;

use super::handle::Handle;
use super::node::Node;
use crate::store::NodeStore;
use crate::{CapacityError, OutOfRange};

/// The list's boundary node.
///
/// It never holds a value. Every `None` link in a [`Node`] designates it, so it
/// is simultaneously the root's parent, the predecessor of the first node and
/// the successor of the last node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Sentinel {
    /// Root of the tree; its size is the length of the list.
    root: Option<Handle>,
    /// Head of the in-order list.
    first: Option<Handle>,
    /// Tail of the in-order list.
    last: Option<Handle>,
}

/// The weight-balanced order-statistic tree backing `OSList`.
///
/// Every node is linked twice: into a binary tree whose in-order traversal is
/// the sequence, and into a doubly linked list in that same order. Subtree
/// sizes make positional lookups O(log n); the list makes stepping O(1).
pub(crate) struct RawOSList<T, S> {
    /// Storage owning every node.
    store: S,
    sentinel: Sentinel,
    _marker: PhantomData<T>,
}

/// Converts a subtree size into an offset. Sizes never exceed `Handle::MAX`.
#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn signed(size: usize) -> isize {
    size as isize
}

impl<T, S: NodeStore<T>> RawOSList<T, S> {
    /// Creates an empty list over `store`.
    pub(crate) const fn with_store(store: S) -> Self {
        Self {
            store,
            sentinel: Sentinel {
                root: None,
                first: None,
                last: None,
            },
            _marker: PhantomData,
        }
    }

    pub(crate) const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the list, returning its store and the ends of its sequence.
    pub(crate) fn into_parts(self) -> (S, Option<Handle>, Option<Handle>, usize) {
        let len = self.len();
        (self.store, self.sentinel.first, self.sentinel.last, len)
    }

    /// Returns the number of elements.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.sentinel.root)
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.sentinel.root.is_none()
    }

    #[inline]
    pub(crate) const fn first(&self) -> Option<Handle> {
        self.sentinel.first
    }

    #[inline]
    pub(crate) const fn last(&self) -> Option<Handle> {
        self.sentinel.last
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.store.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.store.get_mut(handle)
    }

    /// Returns a pointer to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawOSList<T, S>`.
    /// - `handle` must be a live node of that list.
    #[inline]
    pub(crate) unsafe fn node_ptr(ptr: *mut Self, handle: Handle) -> *mut Node<T> {
        // SAFETY: We only access the `store` field through addr_of_mut, so no reference
        // to the list as a whole is created.
        unsafe { S::node_ptr(core::ptr::addr_of_mut!((*ptr).store), handle) }
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.node(handle).value()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut T {
        self.node_mut(handle).value_mut()
    }

    /// Returns the size of the subtree behind `link`; the sentinel counts as empty.
    #[inline]
    pub(crate) fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.node(h).size())
    }

    /// Returns the in-order successor of `link`. The sentinel's successor is the first node.
    #[inline]
    pub(crate) fn next_of(&self, link: Option<Handle>) -> Option<Handle> {
        match link {
            Some(h) => self.node(h).next(),
            None => self.sentinel.first,
        }
    }

    /// Returns the in-order predecessor of `link`. The sentinel's predecessor is the last node.
    #[inline]
    pub(crate) fn prev_of(&self, link: Option<Handle>) -> Option<Handle> {
        match link {
            Some(h) => self.node(h).prev(),
            None => self.sentinel.last,
        }
    }

    /// Points `parent`'s link to `old` at `new` instead, and `new` back at `parent`.
    ///
    /// A `None` parent is the sentinel, whose only child link is the root.
    pub(super) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.sentinel.root = new,
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left() == Some(old) {
                    node.set_left(new);
                } else {
                    node.set_right(new);
                }
            }
        }
        self.set_parent_of(new, parent);
    }

    #[inline]
    pub(super) fn set_parent_of(&mut self, child: Option<Handle>, parent: Option<Handle>) {
        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
        }
    }

    // ─── Lookup ─────────────────────────────────────────────────────────────

    /// Returns the node at zero-based position `index`, or `None` if
    /// `index >= len`.
    pub(crate) fn select(&self, index: usize) -> Option<Handle> {
        let mut remaining = index;
        let mut current = self.sentinel.root;

        while let Some(handle) = current {
            let node = self.node(handle);
            let left_size = self.size_of(node.left());
            match remaining.cmp(&left_size) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => current = node.left(),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    current = node.right();
                }
            }
        }

        None
    }

    /// Recovers the zero-based position of `link`. The sentinel is at `len`.
    pub(crate) fn index_of(&self, link: Option<Handle>) -> usize {
        let Some(mut current) = link else {
            return self.len();
        };

        let mut index = self.size_of(self.node(current).left());
        while let Some(parent) = self.node(current).parent() {
            let parent_node = self.node(parent);
            if parent_node.right() == Some(current) {
                index += self.size_of(parent_node.left()) + 1;
            }
            current = parent;
        }

        index
    }

    /// Returns the node `offset` positions away from `from`.
    ///
    /// Walks up only until the target falls inside the current subtree and
    /// then descends toward it, so the cost is bounded by twice the height
    /// regardless of `offset`. Landing exactly on the sentinel (one past the
    /// last node) is allowed.
    pub(crate) fn offset(&self, from: Option<Handle>, offset: isize) -> Result<Option<Handle>, OutOfRange> {
        let len = self.len();
        let out_of_range = OutOfRange::Offset { offset, len };

        // No target is further than `len` away, and rejecting larger moves keeps
        // every adjustment below within `isize`.
        if offset.unsigned_abs() > len {
            return Err(out_of_range);
        }

        let Some(mut current) = from else {
            // Only backward moves from the sentinel land inside the list.
            return match offset.cmp(&0) {
                Ordering::Equal => Ok(None),
                Ordering::Less => Ok(self.select(len - offset.unsigned_abs())),
                Ordering::Greater => Err(out_of_range),
            };
        };

        // Target position relative to `current`.
        let mut remaining = offset;
        loop {
            if remaining == 0 {
                return Ok(Some(current));
            }

            let node = self.node(current);
            if remaining > 0 {
                if let Some(right) = node.right()
                    && remaining.unsigned_abs() <= self.node(right).size()
                {
                    remaining -= signed(self.size_of(self.node(right).left()) + 1);
                    current = right;
                    continue;
                }
            } else if let Some(left) = node.left()
                && remaining.unsigned_abs() <= self.node(left).size()
            {
                remaining += signed(self.size_of(self.node(left).right()) + 1);
                current = left;
                continue;
            }

            // The target lies outside this subtree.
            match node.parent() {
                Some(parent) => {
                    if self.node(parent).left() == Some(current) {
                        remaining -= signed(self.size_of(node.right()) + 1);
                    } else {
                        remaining += signed(self.size_of(node.left()) + 1);
                    }
                    current = parent;
                }
                None if remaining > 0 && remaining.unsigned_abs() == self.size_of(node.right()) + 1 => {
                    return Ok(None);
                }
                None => return Err(out_of_range),
            }
        }
    }

    // ─── Mutation ───────────────────────────────────────────────────────────

    /// Makes the detached node `handle` the only node of an empty list.
    fn put_first(&mut self, handle: Handle) {
        self.sentinel = Sentinel {
            root: Some(handle),
            first: Some(handle),
            last: Some(handle),
        };
    }

    /// Appends `value`, returning the handle of its node.
    pub(crate) fn push_back(&mut self, value: T) -> Result<Handle, CapacityError> {
        let handle = self.store.try_alloc(Node::new(value))?;
        let Some(last) = self.sentinel.last else {
            self.put_first(handle);
            return Ok(handle);
        };

        // The last node has no right child.
        let node = self.node_mut(handle);
        node.set_prev(Some(last));
        node.set_parent(Some(last));
        let last_node = self.node_mut(last);
        last_node.set_next(Some(handle));
        last_node.set_right(Some(handle));
        self.sentinel.last = Some(handle);

        self.fix_up(Some(last));
        Ok(handle)
    }

    /// Prepends `value`, returning the handle of its node.
    pub(crate) fn push_front(&mut self, value: T) -> Result<Handle, CapacityError> {
        let handle = self.store.try_alloc(Node::new(value))?;
        let Some(first) = self.sentinel.first else {
            self.put_first(handle);
            return Ok(handle);
        };

        // The first node has no left child.
        let node = self.node_mut(handle);
        node.set_next(Some(first));
        node.set_parent(Some(first));
        let first_node = self.node_mut(first);
        first_node.set_prev(Some(handle));
        first_node.set_left(Some(handle));
        self.sentinel.first = Some(handle);

        self.fix_up(Some(first));
        Ok(handle)
    }

    /// Removes the last node and returns its value.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let last = self.sentinel.last?;
        let node = self.node(last);
        let (prev, parent, left) = (node.prev(), node.parent(), node.left());

        self.sentinel.last = prev;
        match prev {
            Some(prev) => self.node_mut(prev).set_next(None),
            None => self.sentinel.first = None,
        }

        // The last node has no right child, so its left subtree takes its slot.
        self.replace_child(parent, last, left);
        let value = self.store.free(last).into_value();
        self.fix_up(parent);
        Some(value)
    }

    /// Removes the first node and returns its value.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let first = self.sentinel.first?;
        let node = self.node(first);
        let (next, parent, right) = (node.next(), node.parent(), node.right());

        self.sentinel.first = next;
        match next {
            Some(next) => self.node_mut(next).set_prev(None),
            None => self.sentinel.last = None,
        }

        // The first node has no left child, so its right subtree takes its slot.
        self.replace_child(parent, first, right);
        let value = self.store.free(first).into_value();
        self.fix_up(parent);
        Some(value)
    }

    /// Inserts `value` immediately before `anchor` (the sentinel appends).
    ///
    /// The new node becomes the left child of `anchor` when that slot is free,
    /// and otherwise the right child of `anchor`'s predecessor, which is then
    /// the rightmost node of `anchor`'s left subtree. Either way it lands
    /// between the two in in-order position.
    pub(crate) fn insert_before(&mut self, anchor: Option<Handle>, value: T) -> Result<Handle, CapacityError> {
        let Some(anchor) = anchor else {
            return self.push_back(value);
        };

        let handle = self.store.try_alloc(Node::new(value))?;
        let prev = self.node(anchor).prev();

        let node = self.node_mut(handle);
        node.set_prev(prev);
        node.set_next(Some(anchor));
        self.node_mut(anchor).set_prev(Some(handle));
        match prev {
            Some(prev) => self.node_mut(prev).set_next(Some(handle)),
            None => self.sentinel.first = Some(handle),
        }

        let parent = if self.node(anchor).left().is_none() {
            self.node_mut(anchor).set_left(Some(handle));
            anchor
        } else {
            let prev = prev.expect("`RawOSList::insert_before()` - node with a left subtree has no predecessor!");
            self.node_mut(prev).set_right(Some(handle));
            prev
        };
        self.node_mut(handle).set_parent(Some(parent));

        self.fix_up(Some(parent));
        Ok(handle)
    }

    /// Removes the node `handle`, returning its value and its successor.
    pub(crate) fn remove(&mut self, handle: Handle) -> (T, Option<Handle>) {
        let node = self.node(handle);
        let (parent, left, right) = (node.parent(), node.left(), node.right());
        let (prev, next) = (node.prev(), node.next());

        match prev {
            Some(prev) => self.node_mut(prev).set_next(next),
            None => self.sentinel.first = next,
        }
        match next {
            Some(next) => self.node_mut(next).set_prev(prev),
            None => self.sentinel.last = prev,
        }

        // The lowest node whose subtree changed.
        let fix_from = match (left, right) {
            (None, _) => {
                self.replace_child(parent, handle, right);
                parent
            }
            (_, None) => {
                self.replace_child(parent, handle, left);
                parent
            }
            (Some(left), Some(right)) => {
                // The predecessor is the rightmost node of the left subtree.
                let prev = prev.expect("`RawOSList::remove()` - node with a left subtree has no predecessor!");
                if prev == left {
                    self.node_mut(left).set_right(Some(right));
                    self.set_parent_of(Some(right), Some(left));
                    self.replace_child(parent, handle, Some(left));
                    Some(left)
                } else {
                    let prev_node = self.node(prev);
                    let (prev_parent, prev_left) = (prev_node.parent(), prev_node.left());
                    self.replace_child(prev_parent, prev, prev_left);

                    let prev_node = self.node_mut(prev);
                    prev_node.set_left(Some(left));
                    prev_node.set_right(Some(right));
                    self.set_parent_of(Some(left), Some(prev));
                    self.set_parent_of(Some(right), Some(prev));
                    self.replace_child(parent, handle, Some(prev));
                    prev_parent
                }
            }
        };

        let value = self.store.free(handle).into_value();
        self.fix_up(fix_from);
        (value, next)
    }

    /// Frees every node by walking the sequence.
    pub(crate) fn clear(&mut self) {
        self.sentinel = Sentinel::default();
        self.store.clear();
    }
}

#[cfg(test)]
impl<T, S: NodeStore<T>> RawOSList<T, S> {
    /// Checks every structural invariant, panicking with all violations found.
    pub(crate) fn validate_invariants(&self) {
        use alloc::string::String;
        use alloc::vec::Vec;

        let mut errors: Vec<String> = Vec::new();
        let mut in_order: Vec<Handle> = Vec::new();

        if let Some(root) = self.sentinel.root
            && self.node(root).parent().is_some()
        {
            errors.push(alloc::format!("root {root:?} has a parent"));
        }
        self.validate_node(self.sentinel.root, &mut in_order, &mut errors);

        // The sequence links must visit the tree in in-order, in both directions.
        let mut forward = Vec::new();
        let mut current = self.sentinel.first;
        while let Some(h) = current {
            forward.push(h);
            if forward.len() > in_order.len() {
                errors.push("forward sequence is longer than the tree".into());
                break;
            }
            current = self.node(h).next();
        }
        if forward != in_order {
            errors.push(alloc::format!("forward sequence {forward:?} != in-order {in_order:?}"));
        }

        let mut backward = Vec::new();
        let mut current = self.sentinel.last;
        while let Some(h) = current {
            backward.push(h);
            if backward.len() > in_order.len() {
                errors.push("backward sequence is longer than the tree".into());
                break;
            }
            current = self.node(h).prev();
        }
        backward.reverse();
        if backward != in_order {
            errors.push(alloc::format!("backward sequence {backward:?} != in-order {in_order:?}"));
        }

        if self.len() != in_order.len() {
            errors.push(alloc::format!("len {} != node count {}", self.len(), in_order.len()));
        }
        if self.store.len() != in_order.len() {
            errors.push(alloc::format!("store holds {} nodes, tree holds {}", self.store.len(), in_order.len()));
        }

        assert!(errors.is_empty(), "List invariant violations:\n{}", errors.join("\n"));
    }

    fn validate_node(
        &self,
        link: Option<Handle>,
        in_order: &mut alloc::vec::Vec<Handle>,
        errors: &mut alloc::vec::Vec<alloc::string::String>,
    ) -> usize {
        let Some(handle) = link else {
            return 0;
        };
        let node = self.node(handle);

        for child in [node.left(), node.right()].into_iter().flatten() {
            if self.node(child).parent() != Some(handle) {
                errors.push(alloc::format!("child {child:?} of {handle:?} has parent {:?}", self.node(child).parent()));
            }
        }

        let left = self.validate_node(node.left(), in_order, errors);
        in_order.push(handle);
        let right = self.validate_node(node.right(), in_order, errors);

        if node.size() != 1 + left + right {
            errors.push(alloc::format!("size of {handle:?} is {}, expected {}", node.size(), 1 + left + right));
        }
        if !super::balance::is_balanced(left, right) {
            errors.push(alloc::format!("{handle:?} is unbalanced: left {left}, right {right}"));
        }

        1 + left + right
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        fn walk<T, S: NodeStore<T>>(list: &RawOSList<T, S>, link: Option<Handle>) -> usize {
            link.map_or(0, |h| {
                let node = list.node(h);
                1 + walk(list, node.left()).max(walk(list, node.right()))
            })
        }
        walk(self, self.sentinel.root)
    }

    pub(crate) fn to_vec(&self) -> alloc::vec::Vec<T>
    where
        T: Clone,
    {
        let mut values = alloc::vec::Vec::with_capacity(self.len());
        let mut current = self.sentinel.first;
        while let Some(h) = current {
            values.push(self.value(h).clone());
            current = self.node(h).next();
        }
        values
    }
}
