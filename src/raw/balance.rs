//! Weight-balance maintenance for [`RawOSList`].
//!
//! A node with `a` nodes in its left subtree and `b` in its right is balanced
//! when the larger side exceeds the smaller by at most `smaller + 1`. In terms of
//! weights (size plus one) neither side weighs more than twice the other, so
//! each level keeps at most two thirds of the weight of the level above and the
//! height stays below `log_{3/2}(n + 1)`.

use super::handle::Handle;
use super::raw_oslist::RawOSList;
use super::size::Size;
use crate::store::NodeStore;

/// Returns `true` if subtrees of `left` and `right` nodes may share a parent.
#[inline]
pub(super) const fn is_balanced(left: usize, right: usize) -> bool {
    if left < right { right - left <= left + 1 } else { left - right <= right + 1 }
}

impl<T, S: NodeStore<T>> RawOSList<T, S> {
    /// Restores sizes and balance on the path from `start` to the root.
    ///
    /// Every node below the path must already be balanced with correct sizes.
    /// The parent of each node is read before it is rebalanced, since a
    /// rotation moves the node down.
    pub(super) fn fix_up(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            let parent = self.node(handle).parent();
            self.update_size(handle);
            self.rebalance(handle);
            current = parent;
        }
    }

    fn update_size(&mut self, handle: Handle) {
        let node = self.node(handle);
        let size = Size::parent_of(self.size_of(node.left()), self.size_of(node.right()));
        self.node_mut(handle).set_size(size);
    }

    /// Rotates the subtree rooted at `handle` until its root is balanced,
    /// returning the new root. The subtree's size does not change.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        let mut root = handle;
        loop {
            let node = self.node(root);
            let (left, right) = (node.left(), node.right());
            let (left_size, right_size) = (self.size_of(left), self.size_of(right));
            if is_balanced(left_size, right_size) {
                return root;
            }

            // Rotated-down nodes gain a subtree from their old child and may be
            // left unbalanced, so each is rebalanced before `root` is rechecked.
            root = if right_size < left_size {
                let heavy = self.node(left.expect("`RawOSList::rebalance()` - heavy side is empty!"));
                if right_size + self.size_of(heavy.right()) <= 2 * self.size_of(heavy.left()) {
                    let new_root = self.rotate_right(root);
                    self.rebalance(root);
                    new_root
                } else {
                    let heavy = left.expect("`RawOSList::rebalance()` - heavy side is empty!");
                    let new_root = self.rotate_left_right(root);
                    self.rebalance(heavy);
                    self.rebalance(root);
                    new_root
                }
            } else {
                let heavy = self.node(right.expect("`RawOSList::rebalance()` - heavy side is empty!"));
                if left_size + self.size_of(heavy.left()) <= 2 * self.size_of(heavy.right()) {
                    let new_root = self.rotate_left(root);
                    self.rebalance(root);
                    new_root
                } else {
                    let heavy = right.expect("`RawOSList::rebalance()` - heavy side is empty!");
                    let new_root = self.rotate_right_left(root);
                    self.rebalance(heavy);
                    self.rebalance(root);
                    new_root
                }
            };
        }
    }

    /// Promotes the left child of `p` into `p`'s place.
    ///
    /// ```text
    ///       p            q
    ///      / \          / \
    ///     q   c   =>   a   p
    ///    / \              / \
    ///   a   b            b   c
    /// ```
    fn rotate_right(&mut self, p: Handle) -> Handle {
        let p_node = self.node(p);
        let (parent, p_size) = (p_node.parent(), p_node.size());
        let q = p_node.left().expect("`RawOSList::rotate_right()` - `p` has no left child!");
        let q_node = self.node(q);
        let (inner, outer_size) = (q_node.right(), self.size_of(q_node.left()));

        self.replace_child(parent, p, Some(q));
        self.node_mut(p).set_left(inner);
        self.set_parent_of(inner, Some(p));

        let q_node = self.node_mut(q);
        q_node.set_right(Some(p));
        q_node.set_size(Size::from_usize(p_size));
        let p_node = self.node_mut(p);
        p_node.set_parent(Some(q));
        p_node.set_size(Size::from_usize(p_size - outer_size - 1));
        q
    }

    /// Promotes the right child of `p` into `p`'s place.
    fn rotate_left(&mut self, p: Handle) -> Handle {
        let p_node = self.node(p);
        let (parent, p_size) = (p_node.parent(), p_node.size());
        let q = p_node.right().expect("`RawOSList::rotate_left()` - `p` has no right child!");
        let q_node = self.node(q);
        let (inner, outer_size) = (q_node.left(), self.size_of(q_node.right()));

        self.replace_child(parent, p, Some(q));
        self.node_mut(p).set_right(inner);
        self.set_parent_of(inner, Some(p));

        let q_node = self.node_mut(q);
        q_node.set_left(Some(p));
        q_node.set_size(Size::from_usize(p_size));
        let p_node = self.node_mut(p);
        p_node.set_parent(Some(q));
        p_node.set_size(Size::from_usize(p_size - outer_size - 1));
        q
    }

    /// Promotes the right child of `p`'s left child into `p`'s place.
    ///
    /// ```text
    ///       p              r
    ///      / \           /   \
    ///     q   d         q     p
    ///    / \      =>   / \   / \
    ///   a   r         a   b c   d
    ///      / \
    ///     b   c
    /// ```
    fn rotate_left_right(&mut self, p: Handle) -> Handle {
        let p_node = self.node(p);
        let (parent, p_size) = (p_node.parent(), p_node.size());
        let q = p_node.left().expect("`RawOSList::rotate_left_right()` - `p` has no left child!");
        let q_node = self.node(q);
        let q_size = q_node.size();
        let r = q_node.right().expect("`RawOSList::rotate_left_right()` - `q` has no right child!");
        let r_node = self.node(r);
        let (b, c) = (r_node.left(), r_node.right());
        let c_size = self.size_of(c);

        self.replace_child(parent, p, Some(r));
        self.node_mut(q).set_right(b);
        self.set_parent_of(b, Some(q));
        self.node_mut(p).set_left(c);
        self.set_parent_of(c, Some(p));

        let r_node = self.node_mut(r);
        r_node.set_left(Some(q));
        r_node.set_right(Some(p));
        r_node.set_size(Size::from_usize(p_size));
        let q_node = self.node_mut(q);
        q_node.set_parent(Some(r));
        q_node.set_size(Size::from_usize(q_size - c_size - 1));
        let p_node = self.node_mut(p);
        p_node.set_parent(Some(r));
        p_node.set_size(Size::from_usize(p_size - q_size + c_size));
        r
    }

    /// Promotes the left child of `p`'s right child into `p`'s place.
    fn rotate_right_left(&mut self, p: Handle) -> Handle {
        let p_node = self.node(p);
        let (parent, p_size) = (p_node.parent(), p_node.size());
        let q = p_node.right().expect("`RawOSList::rotate_right_left()` - `p` has no right child!");
        let q_node = self.node(q);
        let q_size = q_node.size();
        let r = q_node.left().expect("`RawOSList::rotate_right_left()` - `q` has no left child!");
        let r_node = self.node(r);
        let (b, c) = (r_node.left(), r_node.right());
        let b_size = self.size_of(b);

        self.replace_child(parent, p, Some(r));
        self.node_mut(p).set_right(b);
        self.set_parent_of(b, Some(p));
        self.node_mut(q).set_left(c);
        self.set_parent_of(c, Some(q));

        let r_node = self.node_mut(r);
        r_node.set_left(Some(p));
        r_node.set_right(Some(q));
        r_node.set_size(Size::from_usize(p_size));
        let q_node = self.node_mut(q);
        q_node.set_parent(Some(r));
        q_node.set_size(Size::from_usize(q_size - b_size - 1));
        let p_node = self.node_mut(p);
        p_node.set_parent(Some(r));
        p_node.set_size(Size::from_usize(p_size - q_size + b_size));
        r
    }
}
