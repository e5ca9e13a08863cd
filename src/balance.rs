//! Rotations and the two repair algorithms that restore the Red-Black
//! invariants after an insertion or a deletion.

use log::trace;

use crate::{
    RbTree,
    node::{Color, NIL, Side},
};

impl<T> RbTree<T> {
    /// Moves `idx` one level down towards `side`, promoting its child on the
    /// opposite side. That child must exist.
    ///
    /// ```text
    ///   x                y
    ///  / \              / \
    /// a   y     =>     x   c        (side = Left)
    ///    / \          / \
    ///   b   c        a   b
    /// ```
    pub(crate) fn rotate(&mut self, idx: usize, side: Side) {
        let up = self.get_child(idx, side.opposite());
        debug_assert!(
            idx != NIL && up != NIL,
            "rotation needs a child to promote"
        );

        let inner = self.get_child(up, side);
        self.set_child(idx, side.opposite(), inner);
        if inner != NIL {
            self.node_at_mut(inner).parent = idx;
        }

        let parent = self.get_parent(idx);
        self.node_at_mut(up).parent = parent;
        if parent == NIL {
            self.root = up;
        } else {
            let slot = self.side_of(idx);
            self.set_child(parent, slot, up);
        }

        self.set_child(up, side, idx);
        self.node_at_mut(idx).parent = up;
    }

    /// Repairs a red `node` that has a red child.
    ///
    /// `node` is never the root, so its parent exists and is black. A black
    /// uncle is fixed locally by one or two rotations; a red uncle pushes the
    /// violation two levels up.
    pub(crate) fn solve_double_red(&mut self, mut node: usize) {
        loop {
            let grandparent = self.get_parent(node);
            let side = self.side_of(node);
            let uncle = self.get_child(grandparent, side.opposite());

            if self.is_black(uncle) {
                if self.is_red(self.get_child(node, side.opposite())) {
                    trace!("double red: straightening inner grandchild");
                    self.rotate(node, side);
                    node = self.get_parent(node);
                }

                trace!("double red: rotating grandparent");
                self.set_color(grandparent, Color::Red);
                self.set_color(node, Color::Black);
                self.rotate(grandparent, side.opposite());
                return;
            }

            trace!("double red: recoloring red uncle");
            self.set_color(node, Color::Black);
            self.set_color(uncle, Color::Black);

            let next = self.get_parent(grandparent);
            if next == NIL {
                return;
            }

            self.set_color(grandparent, Color::Red);
            if self.is_black(next) {
                return;
            }
            node = next;
        }
    }

    /// Repairs the black-height deficiency left in `parent`'s `side` slot
    /// after a black node was detached from it.
    pub(crate) fn solve_double_black(&mut self, mut parent: usize, mut side: Side) {
        loop {
            let far = side.opposite();
            let mut sibling = self.get_child(parent, far);

            if self.is_red(sibling) {
                trace!("double black: rotating red sibling");
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate(parent, side);
                sibling = self.get_child(parent, far);
            }

            let near_child = self.get_child(sibling, side);
            let far_child = self.get_child(sibling, far);

            if self.is_black(near_child) && self.is_black(far_child) {
                self.set_color(sibling, Color::Red);

                if self.is_red(parent) {
                    trace!("double black: absorbed by red parent");
                    self.set_color(parent, Color::Black);
                    return;
                }

                let grandparent = self.get_parent(parent);
                if grandparent == NIL {
                    return;
                }

                trace!("double black: propagating to grandparent");
                side = self.side_of(parent);
                parent = grandparent;
                continue;
            }

            if self.is_black(far_child) {
                trace!("double black: straightening near red child");
                self.set_color(near_child, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.get_child(parent, far);
            }

            trace!("double black: rotating parent over far red child");
            self.set_color(sibling, self.get_color(parent));
            self.set_color(parent, Color::Black);
            self.set_color(self.get_child(sibling, far), Color::Black);
            self.rotate(parent, side);
            return;
        }
    }
}
