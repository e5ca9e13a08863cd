use core::fmt;

use crate::RbTree;

/// Sentinel index for an absent parent or child link.
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black parents
/// - All paths from root to an absent child have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node - cannot be adjacent to another red node
    Red,
    /// Black node - contributes to black height
    Black,
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A node in the Red-Black tree arena.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// The stored value
    pub(crate) value: T,

    /// Color of this node used for Red-Black tree balancing
    pub(crate) color: Color,

    /// Index of parent node in the arena (nil if this is root)
    pub(crate) parent: usize,

    /// Index of left child node in the arena (nil if no left child)
    pub(crate) left: usize,

    /// Index of right child node in the arena (nil if no right child)
    pub(crate) right: usize,
}

impl<T> Node<T> {
    pub(crate) const fn new(value: T, parent: usize, color: Color) -> Self {
        Self {
            value,
            color,
            parent,
            left: NIL,
            right: NIL,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// A borrowed handle to one node of an [`RbTree`].
///
/// The handle keeps the tree immutably borrowed, so it can never observe a
/// node whose value was rewritten by a later deletion.
pub struct NodeRef<'a, T> {
    tree: &'a RbTree<T>,
    idx: usize,
}

impl<'a, T> NodeRef<'a, T> {
    #[inline]
    pub(crate) const fn new(tree: &'a RbTree<T>, idx: usize) -> Self {
        Self { tree, idx }
    }

    #[inline]
    fn wrap(&self, idx: usize) -> Option<Self> {
        if idx == NIL {
            None
        } else {
            Some(Self::new(self.tree, idx))
        }
    }

    /// Returns the value stored in this node.
    #[inline]
    pub fn value(&self) -> &'a T {
        &self.tree.node_at(self.idx).value
    }

    /// Returns the color of this node.
    #[inline]
    pub fn color(&self) -> Color {
        self.tree.node_at(self.idx).color
    }

    /// Returns `true` if the node is red.
    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    /// Returns `true` if the node is black.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    /// Returns the node holding the next larger value.
    ///
    /// # Returns
    ///
    /// * `Option<NodeRef>` - The in-order successor, or `None` for the maximum
    pub fn next(&self) -> Option<Self> {
        self.wrap(self.tree.successor(self.idx))
    }

    /// Returns the node holding the next smaller value.
    ///
    /// # Returns
    ///
    /// * `Option<NodeRef>` - The in-order predecessor, or `None` for the minimum
    pub fn prev(&self) -> Option<Self> {
        self.wrap(self.tree.predecessor(self.idx))
    }

    /// Returns the parent node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.wrap(self.tree.node_at(self.idx).parent)
    }

    /// Returns the left child.
    pub fn left(&self) -> Option<Self> {
        self.wrap(self.tree.node_at(self.idx).left)
    }

    /// Returns the right child.
    pub fn right(&self) -> Option<Self> {
        self.wrap(self.tree.node_at(self.idx).right)
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}
