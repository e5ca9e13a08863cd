use alloc::{sync::Arc, vec::Vec};
use core::{cmp::Ordering, fmt};

use num_traits::float::FloatCore;
use ordered_float::PrimitiveFloat;

use crate::{
    Comparator, Iter, compare,
    node::{Color, NIL, Node, NodeRef, Side},
};

/// An ordered container backed by a Red-Black tree.
///
/// Values are kept sorted under a caller-supplied comparator. Insertion,
/// deletion and lookup are O(log n); the minimum and maximum nodes are cached
/// and maintained incrementally. Duplicate values are rejected.
///
/// Nodes live in an arena indexed by `usize`. Vacated slots go to a free list
/// and are reused by the next insertion.
pub struct RbTree<T> {
    /// Arena of node slots, `None` for vacated slots
    pub(crate) nodes: Vec<Option<Node<T>>>,

    /// Stack of vacated slot indices available for reuse
    pub(crate) free_list: Vec<usize>,

    /// Index of the root node, nil when the tree is empty
    pub(crate) root: usize,

    /// Index of the node holding the smallest value
    pub(crate) min: usize,

    /// Index of the node holding the largest value
    pub(crate) max: usize,

    /// Number of values currently stored
    pub(crate) count: usize,

    /// Three-way ordering over the stored values
    pub(crate) cmp: Comparator<T>,
}

impl<T> RbTree<T> {
    /// Creates an empty tree ordered by `cmp`.
    ///
    /// # Arguments
    ///
    /// * `cmp` - Three-way comparator; must be a strict total order
    ///
    /// # Returns
    ///
    /// * `Self` - An empty tree
    pub fn new<F>(cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::with_comparator(Arc::new(cmp))
    }

    /// Creates an empty tree sharing an existing comparator.
    pub fn with_comparator(cmp: Comparator<T>) -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: NIL,
            min: NIL,
            max: NIL,
            count: 0,
            cmp,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before the arena
    /// reallocates.
    pub fn with_capacity<F>(cmp: F, capacity: usize) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let mut tree = Self::new(cmp);
        tree.reserve(capacity);
        tree
    }

    /// Creates an empty tree for values with a natural total order.
    pub fn new_ordered() -> Self
    where
        T: Ord + 'static,
    {
        Self::with_comparator(compare::ordered())
    }

    /// Creates an empty tree of primitive floats, totally ordered as
    /// [`OrderedFloat`](ordered_float::OrderedFloat) orders them.
    pub fn new_float() -> Self
    where
        T: FloatCore + PrimitiveFloat + 'static,
    {
        Self::with_comparator(compare::float())
    }

    /// Returns the comparator shared by this tree and its clones.
    #[inline]
    pub fn comparator(&self) -> &Comparator<T> {
        &self.cmp
    }

    /// Returns the number of values stored.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the tree holds no values.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of nodes the arena can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves arena room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        let vacant = self.free_list.len();
        self.nodes.reserve(additional.saturating_sub(vacant));
    }

    /// Removes every value, keeping the allocated arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.root = NIL;
        self.min = NIL;
        self.max = NIL;
        self.count = 0;
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.node_ref(self.root)
    }

    /// Returns the node holding the smallest value.
    #[inline]
    pub fn min(&self) -> Option<NodeRef<'_, T>> {
        self.node_ref(self.min)
    }

    /// Returns the node holding the largest value.
    #[inline]
    pub fn max(&self) -> Option<NodeRef<'_, T>> {
        self.node_ref(self.max)
    }

    /// Returns an in-order iterator over the stored values.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Inserts `value`, rebalancing the tree if required.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `(NodeRef, bool)` - The new node and `true`, or the pre-existing
    ///   equal node and `false` when the value is already present
    pub fn insert(&mut self, value: T) -> (NodeRef<'_, T>, bool) {
        if self.root == NIL {
            let idx = self.allocate_node(Node::new(value, NIL, Color::Black));
            self.root = idx;
            self.min = idx;
            self.max = idx;
            self.count = 1;
            return (NodeRef::new(self, idx), true);
        }

        let (parent, side) = match self.find_insertion_slot(&value) {
            Ok(slot) => slot,
            Err(existing) => return (NodeRef::new(self, existing), false),
        };

        let idx = self.allocate_node(Node::new(value, parent, Color::Red));
        self.set_child(parent, side, idx);

        // A new extreme can only hang off the old one.
        if parent == self.min && side == Side::Left {
            self.min = idx;
        } else if parent == self.max && side == Side::Right {
            self.max = idx;
        }

        if self.is_red(parent) {
            self.solve_double_red(parent);
        }

        self.count += 1;

        (NodeRef::new(self, idx), true)
    }

    /// Looks up the node holding a value equal to `value`.
    pub fn find(&self, value: &T) -> Option<NodeRef<'_, T>> {
        self.find_node(value).map(|idx| NodeRef::new(self, idx))
    }

    /// Returns `true` if a value equal to `value` is stored.
    pub fn contains(&self, value: &T) -> bool {
        self.find_node(value).is_some()
    }

    /// Removes the value equal to `value`, rebalancing the tree if required.
    ///
    /// A node with two children takes over its in-order successor's value and
    /// the successor's node is the one physically removed.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to remove
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The stored value that was removed, `None` if absent
    pub fn delete(&mut self, value: &T) -> Option<T> {
        if self.root == NIL {
            return None;
        }

        let target = self.find_node(value)?;
        self.count -= 1;

        if self.count == 0 {
            let removed = self.deallocate_node(target);
            self.clear();
            return Some(removed);
        }

        if target == self.min {
            self.min = self.successor(target);
        }
        if target == self.max {
            self.max = self.predecessor(target);
        }

        Some(self.remove_node(target))
    }

    /// Returns `true` if both trees have the same shape and every pair of
    /// corresponding nodes holds an equal value with the same color.
    ///
    /// Two trees holding the same values after different insertion histories
    /// are not necessarily equal under this predicate.
    pub fn equal_to(&self, other: &Self) -> bool {
        match (self.root == NIL, other.root == NIL) {
            (true, true) => true,
            (false, false) => {
                self.count == other.count && self.equal_subtree(self.root, other, other.root)
            }
            _ => false,
        }
    }

    #[inline]
    fn node_ref(&self, idx: usize) -> Option<NodeRef<'_, T>> {
        if idx == NIL {
            None
        } else {
            Some(NodeRef::new(self, idx))
        }
    }

    fn allocate_node(&mut self, node: Node<T>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn deallocate_node(&mut self, idx: usize) -> T {
        match self.nodes[idx].take() {
            Some(node) => {
                self.free_list.push(idx);
                node.value
            }
            None => unreachable!("node {idx} released twice"),
        }
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<T> {
        match &self.nodes[idx] {
            Some(node) => node,
            None => unreachable!("node {idx} is not allocated"),
        }
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.nodes[idx] {
            Some(node) => node,
            None => unreachable!("node {idx} is not allocated"),
        }
    }

    #[inline]
    pub(crate) fn get_color(&self, idx: usize) -> Color {
        if idx == NIL {
            Color::Black
        } else {
            self.node_at(idx).color
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, idx: usize, color: Color) {
        if idx != NIL {
            self.node_at_mut(idx).color = color;
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, idx: usize) -> bool {
        self.get_color(idx) == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self, idx: usize) -> bool {
        self.get_color(idx) == Color::Black
    }

    #[inline]
    pub(crate) fn get_parent(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node_at(idx).parent
        }
    }

    #[inline]
    pub(crate) fn get_left(&self, idx: usize) -> usize {
        self.get_child(idx, Side::Left)
    }

    #[inline]
    pub(crate) fn get_right(&self, idx: usize) -> usize {
        self.get_child(idx, Side::Right)
    }

    #[inline]
    pub(crate) fn get_child(&self, idx: usize, side: Side) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node_at(idx).child(side)
        }
    }

    /// Points `parent`'s `side` slot at `child` without touching `child`.
    #[inline]
    pub(crate) fn set_child(&mut self, parent: usize, side: Side, child: usize) {
        let node = self.node_at_mut(parent);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Returns the slot `idx` occupies under its parent. `idx` must not be
    /// the root.
    #[inline]
    pub(crate) fn side_of(&self, idx: usize) -> Side {
        if self.get_left(self.get_parent(idx)) == idx {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub(crate) fn leftmost(&self, mut idx: usize) -> usize {
        while idx != NIL {
            let left = self.node_at(idx).left;
            if left == NIL {
                break;
            }
            idx = left;
        }
        idx
    }

    pub(crate) fn rightmost(&self, mut idx: usize) -> usize {
        while idx != NIL {
            let right = self.node_at(idx).right;
            if right == NIL {
                break;
            }
            idx = right;
        }
        idx
    }

    pub(crate) fn successor(&self, idx: usize) -> usize {
        let right = self.get_right(idx);
        if right != NIL {
            return self.leftmost(right);
        }

        let mut current = idx;
        let mut parent = self.get_parent(current);
        while parent != NIL && self.get_right(parent) == current {
            current = parent;
            parent = self.get_parent(parent);
        }
        parent
    }

    pub(crate) fn predecessor(&self, idx: usize) -> usize {
        let left = self.get_left(idx);
        if left != NIL {
            return self.rightmost(left);
        }

        let mut current = idx;
        let mut parent = self.get_parent(current);
        while parent != NIL && self.get_left(parent) == current {
            current = parent;
            parent = self.get_parent(parent);
        }
        parent
    }

    fn find_node(&self, value: &T) -> Option<usize> {
        let mut current = self.root;

        while current != NIL {
            let node = self.node_at(current);
            match (self.cmp)(value, &node.value) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    /// Finds the empty slot `value` belongs in, or the node already holding
    /// an equal value. The tree must not be empty.
    fn find_insertion_slot(&self, value: &T) -> Result<(usize, Side), usize> {
        let mut current = self.root;

        loop {
            let node = self.node_at(current);
            let side = match (self.cmp)(value, &node.value) {
                Ordering::Equal => return Err(current),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };

            let next = node.child(side);
            if next == NIL {
                return Ok((current, side));
            }
            current = next;
        }
    }

    fn swap_values(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b);
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(high);
        if let (Some(x), Some(y)) = (&mut head[low], &mut tail[0]) {
            core::mem::swap(&mut x.value, &mut y.value);
        }
    }

    /// Keeps the cached extremes pointing at `to` after the value held by
    /// `from` moved there.
    fn relocate_extremes(&mut self, from: usize, to: usize) {
        if self.min == from {
            self.min = to;
        }
        if self.max == from {
            self.max = to;
        }
    }

    /// Physically removes the value held by `idx`, which must not be the only
    /// node of the tree, and returns it.
    fn remove_node(&mut self, idx: usize) -> T {
        let left = self.get_left(idx);
        let right = self.get_right(idx);

        if left != NIL && right != NIL {
            let successor = self.leftmost(right);
            self.swap_values(idx, successor);
            self.relocate_extremes(successor, idx);
            return self.remove_node(successor);
        }

        let child = if left != NIL { left } else { right };
        if child != NIL {
            // A lone child is always a red leaf, removing it keeps every
            // black height intact.
            self.swap_values(idx, child);
            self.relocate_extremes(child, idx);
            let side = self.side_of(child);
            self.set_child(idx, side, NIL);
            return self.deallocate_node(child);
        }

        self.detach_leaf(idx)
    }

    fn detach_leaf(&mut self, idx: usize) -> T {
        let parent = self.get_parent(idx);
        let side = self.side_of(idx);
        let color = self.get_color(idx);

        self.set_child(parent, side, NIL);
        let value = self.deallocate_node(idx);

        if color == Color::Black {
            self.solve_double_black(parent, side);
        }

        value
    }

    fn equal_subtree(&self, idx: usize, other: &Self, other_idx: usize) -> bool {
        match (idx == NIL, other_idx == NIL) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }

        let node = self.node_at(idx);
        let other_node = other.node_at(other_idx);

        node.color == other_node.color
            && (self.cmp)(&node.value, &other_node.value) == Ordering::Equal
            && self.equal_subtree(node.left, other, other_node.left)
            && self.equal_subtree(node.right, other, other_node.right)
    }

    fn clone_subtree(&mut self, source: &Self, idx: usize, parent: usize) -> usize
    where
        T: Clone,
    {
        let node = source.node_at(idx);
        let copy = self.allocate_node(Node::new(node.value.clone(), parent, node.color));

        if node.left != NIL {
            let left = self.clone_subtree(source, node.left, copy);
            self.node_at_mut(copy).left = left;
        }
        if node.right != NIL {
            let right = self.clone_subtree(source, node.right, copy);
            self.node_at_mut(copy).right = right;
        }

        copy
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, idx: usize, depth: usize) -> fmt::Result
    where
        T: fmt::Display,
    {
        let node = self.node_at(idx);

        if node.right != NIL {
            self.render(f, node.right, depth + 1)?;
        }

        writeln!(f, "{:width$}{}", "", node.value, width = depth + 1)?;

        if node.left != NIL {
            self.render(f, node.left, depth + 1)?;
        }
        Ok(())
    }
}

impl<T: Clone> Clone for RbTree<T> {
    /// Deep-copies every node into a fresh, compact arena. The comparator is
    /// shared with the source tree.
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(Arc::clone(&self.cmp));

        if self.root != NIL {
            tree.nodes.reserve_exact(self.count);
            tree.root = tree.clone_subtree(self, self.root, NIL);
            tree.min = tree.leftmost(tree.root);
            tree.max = tree.rightmost(tree.root);
            tree.count = self.count;
        }

        tree
    }
}

/// Renders the tree sideways for debugging: right subtrees first, one value
/// per line, indented one space per level below the root.
impl<T: fmt::Display> fmt::Display for RbTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root == NIL {
            return Ok(());
        }
        self.render(f, self.root, 0)
    }
}

impl<T: fmt::Debug> fmt::Debug for RbTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for RbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord + 'static> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new_ordered();
        tree.extend(iter);
        tree
    }
}
