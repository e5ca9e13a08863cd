use core::cmp::Ordering;

use log::debug;

use crate::{
    RbTree,
    node::{Color, NIL, Node, Side},
};

/// State carried through one validation walk.
struct Walk {
    /// Black height recorded at the first absent child reached
    black_height: Option<usize>,
    /// Nodes visited so far
    visited: usize,
}

impl<T> RbTree<T> {
    /// Checks every structural invariant of the tree.
    ///
    /// The tree is valid when the root is black and parentless, no red node
    /// has a red parent, every path to an absent child crosses the same number
    /// of black nodes, parent links mirror child links, values are strictly
    /// increasing in order, and the cached count, minimum and maximum match
    /// the nodes actually reachable from the root.
    ///
    /// Never panics, even on a corrupted arena. The first violation found is
    /// reported through [`log::debug!`].
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the tree is a valid Red-Black tree
    pub fn is_valid(&self) -> bool {
        if self.root == NIL {
            let empty = self.min == NIL && self.max == NIL && self.count == 0;
            if !empty {
                debug!("empty tree with stale min, max or count");
            }
            return empty;
        }

        let Some(root) = self.slot(self.root) else {
            debug!("root {} is not allocated", self.root);
            return false;
        };
        if root.parent != NIL {
            debug!("root has a parent");
            return false;
        }
        if root.color != Color::Black {
            debug!("root is red");
            return false;
        }

        let mut walk = Walk {
            black_height: None,
            visited: 0,
        };
        if !self.check_subtree(self.root, 0, &mut walk) {
            return false;
        }
        if walk.visited != self.count {
            debug!(
                "count is {} but {} nodes are reachable",
                self.count, walk.visited
            );
            return false;
        }

        // Every reachable node is now known to be allocated and linked both
        // ways, so the descents below cannot leave the tree.
        if self.min != self.leftmost(self.root) || self.max != self.rightmost(self.root) {
            debug!("cached min or max is not the leftmost or rightmost node");
            return false;
        }

        self.check_order()
    }

    #[inline]
    fn slot(&self, idx: usize) -> Option<&Node<T>> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    fn check_subtree(&self, idx: usize, mut black_depth: usize, walk: &mut Walk) -> bool {
        walk.visited += 1;
        if walk.visited > self.nodes.len() {
            debug!("walk revisits nodes, child links form a cycle");
            return false;
        }

        let Some(node) = self.slot(idx) else {
            debug!("node {idx} is not allocated");
            return false;
        };

        if node.color == Color::Black {
            black_depth += 1;
        } else if self.slot(node.parent).is_none_or(|p| p.color == Color::Red) {
            debug!("red node {idx} has a red or missing parent");
            return false;
        }

        for side in [Side::Left, Side::Right] {
            let child = node.child(side);

            if child == NIL {
                match walk.black_height {
                    None => walk.black_height = Some(black_depth),
                    Some(height) if height != black_depth => {
                        debug!("black height {black_depth} below node {idx}, expected {height}");
                        return false;
                    }
                    Some(_) => {}
                }
                continue;
            }

            let Some(child_node) = self.slot(child) else {
                debug!("child {child} of node {idx} is not allocated");
                return false;
            };
            if child_node.parent != idx {
                debug!("child {child} does not point back to parent {idx}");
                return false;
            }

            let expected = match side {
                Side::Left => Ordering::Greater,
                Side::Right => Ordering::Less,
            };
            if (self.cmp)(&node.value, &child_node.value) != expected {
                debug!("child {child} is on the wrong side of node {idx}");
                return false;
            }

            if !self.check_subtree(child, black_depth, walk) {
                return false;
            }
        }

        true
    }

    /// Walks min to max through successor links, checking strict ordering
    /// and that the walk covers exactly `count` nodes.
    fn check_order(&self) -> bool {
        let mut steps = 1;
        let mut current = self.min;
        let mut next = self.successor(current);

        while next != NIL {
            steps += 1;
            if steps > self.count {
                debug!("successor walk exceeds count {}", self.count);
                return false;
            }

            if (self.cmp)(&self.node_at(current).value, &self.node_at(next).value)
                != Ordering::Less
            {
                debug!("values are not strictly increasing at node {next}");
                return false;
            }

            current = next;
            next = self.successor(current);
        }

        if steps != self.count {
            debug!("successor walk visits {steps} nodes, count is {}", self.count);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{attach, sample_tree};

    #[test]
    fn test_valid_sample_tree() {
        assert!(sample_tree().is_valid());
    }

    #[test]
    fn test_empty_tree() {
        let tree = RbTree::<i32>::new_ordered();
        assert!(tree.is_valid());

        let mut tree = RbTree::<i32>::new_ordered();
        tree.count = 1;
        assert!(!tree.is_valid());

        let mut tree = RbTree::<i32>::new_ordered();
        tree.min = 0;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_red_root() {
        let mut tree = RbTree::new_ordered();
        let root = attach(&mut tree, NIL, Side::Left, 70, Color::Red);
        tree.min = root;
        tree.max = root;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_root_with_parent() {
        let mut tree = sample_tree();
        let root = tree.root;
        tree.node_at_mut(root).parent = tree.min;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_wrong_count() {
        let mut tree = sample_tree();
        tree.count -= 1;
        assert!(!tree.is_valid());

        let mut tree = sample_tree();
        tree.count += 1;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_invalid_black_height() {
        let mut tree = sample_tree();
        let left = tree.get_left(tree.root);
        tree.set_color(left, Color::Black);
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_unbalanced_single_branch() {
        let mut tree = RbTree::new_ordered();
        let root = attach(&mut tree, NIL, Side::Left, 10, Color::Black);
        let right = attach(&mut tree, root, Side::Right, 20, Color::Black);
        tree.min = root;
        tree.max = right;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_red_child_red_parent() {
        let mut tree = sample_tree();
        let left = tree.get_left(tree.root);
        tree.set_color(left, Color::Black);
        let twenty = tree.get_left(left);
        let sixty = tree.get_right(left);
        tree.set_color(twenty, Color::Red);
        tree.set_color(sixty, Color::Red);
        tree.min = attach(&mut tree, twenty, Side::Left, 10, Color::Red);
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_wrong_parent_left_child() {
        let mut tree = sample_tree();
        let left = tree.get_left(tree.root);
        let right = tree.get_right(tree.root);
        tree.node_at_mut(left).parent = right;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_wrong_parent_right_child() {
        let mut tree = sample_tree();
        let left = tree.get_left(tree.root);
        let right = tree.get_right(tree.root);
        tree.node_at_mut(right).parent = left;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_child_on_wrong_side() {
        let mut tree = sample_tree();
        let sixty = tree.get_right(tree.get_left(tree.root));
        tree.node_at_mut(sixty).value = 40;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_order_violated_across_levels() {
        let mut tree = sample_tree();
        let sixty = tree.get_right(tree.get_left(tree.root));
        tree.node_at_mut(sixty).value = 72;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_stale_min_max() {
        let mut tree = sample_tree();
        tree.min = tree.get_left(tree.root);
        assert!(!tree.is_valid());

        let mut tree = sample_tree();
        tree.max = tree.root;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_dangling_child() {
        let mut tree = sample_tree();
        let max = tree.max;
        tree.node_at_mut(max).right = 1_000;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_child_cycle() {
        let mut tree = sample_tree();
        let max = tree.max;
        let root = tree.root;
        tree.node_at_mut(max).right = root;
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_inconsistent_comparator() {
        let mut tree = RbTree::new(|a: &i32, b: &i32| b.cmp(a));
        tree.insert(1);
        tree.insert(2);
        assert!(tree.is_valid());
        assert_eq!(tree.min().map(|n| *n.value()), Some(2));

        let mut tree = RbTree::new_ordered();
        for value in [70, 50, 80] {
            tree.insert(value);
        }
        tree.cmp = alloc::sync::Arc::new(|a: &i32, b: &i32| b.cmp(a));
        assert!(!tree.is_valid());
    }
}
