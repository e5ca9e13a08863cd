use core::iter::FusedIterator;

use crate::{RbTree, node::NIL};

/// In-order iterator over the values of an [`RbTree`].
///
/// Follows successor links from the minimum and predecessor links from the
/// maximum, so each step is O(log n) worst case and O(1) amortized.
pub struct Iter<'a, T> {
    tree: &'a RbTree<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RbTree<T>) -> Self {
        Self {
            tree,
            front: tree.min,
            back: tree.max,
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front == NIL {
            return None;
        }

        let idx = self.front;
        self.front = self.tree.successor(idx);
        self.remaining -= 1;
        Some(&self.tree.node_at(idx).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back == NIL {
            return None;
        }

        let idx = self.back;
        self.back = self.tree.predecessor(idx);
        self.remaining -= 1;
        Some(&self.tree.node_at(idx).value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> IntoIterator for &'a RbTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{RbTree, tree::tests::sample_tree};
    use alloc::{vec, vec::Vec};

    #[test]
    fn test_iter_empty() {
        let tree = RbTree::<i32>::new_ordered();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.iter().len(), 0);
    }

    #[test]
    fn test_iter_forward_and_backward() {
        let tree = sample_tree();

        let forward: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(forward, vec![20, 50, 60, 70, 75, 80, 100]);

        let backward: Vec<i32> = tree.iter().rev().copied().collect();
        assert_eq!(backward, vec![100, 80, 75, 70, 60, 50, 20]);
    }

    #[test]
    fn test_iter_meets_in_the_middle() {
        let tree = sample_tree();
        let mut iter = tree.iter();

        assert_eq!(iter.next(), Some(&20));
        assert_eq!(iter.next_back(), Some(&100));
        assert_eq!(iter.len(), 5);

        let middle: Vec<i32> = iter.by_ref().copied().collect();
        assert_eq!(middle, vec![50, 60, 70, 75, 80]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_into_iterator_for_reference() {
        let tree: RbTree<u32> = (0..10).rev().collect();
        let mut sum = 0;
        for value in &tree {
            sum += value;
        }
        assert_eq!(sum, 45);
    }
}
