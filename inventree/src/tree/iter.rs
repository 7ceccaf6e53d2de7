use std::iter::FusedIterator;

use super::node::{Link, Node};
use super::Direction;

/// In-order iterator over the entries of an [`AvlTree`](super::AvlTree).
///
/// Holds the path from the root to the next node, so memory use is bounded by the height of
/// the tree.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    direction: Direction,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Link<K, V>, direction: Direction, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            direction,
            remaining: len,
        };
        iter.descend(root);
        iter
    }

    // Push the near edge of a subtree, so the smallest (or largest) entry is on top.
    fn descend(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = match self.direction {
                Direction::Ascending => &node.left,
                Direction::Descending => &node.right,
            };
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match self.direction {
            Direction::Ascending => self.descend(&node.right),
            Direction::Descending => self.descend(&node.left),
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
