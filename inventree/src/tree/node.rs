//! AVL Tree Node

use std::borrow::Borrow;
use std::cmp::Ordering;

/// A subtree. Every node exclusively owns its children.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    height: usize,
}

impl<K, V> Node<K, V>
where
    K: Ord,
{
    fn boxed(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Height of a subtree, an empty subtree has height 0.
    pub(crate) fn height(link: &Link<K, V>) -> usize {
        link.as_ref().map_or(0, |node| node.height)
    }

    /// Height of the left subtree less the height of the right subtree.
    pub(crate) fn balance(link: &Link<K, V>) -> isize {
        match link {
            Some(node) => Self::height(&node.left) as isize - Self::height(&node.right) as isize,
            None => 0,
        }
    }

    /// Height recomputed from our children, rather than the cached value.
    pub(crate) fn computed_height(&self) -> usize {
        1 + Self::height(&self.left).max(Self::height(&self.right))
    }

    pub(crate) fn cached_height(&self) -> usize {
        self.height
    }

    fn update_height(&mut self) {
        self.height = self.computed_height();
    }

    //       y            x
    //      / \          / \
    //     x   c   =>   a   y
    //    / \              / \
    //   a   b            b   c
    fn rotate_right(mut y: Box<Self>) -> Box<Self> {
        let Some(mut x) = y.left.take() else {
            return y;
        };
        y.left = x.right.take();
        y.update_height();
        x.right = Some(y);
        x.update_height();
        x
    }

    //     x                y
    //    / \              / \
    //   a   y     =>     x   c
    //      / \          / \
    //     b   c        a   b
    fn rotate_left(mut x: Box<Self>) -> Box<Self> {
        let Some(mut y) = x.right.take() else {
            return x;
        };
        x.right = y.left.take();
        x.update_height();
        y.left = Some(x);
        y.update_height();
        y
    }

    fn rotate(link: &mut Link<K, V>, rotation: fn(Box<Self>) -> Box<Self>) {
        if let Some(node) = link.take() {
            *link = Some(rotation(node));
        }
    }

    /// Insert into the subtree rooted at link.
    ///
    /// Returns the direction taken at this level, or None if the key is already present (in
    /// which case nothing is modified).
    pub(crate) fn insert(link: &mut Link<K, V>, key: K, value: V) -> Option<Ordering> {
        let Some(node) = link else {
            *link = Some(Self::boxed(key, value));
            return Some(Ordering::Equal);
        };
        let side = key.cmp(&node.key);
        let below = match side {
            Ordering::Less => Self::insert(&mut node.left, key, value)?,
            Ordering::Greater => Self::insert(&mut node.right, key, value)?,
            Ordering::Equal => return None,
        };
        node.update_height();
        let balance = Self::balance(link);

        // `below` is where the new key went relative to our child, which is enough to tell
        // the outer (single rotation) cases from the inner (double rotation) ones.
        if balance > 1 {
            if below == Ordering::Greater {
                if let Some(node) = link {
                    Self::rotate(&mut node.left, Self::rotate_left);
                }
            }
            Self::rotate(link, Self::rotate_right);
        } else if balance < -1 {
            if below == Ordering::Less {
                if let Some(node) = link {
                    Self::rotate(&mut node.right, Self::rotate_right);
                }
            }
            Self::rotate(link, Self::rotate_left);
        }
        Some(side)
    }

    /// Remove key from the subtree rooted at link, returning its value.
    pub(crate) fn delete<Q>(link: &mut Link<K, V>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_mut()?;
        let value = match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::delete(&mut node.left, key)?,
            Ordering::Greater => Self::delete(&mut node.right, key)?,
            Ordering::Equal => {
                let mut target = link.take()?;
                *link = match (target.left.take(), target.right.take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        // Our in-order successor takes our place
                        let mut right = Some(right);
                        match Self::take_min(&mut right) {
                            Some(mut successor) => {
                                successor.left = Some(left);
                                successor.right = right;
                                Some(successor)
                            }
                            None => Some(left),
                        }
                    }
                };
                target.value
            }
        };
        Self::rebalance(link);
        Some(value)
    }

    /// Detach the minimum node of a subtree, rebalancing each level on the way back up.
    fn take_min(link: &mut Link<K, V>) -> Option<Box<Self>> {
        let node = link.as_mut()?;
        if node.left.is_some() {
            let min = Self::take_min(&mut node.left);
            Self::rebalance(link);
            min
        } else {
            let mut min = link.take()?;
            *link = min.right.take();
            Some(min)
        }
    }

    /// Restore the balance of a node after a removal below it.
    ///
    /// Unlike insertion, the double rotation cases are identified by the balance of the
    /// heavier child.
    fn rebalance(link: &mut Link<K, V>) {
        let Some(node) = link.as_mut() else {
            return;
        };
        node.update_height();
        let balance = Self::balance(link);
        if balance > 1 {
            if let Some(node) = link {
                if Self::balance(&node.left) < 0 {
                    Self::rotate(&mut node.left, Self::rotate_left);
                }
            }
            Self::rotate(link, Self::rotate_right);
        } else if balance < -1 {
            if let Some(node) = link {
                if Self::balance(&node.right) > 0 {
                    Self::rotate(&mut node.right, Self::rotate_right);
                }
            }
            Self::rotate(link, Self::rotate_left);
        }
    }
}
