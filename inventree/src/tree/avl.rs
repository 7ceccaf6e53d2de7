//! AVL tree
//!
//! This is the ordered index used by an inventory.
//!

use std::borrow::Borrow;
use std::fmt::Debug;

use thiserror::Error;

use super::iter::Iter;
use super::node::{Link, Node};
use super::Direction;

/// Keys which we wish to store in an AVL tree.
pub trait AvlKey: Ord + Debug {}

// Blanket implementation which satisfies the compiler
impl<K> AvlKey for K
where
    K: Ord + Debug,
{
    // Nothing to implement, since K already supports the other traits.
}

/// Problems found when verifying a tree.
#[derive(Error, Debug, PartialEq)]
pub enum TreeError {
    /// A node's subtrees differ in height by more than one
    #[error("node with key: {key} has balance factor: {balance}")]
    Unbalanced {
        /// Key of the offending node
        key: String,
        /// Height of the left subtree less the height of the right subtree
        balance: isize,
    },

    /// A node's cached height doesn't match the height of its subtrees
    #[error("node with key: {key} records height: {found}, expected: {expected}")]
    BadHeight {
        /// Key of the offending node
        key: String,
        /// Height computed from the subtrees
        expected: usize,
        /// Height stored in the node
        found: usize,
    },

    /// In-order traversal is not strictly ascending
    #[error("key: {next} follows key: {previous}")]
    OutOfOrder {
        /// Earlier key
        previous: String,
        /// Later key
        next: String,
    },

    /// Tracked entry count doesn't match the number of nodes
    #[error("tree records {found} entries but holds {expected}")]
    BadLength {
        /// Number of nodes found by traversal
        expected: usize,
        /// Number of entries tracked by the tree
        found: usize,
    },
}

/// An AVL tree.
///
/// Keys are unique. Inserting a key which is already present is ignored, the existing entry is
/// left exactly as it was.
#[derive(Clone, Debug)]
pub struct AvlTree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K, V> AvlTree<K, V>
where
    K: AvlKey,
{
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return count of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree, an empty tree has height 0.
    pub fn height(&self) -> usize {
        Node::height(&self.root)
    }

    /// Insert a Key and Value.
    ///
    /// Returns false, and leaves the tree untouched, if the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        tracing::debug!("INSERTING: {:?}", key);
        let inserted = Node::insert(&mut self.root, key, value).is_some();
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Delete a Key and return its Value, if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + Debug + ?Sized,
    {
        tracing::debug!("DELETING: {:?}", key);
        let value = Node::delete(&mut self.root, key);
        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Get the value.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = &self.root;
        while let Some(node) = link {
            match key.cmp(node.key.borrow()) {
                std::cmp::Ordering::Less => link = &node.left,
                std::cmp::Ordering::Greater => link = &node.right,
                std::cmp::Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Does the tree contain this key?
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Return first entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Return last entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.iter_in(Direction::Descending).next()
    }

    /// Iterate over entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.iter_in(Direction::Ascending)
    }

    /// Iterate over entries in the given direction.
    ///
    /// Each call starts a fresh traversal from the root.
    pub fn iter_in(&self, direction: Direction) -> Iter<'_, K, V> {
        Iter::new(&self.root, direction, self.len)
    }

    /// Iterate over keys in the given direction.
    pub fn keys(&self, direction: Direction) -> impl Iterator<Item = &K> + '_ {
        self.iter_in(direction).map(|(key, _)| key)
    }

    /// Iterate over values in the given direction.
    pub fn values(&self, direction: Direction) -> impl Iterator<Item = &V> + '_ {
        self.iter_in(direction).map(|(_, value)| value)
    }

    /// Verify the structure of the tree.
    ///
    /// Checks that every node is balanced and has an accurate height, that keys are in strictly
    /// ascending order and that the tracked length is correct.
    pub fn verify(&self) -> Result<(), TreeError> {
        Self::verify_node(&self.root)?;

        let mut count = 0;
        let mut previous: Option<&K> = None;
        for key in self.keys(Direction::Ascending) {
            if let Some(prev) = previous {
                if prev >= key {
                    return Err(TreeError::OutOfOrder {
                        previous: format!("{prev:?}"),
                        next: format!("{key:?}"),
                    });
                }
            }
            previous = Some(key);
            count += 1;
        }
        if count != self.len {
            return Err(TreeError::BadLength {
                expected: count,
                found: self.len,
            });
        }
        Ok(())
    }

    fn verify_node(link: &Link<K, V>) -> Result<(), TreeError> {
        if let Some(node) = link {
            Self::verify_node(&node.left)?;
            Self::verify_node(&node.right)?;
            let expected = node.computed_height();
            if node.cached_height() != expected {
                return Err(TreeError::BadHeight {
                    key: format!("{:?}", node.key),
                    expected,
                    found: node.cached_height(),
                });
            }
            let balance = Node::balance(link);
            if !(-1..=1).contains(&balance) {
                return Err(TreeError::Unbalanced {
                    key: format!("{:?}", node.key),
                    balance,
                });
            }
        }
        Ok(())
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTree<K, V>
where
    K: AvlKey,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for AvlTree<K, V>
where
    K: AvlKey,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AvlTree<K, V>
where
    K: AvlKey,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
