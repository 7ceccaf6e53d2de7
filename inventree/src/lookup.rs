//! Hash lookup index
//!
//! Constant time existence checks and retrieval by key. No ordering is maintained.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// A hash map from key to value.
#[derive(Clone, Debug)]
pub struct Lookup<K, V> {
    map: HashMap<K, V>,
}

impl<K, V> Default for Lookup<K, V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K, V> Lookup<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning any value previously stored under the same key.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Remove a key and return its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.remove(key)
    }

    /// Get the value.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(key)
    }

    /// Does the index contain this key?
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Return count of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values()
    }
}
