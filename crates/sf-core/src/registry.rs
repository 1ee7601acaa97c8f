//! Insertion-ordered keyed storage.
//!
//! Streams, units, disjuncts and inventory rows are all declared incrementally
//! and reported in declaration order, so they live in a `Vec` with a reverse
//! lookup table rather than a plain hash map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::{SfError, SfResult};

#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    entries: Vec<(K, V)>,
    lookup: HashMap<K, usize>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V> Registry<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.lookup.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Position of `key` in declaration order.
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.get(key).copied()
    }

    /// Insert a new entry; an existing key is a `Duplicate` error.
    pub fn insert_new(&mut self, kind: &'static str, key: K, value: V) -> SfResult<&mut V>
    where
        K: std::fmt::Display,
    {
        if self.lookup.contains_key(&key) {
            return Err(SfError::Duplicate {
                kind,
                key: key.to_string(),
            });
        }
        Ok(self.push(key, value))
    }

    /// Return the existing entry for `key` or insert the one produced by `make`.
    ///
    /// The boolean is `true` when a new entry was created.
    pub fn upsert_with(&mut self, key: K, make: impl FnOnce() -> V) -> (&mut V, bool) {
        if let Some(&i) = self.lookup.get(&key) {
            return (&mut self.entries[i].1, false);
        }
        (self.push(key, make()), true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_iter().map(|(_, v)| v)
    }

    fn push(&mut self, key: K, value: V) -> &mut V {
        let idx = self.entries.len();
        self.lookup.insert(key.clone(), idx);
        self.entries.push((key, value));
        &mut self.entries[idx].1
    }
}
