// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bookkeeping shared by every partitioning backend.
//!
//! [`PartitionedElements`] is the authoritative set of keys a backend currently
//! indexes. [`KeyLookup`] gives membership tests over a caller's key batch without
//! hashing small batches.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::types::BoundingBoxElement;

/// Set of keys currently held by a partitioning backend.
#[derive(Clone, Debug)]
pub struct PartitionedElements<K: Copy + Eq + Hash> {
    keys: HashSet<K>,
}

impl<K: Copy + Eq + Hash> Default for PartitionedElements<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PartitionedElements<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// True if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Register `key`. Returns false if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Unregister `key`. Returns false if it was not present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.keys.remove(key)
    }

    /// Unregister every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Membership view over a batch of keys.
///
/// Batches no larger than the small-collection threshold stay a borrowed slice and
/// are scanned linearly; larger batches are hashed once.
#[derive(Debug)]
pub enum KeyLookup<'a, K: Copy + Eq + Hash> {
    /// Borrowed batch, scanned on lookup.
    Few(&'a [K]),
    /// Hashed batch.
    Many(HashSet<K>),
}

impl<'a, K: Copy + Eq + Hash> KeyLookup<'a, K> {
    /// Pick a representation for `keys` given the small-collection threshold.
    pub fn new(keys: &'a [K], small_threshold: usize) -> Self {
        if keys.len() <= small_threshold {
            Self::Few(keys)
        } else {
            Self::Many(keys.iter().copied().collect())
        }
    }

    /// Whether `key` is part of the batch.
    pub fn contains(&self, key: &K) -> bool {
        match self {
            Self::Few(keys) => keys.contains(key),
            Self::Many(set) => set.contains(key),
        }
    }
}

/// Deduplicate a batch by key. The last occurrence of a key wins; otherwise input
/// order is kept.
pub fn unique_elements<K, T>(
    elements: &[BoundingBoxElement<K, T>],
    small_threshold: usize,
) -> Vec<BoundingBoxElement<K, T>>
where
    K: Copy + Eq + Hash,
    T: Copy,
{
    let mut out: Vec<BoundingBoxElement<K, T>> = Vec::with_capacity(elements.len());
    if elements.len() <= small_threshold {
        for e in elements {
            if let Some(existing) = out.iter_mut().find(|o| o.key() == e.key()) {
                *existing = *e;
            } else {
                out.push(*e);
            }
        }
    } else {
        let mut position: HashMap<K, usize> = HashMap::with_capacity(elements.len());
        for e in elements {
            if let Some(&i) = position.get(e.key()) {
                out[i] = *e;
            } else {
                position.insert(*e.key(), out.len());
                out.push(*e);
            }
        }
    }
    out
}
