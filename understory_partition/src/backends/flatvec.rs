// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::partitioning::BoundingBoxPartitioning;
use crate::registry::{KeyLookup, PartitionedElements};
use crate::types::{Aabb2D, BoundingBoxElement};

/// Flat vector backend with linear scans.
///
/// Elements are stored densely; a key-to-position map makes updates and removals
/// O(1) (removal swaps the last element into the hole). Queries visit every element.
pub struct FlatVec<K: Copy + Eq + Hash + Debug, T: Copy + PartialOrd + Debug> {
    elements: Vec<BoundingBoxElement<K, T>>,
    positions: HashMap<K, usize>,
    partitioned: PartitionedElements<K>,
    small_threshold: usize,
}

impl<K, T> Default for FlatVec<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> FlatVec<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            positions: HashMap::new(),
            partitioned: PartitionedElements::new(),
            small_threshold: crate::PartitionConfig::DEFAULT_SMALL_COLLECTION_THRESHOLD,
        }
    }

    /// The bounding box currently stored for `key`.
    pub fn bounding_box(&self, key: &K) -> Option<Aabb2D<T>> {
        let &i = self.positions.get(key)?;
        Some(*self.elements[i].bounding_box())
    }

    fn remove_at(&mut self, i: usize) {
        let removed = self.elements.swap_remove(i);
        self.positions.remove(removed.key());
        if let Some(moved) = self.elements.get(i) {
            self.positions.insert(*moved.key(), i);
        }
    }
}

impl<K, T> Debug for FlatVec<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("elements", &self.elements.len())
            .field("partitioned", &self.partitioned.len())
            .finish_non_exhaustive()
    }
}

impl<K, T> BoundingBoxPartitioning<K, T> for FlatVec<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn len(&self) -> usize {
        self.partitioned.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.positions.clear();
        self.partitioned.clear();
    }

    fn add_or_update_elements(&mut self, elements: &[BoundingBoxElement<K, T>]) {
        for e in elements {
            if let Some(&i) = self.positions.get(e.key()) {
                self.elements[i] = *e;
            } else {
                self.positions.insert(*e.key(), self.elements.len());
                self.elements.push(*e);
                self.partitioned.insert(*e.key());
            }
        }
    }

    fn remove_elements(&mut self, keys: &[K]) {
        if keys.is_empty() || self.elements.is_empty() {
            return;
        }
        if keys.len() <= self.small_threshold {
            for key in keys {
                if let Some(&i) = self.positions.get(key) {
                    self.remove_at(i);
                    self.partitioned.remove(key);
                }
            }
        } else {
            let lookup = KeyLookup::new(keys, self.small_threshold);
            self.elements.retain(|e| !lookup.contains(e.key()));
            self.positions.clear();
            for (i, e) in self.elements.iter().enumerate() {
                self.positions.insert(*e.key(), i);
            }
            for key in keys {
                self.partitioned.remove(key);
            }
        }
    }

    fn is_element_partitioned(&self, key: &K) -> bool {
        self.partitioned.contains(key)
    }

    fn elements_in_region_into(&self, region: Aabb2D<T>, allow_overlap: bool, out: &mut Vec<K>) {
        for e in &self.elements {
            let hit = if allow_overlap {
                region.overlaps(e.bounding_box())
            } else {
                region.contains_rect(e.bounding_box())
            };
            if hit {
                out.push(*e.key());
            }
        }
    }

    fn elements_at_position_into(&self, x: T, y: T, out: &mut Vec<K>) {
        for e in &self.elements {
            if e.bounding_box().contains_point(x, y) {
                out.push(*e.key());
            }
        }
    }
}
