// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! KD-tree backend over rectangle edges.
//!
//! Each level splits on one of `XMin`, `YMin`, `XMax`, `YMax` in turn. Adds are
//! plain KD insertions; removals promote replacements in place. Both are budgeted:
//! when a batch would touch more than a configured fraction of the tree, the tree
//! is rebuilt from scratch with quickselect medians instead.

mod build;
mod node;
mod query;
mod remove;
mod walk;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::config::PartitionConfig;
use crate::partitioning::BoundingBoxPartitioning;
use crate::registry::{KeyLookup, PartitionedElements, unique_elements};
use crate::types::{Aabb2D, BoundingBoxElement};

use node::Arena;
use remove::RemoveOutcome;
use walk::Continuation;

/// Incrementally maintained KD-tree over keyed bounding boxes.
///
/// ```rust
/// use understory_partition::{Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree};
///
/// let mut tree: KdTree<&str, f64> = KdTree::new();
/// tree.add_or_update_elements(&[
///     BoundingBoxElement::new("a", Aabb2D::<f64>::from_xywh(0.0, 0.0, 10.0, 10.0)),
///     BoundingBoxElement::new("b", Aabb2D::<f64>::from_xywh(5.0, 5.0, 5.0, 5.0)),
///     BoundingBoxElement::new("c", Aabb2D::<f64>::from_xywh(20.0, 20.0, 5.0, 5.0)),
/// ]);
///
/// let mut inside = tree.elements_in_region(Aabb2D::new(0.0, 0.0, 15.0, 15.0), false);
/// inside.sort();
/// assert_eq!(inside, ["a", "b"]);
///
/// tree.remove_elements(&["a"]);
/// assert!(tree.elements_at_position(1.0, 1.0).is_empty());
/// ```
pub struct KdTree<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    arena: Arena<K, T>,
    partitioned: PartitionedElements<K>,
    config: PartitionConfig,
}

impl<K, T> Default for KdTree<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Debug for KdTree<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("nodes", &self.arena.len())
            .field("partitioned", &self.partitioned.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K, T> KdTree<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PartitionConfig::default())
    }

    /// Create an empty tree with the given configuration.
    pub fn with_config(config: PartitionConfig) -> Self {
        Self {
            arena: Arena::default(),
            partitioned: PartitionedElements::new(),
            config,
        }
    }

    /// Build a balanced tree over `elements` in one pass.
    pub fn from_elements(config: PartitionConfig, elements: &[BoundingBoxElement<K, T>]) -> Self {
        let mut tree = Self::with_config(config);
        tree.add_or_update_elements(elements);
        tree
    }

    /// The active configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Number of levels in the tree (0 when empty).
    ///
    /// A fresh build has depth about `log2(len) + 1`; incremental inserts can
    /// deepen it until the next rebuild.
    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    /// Rebuild the tree from scratch, restoring balance after many incremental edits.
    pub fn rebuild(&mut self) {
        let mut all = self.elements();
        self.arena.build(&mut all);
    }

    /// Snapshot of every partitioned element, in tree order.
    pub fn elements(&self) -> Vec<BoundingBoxElement<K, T>> {
        let mut out = Vec::with_capacity(self.arena.len());
        self.arena.walk(|_, n| {
            out.push(n.element());
            Continuation::ContinueAll
        });
        out
    }

    /// The bounding box `key` is partitioned under, if any.
    ///
    /// Walks the tree, so this is linear in the element count.
    pub fn bounding_box(&self, key: &K) -> Option<Aabb2D<T>> {
        if !self.partitioned.contains(key) {
            return None;
        }
        let mut found = None;
        self.arena.walk(|_, n| {
            if n.key == *key {
                found = Some(n.bbox);
                Continuation::Stop
            } else {
                Continuation::ContinueAll
            }
        });
        found
    }

    /// Every element not in `excluded`, once per key.
    ///
    /// A removal that ran out of budget halfway through promoting a replacement
    /// leaves that element in two slots; only the first copy is kept.
    fn surviving(&self, excluded: &KeyLookup<'_, K>, extra: usize) -> Vec<BoundingBoxElement<K, T>> {
        let mut seen: HashSet<K> = HashSet::with_capacity(self.arena.len());
        let mut kept = Vec::with_capacity(self.arena.len() + extra);
        self.arena.walk(|_, n| {
            if !excluded.contains(&n.key) && seen.insert(n.key) {
                kept.push(n.element());
            }
            Continuation::ContinueAll
        });
        kept
    }

    /// Rebuild from scratch without the keys in `removed`.
    fn remove_and_rebuild(&mut self, removed: &KeyLookup<'_, K>) {
        let mut kept = self.surviving(removed, 0);
        tracing::debug!(kept = kept.len(), "kd-tree rebuilding after removal");
        self.arena.build(&mut kept);
    }

    /// Rebuild from scratch with `elements` replacing the keys in `updated`.
    fn update_and_rebuild(
        &mut self,
        updated: &KeyLookup<'_, K>,
        elements: &[BoundingBoxElement<K, T>],
    ) {
        let mut all = self.surviving(updated, elements.len());
        all.extend_from_slice(elements);
        tracing::debug!(
            total = all.len(),
            updated = elements.len(),
            "kd-tree rebuilding after update"
        );
        self.arena.build(&mut all);
    }
}

impl<K, T> BoundingBoxPartitioning<K, T> for KdTree<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    fn len(&self) -> usize {
        self.partitioned.len()
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.partitioned.clear();
        tracing::trace!("kd-tree cleared");
    }

    fn add_or_update_elements(&mut self, elements: &[BoundingBoxElement<K, T>]) {
        if elements.is_empty() {
            return;
        }
        let small = self.config.small_collection_threshold();
        let mut elements = unique_elements(elements, small);

        if self.arena.is_empty() {
            self.arena.build(&mut elements);
        } else {
            // An update is a removal followed by a reinsertion.
            let updated: Vec<K> = elements
                .iter()
                .map(|e| *e.key())
                .filter(|k| self.partitioned.contains(k))
                .collect();
            let lookup = KeyLookup::new(&updated, small);
            let outcome = if updated.is_empty() {
                RemoveOutcome::Removed
            } else {
                self.arena
                    .remove_keys(&lookup, self.config.update_rebuild_threshold())
            };
            match outcome {
                RemoveOutcome::RebuildNeeded => self.update_and_rebuild(&lookup, &elements),
                RemoveOutcome::Cleared => self.arena.build(&mut elements),
                RemoveOutcome::Removed if self.arena.is_empty() => {
                    self.arena.build(&mut elements);
                }
                RemoveOutcome::Removed => {
                    for e in &elements {
                        self.arena.insert(*e);
                    }
                }
            }
        }

        for e in &elements {
            self.partitioned.insert(*e.key());
        }
        debug_assert_eq!(
            self.arena.len(),
            self.partitioned.len(),
            "tree and registry out of sync"
        );
    }

    fn remove_elements(&mut self, keys: &[K]) {
        if keys.is_empty() || self.arena.is_empty() {
            return;
        }
        let lookup = KeyLookup::new(keys, self.config.small_collection_threshold());
        match self
            .arena
            .remove_keys(&lookup, self.config.remove_rebuild_threshold())
        {
            RemoveOutcome::Removed | RemoveOutcome::Cleared => {}
            RemoveOutcome::RebuildNeeded => self.remove_and_rebuild(&lookup),
        }
        for key in keys {
            self.partitioned.remove(key);
        }
        debug_assert_eq!(
            self.arena.len(),
            self.partitioned.len(),
            "tree and registry out of sync"
        );
    }

    fn is_element_partitioned(&self, key: &K) -> bool {
        self.partitioned.contains(key)
    }

    fn elements_in_region_into(&self, region: Aabb2D<T>, allow_overlap: bool, out: &mut Vec<K>) {
        self.arena.region_into(region, allow_overlap, out);
    }

    fn elements_at_position_into(&self, x: T, y: T, out: &mut Vec<K>) {
        self.arena.point_into(x, y, out);
    }
}
