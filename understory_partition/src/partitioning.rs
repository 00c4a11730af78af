// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning trait implemented by every backend.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::types::{Aabb2D, BoundingBoxElement};

/// A spatial partitioning of keyed bounding boxes.
///
/// Implementations keep their internal index and their registry of partitioned
/// keys in sync after every call. Keys are unique: a key maps to at most one
/// bounding box at any time.
///
/// Keys must be `Copy`: ids, slot indices, small enums. Owned keys such as
/// `String` are not accepted directly; intern them into a handle first.
///
/// ```rust
/// use understory_partition::{Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree};
///
/// let names = ["header", "sidebar"];
/// let mut tree: KdTree<usize, i64> = KdTree::new();
/// tree.add_or_update_elements(&[
///     BoundingBoxElement::new(0, Aabb2D::new(0, 0, 100, 20)),
///     BoundingBoxElement::new(1, Aabb2D::new(0, 20, 30, 100)),
/// ]);
/// let hit: Vec<&str> = tree
///     .elements_at_position(10, 50)
///     .into_iter()
///     .map(|i| names[i])
///     .collect();
/// assert_eq!(hit, ["sidebar"]);
/// ```
pub trait BoundingBoxPartitioning<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Number of partitioned elements.
    fn len(&self) -> usize;

    /// True if nothing is partitioned.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every element.
    fn clear(&mut self);

    /// Insert new keys and replace the geometry of keys already present.
    ///
    /// When a key occurs more than once in `elements`, the last occurrence wins.
    fn add_or_update_elements(&mut self, elements: &[BoundingBoxElement<K, T>]);

    /// Remove the given keys. Keys that are not partitioned are ignored.
    fn remove_elements(&mut self, keys: &[K]);

    /// Whether `key` is currently partitioned.
    fn is_element_partitioned(&self, key: &K) -> bool;

    /// Append to `out` every key whose box overlaps `region` (`allow_overlap`) or
    /// lies entirely inside it (`!allow_overlap`).
    fn elements_in_region_into(&self, region: Aabb2D<T>, allow_overlap: bool, out: &mut Vec<K>);

    /// Append to `out` every key whose box contains the point.
    fn elements_at_position_into(&self, x: T, y: T, out: &mut Vec<K>);

    /// Keys whose box overlaps or lies inside `region`. See
    /// [`elements_in_region_into`](Self::elements_in_region_into).
    fn elements_in_region(&self, region: Aabb2D<T>, allow_overlap: bool) -> Vec<K> {
        let mut out = Vec::new();
        self.elements_in_region_into(region, allow_overlap, &mut out);
        out
    }

    /// Keys whose box contains the point.
    fn elements_at_position(&self, x: T, y: T) -> Vec<K> {
        let mut out = Vec::new();
        self.elements_at_position_into(x, y, &mut out);
        out
    }
}
