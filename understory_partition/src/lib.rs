// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_partition --heading-base-level=0

//! Understory Partition: bounding-box space partitioning for 2D AABBs.
//!
//! Understory Partition answers "which elements are in this region?" and "which
//! elements are under this point?" for a set of keyed axis-aligned bounding boxes
//! (AABBs) that changes over time.
//!
//! - Add, update, and remove elements in batches, keyed by any `Copy + Eq + Hash` key.
//!   Keys are small handles; intern owned keys like `String` before partitioning them.
//! - Query by region, either overlapping or fully contained, or by point.
//! - Check membership in O(1).
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! The optional `kurbo` feature adds conversions from Kurbo rectangles and points.
//!
//! Backends share the [`BoundingBoxPartitioning`] trait. [`KdTree`] is the main
//! structure; [`FlatVec`] is a linear scan for tiny sets and for checking results.
//!
//! # Example
//!
//! ```rust
//! use understory_partition::{Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree};
//!
//! let mut tree: KdTree<u32, i64> = KdTree::new();
//! tree.add_or_update_elements(&[
//!     BoundingBoxElement::new(1, Aabb2D::new(0, 0, 10, 10)),
//!     BoundingBoxElement::new(2, Aabb2D::new(5, 5, 15, 15)),
//! ]);
//!
//! // Move the first box.
//! tree.add_or_update_elements(&[BoundingBoxElement::new(1, Aabb2D::new(20, 0, 30, 10))]);
//!
//! // Query a point inside the second box.
//! assert_eq!(tree.elements_at_position(6, 6), [2]);
//!
//! // Boxes overlapping a region, and boxes contained in it.
//! let region = Aabb2D::new(0, 0, 25, 12);
//! let mut overlapping = tree.elements_in_region(region, true);
//! overlapping.sort();
//! assert_eq!(overlapping, [1, 2]);
//! assert!(tree.elements_in_region(region, false).is_empty());
//! ```
//!
//! ## Tuning
//!
//! [`PartitionConfig`] holds the rebuild thresholds (fractions of the element count
//! an incremental removal or update may touch before the tree is rebuilt) and the
//! batch size below which key lookups scan instead of hashing.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Edges are inclusive:
//! touching boxes overlap and points on an edge are contained.
//!
//! ### Logging
//!
//! Rebuild fallbacks are reported with `tracing` at `debug` level and builds at
//! `trace` level. The crate never installs a subscriber.

#![no_std]

extern crate alloc;

pub mod backends;
pub mod config;
pub mod error;
pub mod partitioning;
pub mod registry;
pub mod types;

pub use backends::flatvec::FlatVec;
pub use backends::kdtree::KdTree;
pub use config::PartitionConfig;
pub use error::PartitionError;
pub use partitioning::BoundingBoxPartitioning;
pub use registry::{KeyLookup, PartitionedElements};
pub use types::{Aabb2D, Axis, BoundingBoxElement};
