// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different partitioning strategies.
//!
//! - `kdtree`: KD-tree over rectangle edges with budgeted incremental maintenance
//!   and quickselect-balanced rebuilds.
//! - `flatvec`: flat vector with linear scans (small, simple; the reference
//!   behavior the KD-tree is tested against).
//!
//! KD-tree maintenance
//! -------------------
//! Adds insert one node per element without rebalancing. Updates and removals
//! delete nodes in place by promoting a replacement from the subtree, charging
//! every node they visit. If a batch matches or visits more than
//! `threshold * len` nodes, the tree is flattened, filtered, and rebuilt with
//! median splits instead, so a bad batch costs one `O(n log n)` build rather than
//! many deep deletions.

pub mod flatvec;
pub mod kdtree;
