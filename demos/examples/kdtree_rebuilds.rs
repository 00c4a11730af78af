// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! KD-tree rebuild thresholds.
//!
//! Remove a small and a large batch from a grid of cells and watch the tree
//! switch from incremental deletion to a full rebuild.
//!
//! Run:
//! - `RUST_LOG=understory_partition=debug cargo run -p understory_demos --example kdtree_rebuilds`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_partition::{
    Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree, PartitionConfig,
};

fn grid(n: u32, cell: f64) -> Vec<BoundingBoxElement<u32, f64>> {
    (0..n * n)
        .map(|i| {
            let x0 = f64::from(i % n) * cell;
            let y0 = f64::from(i / n) * cell;
            BoundingBoxElement::new(i, Aabb2D::from(Rect::new(x0, y0, x0 + cell, y0 + cell)))
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = PartitionConfig::default().with_remove_rebuild_threshold(0.25);
    let cells = grid(32, 10.0);
    let mut tree = KdTree::from_elements(config, &cells);
    println!("built {} cells, depth {}", tree.len(), tree.depth());

    // A handful of removals stays within the budget.
    tree.remove_elements(&[0, 1, 2, 33, 34]);
    println!("after small batch: {} cells, depth {}", tree.len(), tree.depth());

    // Removing most of the grid exceeds it and the remaining cells are rebuilt.
    let many: Vec<u32> = (100..1000).collect();
    tree.remove_elements(&many);
    println!("after large batch: {} cells, depth {}", tree.len(), tree.depth());

    let region = Aabb2D::from(Rect::new(0.0, 0.0, 50.0, 50.0));
    let mut inside = tree.elements_in_region(region, false);
    inside.sort_unstable();
    println!("cells inside {:?}: {inside:?}", Rect::from(region));
}
