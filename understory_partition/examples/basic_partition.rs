// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Partition: add, update, remove, and query.

use understory_partition::{Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree};

fn main() {
    let mut tree: KdTree<u32, i64> = KdTree::new();
    tree.add_or_update_elements(&[
        BoundingBoxElement::new(1, Aabb2D::new(0, 0, 10, 10)),
        BoundingBoxElement::new(2, Aabb2D::new(5, 5, 15, 15)),
        BoundingBoxElement::new(3, Aabb2D::new(20, 20, 25, 25)),
    ]);

    // Move box 1
    tree.add_or_update_elements(&[BoundingBoxElement::new(1, Aabb2D::new(20, 0, 30, 10))]);
    println!("tree: {tree:?}");

    // Query a point
    let hits = tree.elements_at_position(6, 6);
    println!("hits at (6,6): {hits:?}");

    let region = Aabb2D::new(0, 0, 30, 30);
    println!(
        "overlapping {region:?}: {:?}",
        tree.elements_in_region(region, true)
    );

    tree.remove_elements(&[2]);
    println!("after removing 2: {:?}", tree.elements_at_position(6, 6));
}
