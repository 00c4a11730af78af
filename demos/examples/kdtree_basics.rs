// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! KD-tree basics.
//!
//! Partition a few widgets, move one, remove one, and hit-test with Kurbo types.
//! Set `RUST_LOG=understory_partition=trace` to see builds and rebuild fallbacks.
//!
//! Run:
//! - `cargo run -p understory_demos --example kdtree_basics`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_partition::{Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, KdTree};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Widget {
    Toolbar,
    Canvas,
    Palette,
    Tooltip,
}

fn element(widget: Widget, rect: Rect) -> BoundingBoxElement<Widget, f64> {
    BoundingBoxElement::new(widget, Aabb2D::from(rect))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut tree = KdTree::new();
    tree.add_or_update_elements(&[
        element(Widget::Toolbar, Rect::new(0.0, 0.0, 800.0, 40.0)),
        element(Widget::Canvas, Rect::new(0.0, 40.0, 600.0, 600.0)),
        element(Widget::Palette, Rect::new(600.0, 40.0, 800.0, 600.0)),
        // Kurbo rectangles may be given with flipped corners.
        element(Widget::Tooltip, Rect::new(250.0, 80.0, 100.0, 20.0)),
    ]);
    tracing::info!(len = tree.len(), depth = tree.depth(), "partitioned widgets");

    let cursor = Point::new(120.0, 30.0);
    let mut hits = tree.elements_at_position(cursor.x, cursor.y);
    hits.sort_by_key(|w| *w as u8);
    println!("under {cursor:?}: {hits:?}");
    assert_eq!(hits, [Widget::Toolbar, Widget::Tooltip]);

    // The tooltip follows the cursor into the canvas.
    tree.add_or_update_elements(&[element(
        Widget::Tooltip,
        Rect::new(300.0, 300.0, 450.0, 360.0),
    )]);
    let hits = tree.elements_at_position(cursor.x, cursor.y);
    println!("after move: {hits:?}");
    assert_eq!(hits, [Widget::Toolbar]);

    // Everything fully inside the left half of the window.
    let left = Aabb2D::from(Rect::new(0.0, 0.0, 600.0, 600.0));
    let inside = tree.elements_in_region(left, false);
    println!("inside {left:?}: {inside:?}");

    tree.remove_elements(&[Widget::Tooltip]);
    assert!(!tree.is_element_partitioned(&Widget::Tooltip));
    if let Some(b) = tree.bounding_box(&Widget::Palette) {
        println!("palette: {:?}", Rect::from(b));
    }
}
