// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Balanced bulk build using quickselect medians.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use super::node::{Arena, NodeId, Side};
use crate::types::{Axis, BoundingBoxElement, le, lt};

/// A subtree still to be built: `elements[start..end]` hangs under `parent`.
struct Pending {
    parent: Option<NodeId>,
    side: Side,
    start: usize,
    end: usize,
    axis: Axis,
}

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Replace the tree with a balanced one over `elements`.
    ///
    /// `elements` is reordered in place. Keys must be unique.
    pub(crate) fn build(&mut self, elements: &mut [BoundingBoxElement<K, T>]) {
        self.clear();
        if elements.is_empty() {
            return;
        }
        self.reserve(elements.len());
        let mut work: Vec<Pending> = Vec::new();
        work.push(Pending {
            parent: None,
            side: Side::Left,
            start: 0,
            end: elements.len(),
            axis: Axis::FIRST,
        });
        while let Some(p) = work.pop() {
            let pivot = p.start + partition_at_median(&mut elements[p.start..p.end], p.axis);
            let id = self.alloc(elements[pivot], p.axis);
            self.attach(p.parent, p.side, id);

            let axis = p.axis.next();
            if pivot + 1 < p.end {
                work.push(Pending {
                    parent: Some(id),
                    side: Side::Right,
                    start: pivot + 1,
                    end: p.end,
                    axis,
                });
            }
            if p.start < pivot {
                work.push(Pending {
                    parent: Some(id),
                    side: Side::Left,
                    start: p.start,
                    end: pivot,
                    axis,
                });
            }
        }
        tracing::trace!(nodes = self.len(), depth = self.depth(), "kd-tree built");
    }
}

/// Partition `span` around its median on `axis` and return the pivot index.
///
/// Everything before the pivot is `<=` the pivot value and everything after it is
/// strictly greater: elements equal to the median are pulled into the run just
/// after it and the pivot is the last element of that run.
fn partition_at_median<K: Copy, T: Copy + PartialOrd>(
    span: &mut [BoundingBoxElement<K, T>],
    axis: Axis,
) -> usize {
    debug_assert!(!span.is_empty(), "cannot partition an empty span");
    let median = span.len() / 2;
    quickselect(span, median, axis);
    let value = span[median].bounding_box().edge(axis);
    let mut last = median;
    for i in median + 1..span.len() {
        // Everything past the median is >= value, so `<=` means equal.
        if le(span[i].bounding_box().edge(axis), value) {
            last += 1;
            span.swap(last, i);
        }
    }
    last
}

/// Iterative quickselect: afterwards `span[k]` holds the k-th smallest value on
/// `axis`, with smaller-or-equal values before it and greater-or-equal after.
fn quickselect<K: Copy, T: Copy + PartialOrd>(
    span: &mut [BoundingBoxElement<K, T>],
    k: usize,
    axis: Axis,
) {
    let mut lo = 0;
    let mut hi = span.len() - 1;
    while lo < hi {
        let (first, last) = partition_three_way(span, lo, hi, axis);
        if k < first {
            hi = first - 1;
        } else if k > last {
            lo = last + 1;
        } else {
            return;
        }
    }
}

/// Three-way partition of `span[lo..=hi]` around its middle element's value.
///
/// Returns the inclusive band `[first, last]` of values equal to the pivot, with
/// smaller values before it and larger values after it. Runs of equal values are
/// settled in one pass.
fn partition_three_way<K: Copy, T: Copy + PartialOrd>(
    span: &mut [BoundingBoxElement<K, T>],
    lo: usize,
    hi: usize,
    axis: Axis,
) -> (usize, usize) {
    let pivot = span[lo + (hi - lo) / 2].bounding_box().edge(axis);
    let mut first = lo;
    let mut i = lo;
    let mut last = hi;
    // The pivot value is always in `span[i..=last]`, so `last` never drops below `lo`.
    while i <= last {
        let v = span[i].bounding_box().edge(axis);
        if lt(v, pivot) {
            span.swap(first, i);
            first += 1;
            i += 1;
        } else if lt(pivot, v) {
            span.swap(i, last);
            last -= 1;
        } else {
            i += 1;
        }
    }
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::super::walk::Continuation;
    use super::*;
    use crate::types::Aabb2D;
    use alloc::vec::Vec;

    fn column(xs: &[i64]) -> Vec<BoundingBoxElement<usize, i64>> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| BoundingBoxElement::new(i, Aabb2D::new(x, x, x + 5, x + 5)))
            .collect()
    }

    fn assert_split(span: &[BoundingBoxElement<usize, i64>], pivot: usize) {
        let v = span[pivot].bounding_box().min_x;
        for e in &span[..pivot] {
            assert!(e.bounding_box().min_x <= v, "left of pivot must be <= pivot");
        }
        for e in &span[pivot + 1..] {
            assert!(e.bounding_box().min_x > v, "right of pivot must be > pivot");
        }
    }

    #[test]
    fn median_of_distinct_values() {
        let mut span = column(&[9, 3, 7, 1, 5, 8, 2]);
        let pivot = partition_at_median(&mut span, Axis::XMin);
        assert_eq!(pivot, 3);
        assert_eq!(span[pivot].bounding_box().min_x, 5);
        assert_split(&span, pivot);
    }

    #[test]
    fn duplicates_of_the_median_end_up_left() {
        let mut span = column(&[4, 4, 1, 4, 9, 4, 0, 4, 7]);
        let pivot = partition_at_median(&mut span, Axis::XMin);
        assert_eq!(span[pivot].bounding_box().min_x, 4);
        assert_eq!(pivot, 6, "pivot is the last of the equal run");
        assert_split(&span, pivot);
    }

    #[test]
    fn all_equal_values() {
        let mut span = column(&[3; 17]);
        let pivot = partition_at_median(&mut span, Axis::XMin);
        assert_eq!(pivot, 16);
        assert_split(&span, pivot);
    }

    #[test]
    fn three_way_partition_bands_equal_values() {
        let mut span = column(&[1, 5, 9, 5, 5, 0, 7, 5]);
        let hi = span.len() - 1;
        let (first, last) = partition_three_way(&mut span, 0, hi, Axis::XMin);
        assert_eq!((first, last), (2, 5));
        assert!(span[..first].iter().all(|e| e.bounding_box().min_x < 5));
        assert!(span[first..=last].iter().all(|e| e.bounding_box().min_x == 5));
        assert!(span[last + 1..].iter().all(|e| e.bounding_box().min_x > 5));

        // One pass settles a span of equal values.
        let mut same = column(&[2; 64]);
        assert_eq!(partition_three_way(&mut same, 0, 63, Axis::XMin), (0, 63));
    }

    #[test]
    fn shared_edge_build_stays_shallow() {
        // Aligned columns: every box has the same top edge.
        let mut elements: Vec<_> = (0..20_000_i64)
            .map(|i| {
                let x = (i * 7919) % 20_000;
                BoundingBoxElement::new(i as usize, Aabb2D::new(x, 0, x + 5, 40))
            })
            .collect();
        let mut arena: Arena<usize, i64> = Arena::default();
        arena.build(&mut elements);
        assert_eq!(arena.len(), 20_000);
        assert!(arena.depth() <= 48, "depth was {}", arena.depth());
    }

    #[test]
    fn identical_boxes_build() {
        let mut elements: Vec<_> = (0..3000)
            .map(|i| BoundingBoxElement::new(i, Aabb2D::new(1_i64, 1, 2, 2)))
            .collect();
        let mut arena: Arena<usize, i64> = Arena::default();
        arena.build(&mut elements);
        assert_eq!(arena.len(), 3000);
        let mut hits = Vec::new();
        arena.point_into(1, 2, &mut hits);
        assert_eq!(hits.len(), 3000);
    }

    #[test]
    fn build_is_balanced_and_keeps_every_key() {
        let xs: Vec<i64> = (0..1023).map(|i| (i * 7919) % 1023).collect();
        let mut elements = column(&xs);
        let mut arena: Arena<usize, i64> = Arena::default();
        arena.build(&mut elements);
        assert_eq!(arena.len(), 1023);
        assert!(arena.depth() <= 12, "depth was {}", arena.depth());

        let mut keys = Vec::new();
        arena.walk(|_, n| {
            keys.push(n.key);
            Continuation::ContinueAll
        });
        keys.sort_unstable();
        assert_eq!(keys, (0..1023).collect::<Vec<_>>());
    }
}
