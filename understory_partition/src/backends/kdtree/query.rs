// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region and point queries.
//!
//! A node splitting on `axis` with value `v` has `edge(axis) <= v` on the left and
//! `edge(axis) >= v` on the right. Pruning therefore only skips the left side when
//! the query lies strictly above `v` and the right side when it lies strictly below.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use super::node::Arena;
use super::walk::Continuation;
use crate::types::{Aabb2D, lt};

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    pub(crate) fn region_into(&self, region: Aabb2D<T>, allow_overlap: bool, out: &mut Vec<K>) {
        self.walk(|_, n| {
            let hit = if allow_overlap {
                region.overlaps(&n.bbox)
            } else {
                region.contains_rect(&n.bbox)
            };
            if hit {
                out.push(n.key);
            }

            let v = n.value();
            if allow_overlap {
                // Overlap on a min edge needs `edge <= region max`; on a max edge it
                // needs `edge >= region min`.
                let q = region.edge(n.axis.opposite());
                if n.axis.is_min() {
                    Continuation::pruning(false, lt(q, v))
                } else {
                    Continuation::pruning(lt(v, q), false)
                }
            } else {
                // Containment needs `edge >= region min` on min edges and
                // `edge <= region max` on max edges.
                let q = region.edge(n.axis);
                if n.axis.is_min() {
                    Continuation::pruning(lt(v, q), false)
                } else {
                    Continuation::pruning(false, lt(q, v))
                }
            }
        });
    }

    pub(crate) fn point_into(&self, x: T, y: T, out: &mut Vec<K>) {
        self.walk(|_, n| {
            if n.bbox.contains_point(x, y) {
                out.push(n.key);
            }
            let q = if n.axis.is_x() { x } else { y };
            let v = n.value();
            if n.axis.is_min() {
                Continuation::pruning(false, lt(q, v))
            } else {
                Continuation::pruning(lt(v, q), false)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBoxElement;
    use alloc::vec;

    fn arena() -> Arena<char, i64> {
        let mut elements = vec![
            BoundingBoxElement::new('a', Aabb2D::<i64>::from_xywh(0, 0, 10, 10)),
            BoundingBoxElement::new('b', Aabb2D::<i64>::from_xywh(5, 5, 5, 5)),
            BoundingBoxElement::new('c', Aabb2D::<i64>::from_xywh(20, 20, 5, 5)),
            BoundingBoxElement::new('d', Aabb2D::<i64>::from_xywh(-30, 40, 5, 5)),
            BoundingBoxElement::new('e', Aabb2D::<i64>::from_xywh(12, -8, 30, 4)),
        ];
        let mut a = Arena::default();
        a.build(&mut elements);
        a
    }

    fn sorted(mut v: Vec<char>) -> Vec<char> {
        v.sort_unstable();
        v
    }

    #[test]
    fn containment_excludes_partial_overlap() {
        let a = arena();
        let mut out = Vec::new();
        a.region_into(Aabb2D::new(0, 0, 15, 15), false, &mut out);
        assert_eq!(sorted(out), vec!['a', 'b']);
    }

    #[test]
    fn overlap_includes_touching_edges() {
        let a = arena();
        let mut out = Vec::new();
        a.region_into(Aabb2D::new(10, -4, 20, 20), true, &mut out);
        assert_eq!(sorted(out), vec!['a', 'b', 'c', 'e']);
    }

    #[test]
    fn point_hits_every_covering_box() {
        let a = arena();
        let mut out = Vec::new();
        a.point_into(7, 7, &mut out);
        assert_eq!(sorted(core::mem::take(&mut out)), vec!['a', 'b']);

        a.point_into(-28, 41, &mut out);
        assert_eq!(out, vec!['d']);

        out.clear();
        a.point_into(100, 100, &mut out);
        assert!(out.is_empty());
    }
}
