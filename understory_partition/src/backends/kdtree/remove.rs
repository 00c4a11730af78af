// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Budgeted incremental removal.
//!
//! Deleting an inner node promotes a replacement from its subtree: the minimum on
//! the node's axis from the right subtree, or the maximum from the left subtree when
//! there is no right child. The replacement's slot is then deleted the same way
//! until a leaf is unlinked. Every node visited while searching counts against a
//! budget; once it is exhausted the caller rebuilds instead.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::node::{Arena, NodeId};
use super::walk::Continuation;
use crate::config::PartitionConfig;
use crate::registry::KeyLookup;
use crate::types::{Axis, lt};

/// Result of [`Arena::remove_keys`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RemoveOutcome {
    /// Every matching node was removed incrementally (possibly none matched).
    Removed,
    /// The batch covered the whole tree, which is now empty.
    Cleared,
    /// The budget ran out. Some matching nodes may already be gone; the rest are
    /// still in the tree and the caller must rebuild without them.
    RebuildNeeded,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

enum Search {
    Found(NodeId),
    NotFound,
    OverBudget,
}

/// Running count of nodes touched by one removal batch.
struct Budget {
    affected: usize,
    limit: usize,
}

impl Budget {
    /// Count one more node; false once the limit is exceeded.
    #[inline]
    fn charge(&mut self) -> bool {
        self.affected += 1;
        self.affected <= self.limit
    }
}

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Remove every node whose key is in `keys`, touching at most
    /// `threshold * len()` nodes.
    pub(crate) fn remove_keys(&mut self, keys: &KeyLookup<'_, K>, threshold: f64) -> RemoveOutcome {
        let total = self.len();
        // A linear scan beats keeping a key -> node map up to date on every insert.
        let mut pending: HashMap<K, NodeId> = HashMap::new();
        self.walk(|id, node| {
            if keys.contains(&node.key) {
                pending.insert(node.key, id);
            }
            Continuation::ContinueAll
        });

        if pending.is_empty() {
            return RemoveOutcome::Removed;
        }
        if pending.len() == total {
            self.clear();
            return RemoveOutcome::Cleared;
        }
        let mut budget = Budget {
            affected: 0,
            limit: PartitionConfig::budget(threshold, total),
        };
        if pending.len() > budget.limit {
            tracing::debug!(
                matched = pending.len(),
                limit = budget.limit,
                "kd-tree removal batch over budget"
            );
            return RemoveOutcome::RebuildNeeded;
        }

        let targets: Vec<K> = pending.keys().copied().collect();
        for key in targets {
            let Some(id) = pending.remove(&key) else {
                continue;
            };
            if !self.delete_node(id, &mut pending, &mut budget) {
                tracing::debug!(
                    affected = budget.affected,
                    limit = budget.limit,
                    "kd-tree removal ran out of budget"
                );
                return RemoveOutcome::RebuildNeeded;
            }
        }
        RemoveOutcome::Removed
    }

    /// Delete the element held by `id`. Keys still waiting in `pending` are
    /// re-pointed when their data moves up into another slot.
    fn delete_node(
        &mut self,
        id: NodeId,
        pending: &mut HashMap<K, NodeId>,
        budget: &mut Budget,
    ) -> bool {
        let mut current = id;
        loop {
            if !budget.charge() {
                return false;
            }
            let (axis, left, right) = {
                let n = self.get(current);
                (n.axis, n.left, n.right)
            };
            let search = match (left, right) {
                (None, None) => {
                    self.detach_leaf(current);
                    return true;
                }
                (_, Some(r)) => self.find_extreme(r, axis, Extreme::Min, budget),
                (Some(l), None) => self.find_extreme(l, axis, Extreme::Max, budget),
            };
            let replacement = match search {
                Search::Found(r) => r,
                Search::OverBudget => return false,
                Search::NotFound => panic!(
                    "kd-tree invariant violated: inner node {current:?} has no replacement"
                ),
            };

            let (key, bbox) = {
                let r = self.get(replacement);
                (r.key, r.bbox)
            };
            let n = self.get_mut(current);
            n.key = key;
            n.bbox = bbox;
            if let Some(slot) = pending.get_mut(&key) {
                *slot = current;
            }
            current = replacement;
        }
    }

    /// Find the node with the smallest (or largest) `edge(axis)` under `start`.
    ///
    /// Only one child needs searching below nodes that split on `axis` itself.
    fn find_extreme(
        &self,
        start: NodeId,
        axis: Axis,
        extreme: Extreme,
        budget: &mut Budget,
    ) -> Search {
        let mut best: Option<(NodeId, T)> = None;
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(start);
        while let Some(id) = stack.pop() {
            if !budget.charge() {
                return Search::OverBudget;
            }
            let n = self.get(id);
            let v = n.bbox.edge(axis);
            let better = match (best, extreme) {
                (None, _) => true,
                (Some((_, b)), Extreme::Min) => lt(v, b),
                (Some((_, b)), Extreme::Max) => lt(b, v),
            };
            if better {
                best = Some((id, v));
            }
            if n.axis == axis {
                let next = match extreme {
                    Extreme::Min => n.left,
                    Extreme::Max => n.right,
                };
                stack.extend(next);
            } else {
                stack.extend(n.right);
                stack.extend(n.left);
            }
        }
        match best {
            Some((id, _)) => Search::Found(id),
            None => Search::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Aabb2D, BoundingBoxElement};
    use alloc::vec;

    /// Budget factor large enough that these small trees never fall back.
    const GENEROUS: f64 = 100.0;

    fn square(key: u32, x: i64, y: i64) -> BoundingBoxElement<u32, i64> {
        BoundingBoxElement::new(key, Aabb2D::<i64>::from_xywh(x, y, 4, 4))
    }

    fn grid(n: u32) -> Arena<u32, i64> {
        let mut elements: Vec<_> = (0..n * n)
            .map(|i| square(i, i64::from(i % n) * 10, i64::from(i / n) * 10))
            .collect();
        let mut a = Arena::default();
        a.build(&mut elements);
        a
    }

    fn keys(a: &Arena<u32, i64>) -> Vec<u32> {
        let mut out = Vec::new();
        a.walk(|_, n| {
            out.push(n.key);
            Continuation::ContinueAll
        });
        out.sort_unstable();
        out
    }

    #[test]
    fn removes_root_and_inner_nodes() {
        let mut a = grid(8);
        let root_key = a.get(a.root().unwrap()).key;
        let mut leaves = Vec::new();
        a.walk(|_, n| {
            if n.is_leaf() && leaves.len() < 3 {
                leaves.push(n.key);
            }
            Continuation::ContinueAll
        });
        let batch = [root_key, leaves[0], leaves[1], leaves[2]];
        let outcome = a.remove_keys(&KeyLookup::new(&batch, 20), GENEROUS);
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(a.len(), 60);
        let left = keys(&a);
        for k in batch {
            assert!(!left.contains(&k));
        }
    }

    #[test]
    fn removing_everything_clears() {
        let mut a = grid(3);
        let all: Vec<u32> = (0..9).collect();
        assert_eq!(
            a.remove_keys(&KeyLookup::new(&all, 20), 0.8),
            RemoveOutcome::Cleared
        );
        assert!(a.is_empty());
        assert_eq!(a.root(), None);
    }

    #[test]
    fn large_batch_asks_for_rebuild() {
        let mut a = grid(10);
        let most: Vec<u32> = (0..90).collect();
        assert_eq!(
            a.remove_keys(&KeyLookup::new(&most, 20), 0.8),
            RemoveOutcome::RebuildNeeded
        );
        assert_eq!(a.len(), 100, "over-budget batch is rejected before touching the tree");
    }

    #[test]
    fn tight_budget_stops_midway() {
        let mut a = grid(10);
        let root_key = a.get(a.root().unwrap()).key;
        // One matched node fits the count check, but promoting a replacement for
        // the root visits more nodes than 1% of the tree.
        let outcome = a.remove_keys(&KeyLookup::new(&[root_key], 20), 0.01);
        assert_eq!(outcome, RemoveOutcome::RebuildNeeded);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut a = grid(4);
        let outcome = a.remove_keys(&KeyLookup::new(&[1000, 2000], 20), 0.8);
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn left_only_node_promotes_maximum() {
        // Chain that only grows to the left on the root axis.
        let mut a: Arena<u32, i64> = Arena::default();
        for (k, x) in [(0, 100), (1, 50), (2, 70), (3, 20)] {
            a.insert(square(k, x, 0));
        }
        let outcome = a.remove_keys(&KeyLookup::new(&[0], 20), GENEROUS);
        assert_eq!(outcome, RemoveOutcome::Removed);
        let root = a.get(a.root().unwrap());
        assert_eq!(root.key, 2, "largest min_x in the left subtree replaces the root");
        assert_eq!(keys(&a), vec![1, 2, 3]);
    }

    #[test]
    fn chained_removals_follow_moved_data() {
        // Remove a node together with the node that will be promoted into its slot.
        let mut a: Arena<u32, i64> = Arena::default();
        for (k, x) in [(0, 50), (1, 80), (2, 60), (3, 90)] {
            a.insert(square(k, x, 0));
        }
        let outcome = a.remove_keys(&KeyLookup::new(&[0, 2], 20), GENEROUS);
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(keys(&a), vec![1, 3]);
    }
}
