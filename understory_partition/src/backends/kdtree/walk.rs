// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared iterative traversal. Flattening, removal scans and queries all run on it.

use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

use super::node::{Arena, Node, NodeId};

/// What the walker does after visiting a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    ContinueAll,
    ContinueLeftOnly,
    ContinueRightOnly,
    ContinueNoChild,
    Stop,
}

impl Continuation {
    /// Map "can this side be skipped" flags to a continuation.
    #[inline]
    pub(crate) fn pruning(skip_left: bool, skip_right: bool) -> Self {
        match (skip_left, skip_right) {
            (false, false) => Self::ContinueAll,
            (true, false) => Self::ContinueRightOnly,
            (false, true) => Self::ContinueLeftOnly,
            (true, true) => Self::ContinueNoChild,
        }
    }
}

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    /// Depth-first pre-order walk from the root, left before right.
    pub(crate) fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &Node<K, T>) -> Continuation,
    {
        let Some(root) = self.root() else {
            return;
        };
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.reserve(depth_estimate(self.len()));
        stack.push(root);
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            let (left, right) = match visit(id, node) {
                Continuation::Stop => return,
                Continuation::ContinueAll => (node.left, node.right),
                Continuation::ContinueLeftOnly => (node.left, None),
                Continuation::ContinueRightOnly => (None, node.right),
                Continuation::ContinueNoChild => (None, None),
            };
            if let Some(r) = right {
                stack.push(r);
            }
            if let Some(l) = left {
                stack.push(l);
            }
        }
    }
}

/// `log2(n) + 1`, the depth of a balanced tree with `n` nodes.
#[inline]
fn depth_estimate(n: usize) -> usize {
    n.checked_ilog2().map_or(0, |l| l as usize + 1)
}
