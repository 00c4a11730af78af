// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena: slots, parent/child links, and plain KD insertion.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::types::{Aabb2D, Axis, BoundingBoxElement, le};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// One partitioned element.
///
/// Left descendants have `edge(axis) <= value()`, right descendants have
/// `edge(axis) >= value()`. Equality on the right only appears after deletions
/// promote a replacement; insertion and build keep the right side strict.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, T> {
    pub(crate) key: K,
    pub(crate) bbox: Aabb2D<T>,
    pub(crate) axis: Axis,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K: Copy, T: Copy + PartialOrd> Node<K, T> {
    fn leaf(element: BoundingBoxElement<K, T>, axis: Axis) -> Self {
        Self {
            key: *element.key(),
            bbox: *element.bounding_box(),
            axis,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Splitting value of this node.
    #[inline]
    pub(crate) fn value(&self) -> T {
        self.bbox.edge(self.axis)
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn element(&self) -> BoundingBoxElement<K, T> {
        BoundingBoxElement::new(self.key, self.bbox)
    }
}

/// Slot arena owning every node of one tree.
pub(crate) struct Arena<K, T> {
    nodes: Vec<Option<Node<K, T>>>,
    free_list: Vec<usize>,
    live: usize,
    root: Option<NodeId>,
}

impl<K, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            root: None,
        }
    }
}

impl<K, T> Debug for Arena<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("slots", &self.nodes.len())
            .field("live", &self.live)
            .field("free_list", &self.free_list.len())
            .field("has_root", &self.root.is_some())
            .finish()
    }
}

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Copy + PartialOrd + Debug,
{
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Discard every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.live = 0;
        self.root = None;
    }

    pub(crate) fn reserve(&mut self, n: usize) {
        self.nodes.reserve(n);
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<K, T> {
        self.nodes[id.get()]
            .as_ref()
            .expect("kd-tree node id refers to a released slot")
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, T> {
        self.nodes[id.get()]
            .as_mut()
            .expect("kd-tree node id refers to a released slot")
    }

    /// Store a detached leaf and return its id.
    pub(crate) fn alloc(&mut self, element: BoundingBoxElement<K, T>, axis: Axis) -> NodeId {
        let node = Node::leaf(element, axis);
        self.live += 1;
        if let Some(i) = self.free_list.pop() {
            self.nodes[i] = Some(node);
            NodeId::new(i)
        } else {
            self.nodes.push(Some(node));
            NodeId::new(self.nodes.len() - 1)
        }
    }

    /// Link `child` under `parent` on `side`, or make it the root when `parent` is `None`.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, side: Side, child: NodeId) {
        match parent {
            None => self.root = Some(child),
            Some(p) => {
                let pn = self.get_mut(p);
                match side {
                    Side::Left => pn.left = Some(child),
                    Side::Right => pn.right = Some(child),
                }
            }
        }
        self.get_mut(child).parent = parent;
    }

    /// Unlink a leaf from its parent and release its slot.
    pub(crate) fn detach_leaf(&mut self, id: NodeId) -> Node<K, T> {
        let parent = {
            let n = self.get(id);
            assert!(n.is_leaf(), "only leaves can be detached, {id:?} has children");
            n.parent
        };
        match parent {
            None => self.root = None,
            Some(p) => {
                let pn = self.get_mut(p);
                if pn.left == Some(id) {
                    pn.left = None;
                } else if pn.right == Some(id) {
                    pn.right = None;
                } else {
                    panic!("kd-tree parent link of {id:?} does not point back to it");
                }
            }
        }
        self.release(id)
    }

    fn release(&mut self, id: NodeId) -> Node<K, T> {
        let node = self.nodes[id.get()]
            .take()
            .expect("kd-tree node released twice");
        self.free_list.push(id.get());
        self.live -= 1;
        node
    }

    /// Plain KD insertion: walk down comparing on each node's axis (ties go left)
    /// and hang a new leaf at the first empty slot. No rebalancing.
    pub(crate) fn insert(&mut self, element: BoundingBoxElement<K, T>) -> NodeId {
        let Some(mut current) = self.root else {
            let id = self.alloc(element, Axis::FIRST);
            self.attach(None, Side::Left, id);
            return id;
        };
        loop {
            let n = self.get(current);
            let side = if le(element.bounding_box().edge(n.axis), n.value()) {
                Side::Left
            } else {
                Side::Right
            };
            match n.child(side) {
                Some(next) => current = next,
                None => {
                    let axis = n.axis.next();
                    let id = self.alloc(element, axis);
                    self.attach(Some(current), side, id);
                    return id;
                }
            }
        }
    }

    /// Number of levels (0 for an empty tree).
    pub(crate) fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack: SmallVec<[(NodeId, usize); 32]> = SmallVec::new();
        stack.push((root, 1));
        while let Some((id, d)) = stack.pop() {
            deepest = deepest.max(d);
            let n = self.get(id);
            if let Some(l) = n.left {
                stack.push((l, d + 1));
            }
            if let Some(r) = n.right {
                stack.push((r, d + 1));
            }
        }
        deepest
    }
}
