// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node record shared by every role in the tree.

use bitflags::bitflags;

use crate::geom::Ball;

/// Index of a node in the tree's arena.
///
/// This is the handle type returned by [`BallTree::insert`]; it stays
/// stable until [`BallTree::remove`] is called for the entry, after which
/// any further use of it is a caller error (the slot may be reused).
///
/// [`BallTree::insert`]: crate::BallTree::insert
/// [`BallTree::remove`]: crate::BallTree::remove
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    /// Sentinel for the absence of a node.
    pub(crate) const NONE: Self = Self(u32::MAX);

    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    pub(crate) const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

bitflags! {
    /// Role and queue-membership bits for a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct NodeFlags: u8 {
        /// The node is the tree root.
        const ROOT = 1;
        /// The node is waiting in the integrate queue.
        const QUEUED_INTEGRATE = 1 << 1;
        /// The node is waiting in the recompute queue.
        const QUEUED_RECOMPUTE = 1 << 2;
    }
}

/// One fixed layout for root, branch, leaf, and entry nodes alike.
///
/// Nodes reference each other by arena index: `first_child` heads a
/// singly-linked sibling chain threaded through `next_sibling`, so
/// attaching and detaching at the head are O(1).
#[derive(Copy, Clone, Debug)]
pub(crate) struct Node<V> {
    /// Client identifier. Meaningful on entries only; zero elsewhere.
    pub id: u64,
    pub ball: Ball<V>,
    pub parent: NodeIndex,
    pub first_child: NodeIndex,
    pub next_sibling: NodeIndex,
    pub flags: NodeFlags,
}

impl<V> Node<V> {
    /// The root node: fixed center, unbounded radius, never enqueued.
    pub fn root(center: V) -> Self {
        Self {
            id: 0,
            ball: Ball {
                center,
                radius: f64::INFINITY,
            },
            parent: NodeIndex::NONE,
            first_child: NodeIndex::NONE,
            next_sibling: NodeIndex::NONE,
            flags: NodeFlags::ROOT,
        }
    }

    /// A freshly inserted entry, not yet attached anywhere.
    pub fn entry(id: u64, ball: Ball<V>) -> Self {
        Self {
            id,
            ball,
            parent: NodeIndex::NONE,
            first_child: NodeIndex::NONE,
            next_sibling: NodeIndex::NONE,
            flags: NodeFlags::empty(),
        }
    }

    /// A new branch or leaf enclosing `ball`.
    pub fn encloser(ball: Ball<V>) -> Self {
        Self {
            id: 0,
            ball,
            parent: NodeIndex::NONE,
            first_child: NodeIndex::NONE,
            next_sibling: NodeIndex::NONE,
            flags: NodeFlags::empty(),
        }
    }
}
