// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounding-ball tree: structure, deferred maintenance, queries.

use alloc::vec::Vec;

use bramble_arena::{FreeList, WorkQueue};
use glam::{DVec2, DVec3};

use crate::geom::{Ball, Vector};
use crate::node::{Node, NodeFlags, NodeIndex};

/// The root always lives in slot 0 and is never erased.
const ROOT: NodeIndex = NodeIndex(0);

/// An entry reported by [`BallTree::scan`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanHit<V> {
    /// Client identifier supplied at insert.
    pub id: u64,
    /// The entry's current ball.
    pub ball: Ball<V>,
}

/// Level of a node reported to [`BallTree::walk`] visitors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkLevel {
    /// Direct child of the root; encloses leaves.
    Branch,
    /// Child of a branch; encloses entries.
    Leaf,
    /// A client entry.
    Entry,
}

impl WalkLevel {
    /// Depth below the root: branches 0, leaves 1, entries 2.
    pub const fn depth(self) -> u32 {
        match self {
            Self::Branch => 0,
            Self::Leaf => 1,
            Self::Entry => 2,
        }
    }
}

/// Result of scanning one sibling chain for a home for a ball.
struct ChainSearch {
    /// First child whose ball already contains the probe.
    contains: Option<NodeIndex>,
    /// Child with the smallest overlap slack, when none contains.
    nearest: Option<NodeIndex>,
    /// Overlap slack of `nearest`: `dist(centers) + r_probe - r_child`.
    /// Negative when the child encloses the probe's center region.
    nearest_slack: f64,
}

/// A bounding-ball hierarchy over moving entities.
///
/// The tree has exactly four levels: a fixed root, branches under it,
/// leaves under branches, and client entries under leaves. Branch and leaf
/// balls enclose everything below them, so a range query can prune whole
/// subtrees with two ball-overlap tests before it ever touches an entry.
///
/// Mutations are cheap and deferred: [`BallTree::insert`] and out-of-leaf
/// [`BallTree::set_ball`] calls queue the entry for integration, and child
/// churn queues enclosers for recompute. Call [`BallTree::integrate`] and
/// then [`BallTree::recompute`] once per batch of updates, before issuing
/// queries.
///
/// Enclosers are sized by two policies that never fight each other:
/// integration grows balls (up to the configured caps, plus a little
/// `gravy` slack so the next neighbour is likely to fit without another
/// grow), and recompute only ever tightens them or deletes them when
/// emptied.
#[derive(Clone)]
pub struct BallTree<V> {
    nodes: FreeList<Node<V>>,
    integrate_queue: WorkQueue<NodeIndex>,
    recompute_queue: WorkQueue<NodeIndex>,
    max_branch_size: f64,
    max_leaf_size: f64,
    gravy: f64,
}

/// The tree over 2-D balls (discs).
pub type BallTree2D = BallTree<DVec2>;
/// The tree over 3-D balls (spheres).
pub type BallTree3D = BallTree<DVec3>;

impl<V: Vector> BallTree<V> {
    /// Create an empty tree.
    ///
    /// `center` anchors the root (whose ball is unbounded and never
    /// changes). `max_branch_size` and `max_leaf_size` cap how far a branch
    /// or leaf may grow to adopt an entry; `gravy` is the slack added
    /// whenever an encloser is created or grown, and must be non-negative.
    pub fn new(center: V, max_branch_size: f64, max_leaf_size: f64, gravy: f64) -> Self {
        debug_assert!(gravy >= 0.0, "gravy must be non-negative");
        debug_assert!(
            max_branch_size > 0.0 && max_leaf_size > 0.0,
            "size caps must be positive"
        );
        let mut nodes = FreeList::new();
        nodes.insert(Node::root(center));
        Self {
            nodes,
            integrate_queue: WorkQueue::new(),
            recompute_queue: WorkQueue::new(),
            max_branch_size,
            max_leaf_size,
            gravy,
        }
    }

    /// Create an entry carrying `id` at `ball` and queue it for
    /// integration.
    ///
    /// The entry is not attached to the tree, and not visible to
    /// [`BallTree::scan`], until the next [`BallTree::integrate`] drain.
    /// The returned handle stays valid until [`BallTree::remove`].
    pub fn insert(&mut self, id: u64, ball: Ball<V>) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.insert(Node::entry(id, ball)));
        self.queue_integrate(index);
        index
    }

    /// Remove an entry. Its handle is invalid afterwards.
    ///
    /// The entry's old leaf is queued for recompute; an entry that was
    /// still waiting for its first integration is simply dropped from the
    /// queue.
    pub fn remove(&mut self, entry: NodeIndex) {
        let node = *self.nodes.get(entry.raw());
        if node.flags.contains(NodeFlags::QUEUED_INTEGRATE) {
            self.integrate_queue.remove(&entry);
        }
        if node.parent.is_some() {
            self.remove_child(node.parent, entry);
        }
        self.nodes.erase(entry.raw());
    }

    /// Reposition an entry.
    ///
    /// While the new ball still fits inside the entry's leaf the change is
    /// purely local. Otherwise the entry is detached, queued for
    /// re-integration, and the old leaf is queued for recompute.
    pub fn set_ball(&mut self, entry: NodeIndex, ball: Ball<V>) {
        self.nodes.get_mut(entry.raw()).ball = ball;

        let parent = self.nodes.get(entry.raw()).parent;
        if parent.is_none() {
            // Still waiting for integration; the drain will pick up the
            // new ball.
            return;
        }
        if self.nodes.get(parent.raw()).ball.contains_ball(&ball) {
            return;
        }

        self.remove_child(parent, entry);
        self.queue_integrate(entry);
    }

    /// Drain the integrate queue, attaching every pending entry.
    pub fn integrate(&mut self) {
        while let Some(entry) = self.integrate_queue.pop() {
            self.integrate_one(entry);
        }
    }

    /// Drain the recompute queue, tightening every queued encloser around
    /// its current children and deleting the ones that emptied out.
    pub fn recompute(&mut self) {
        while let Some(node) = self.recompute_queue.pop() {
            self.recompute_one(node);
        }
    }

    /// Append every entry whose ball strictly overlaps `query` to `out`.
    ///
    /// Sibling chains are push-front, so hits arrive in no particular
    /// order. Entries inserted or displaced since the last
    /// [`BallTree::integrate`] drain are not found; run the drains first.
    pub fn scan(&self, query: Ball<V>, out: &mut Vec<ScanHit<V>>) {
        let mut branch = self.nodes.get(ROOT.raw()).first_child;
        while branch.is_some() {
            let branch_node = self.nodes.get(branch.raw());
            if query.intersects_ball(&branch_node.ball) {
                let mut leaf = branch_node.first_child;
                while leaf.is_some() {
                    let leaf_node = self.nodes.get(leaf.raw());
                    if query.intersects_ball(&leaf_node.ball) {
                        let mut entry = leaf_node.first_child;
                        while entry.is_some() {
                            let entry_node = self.nodes.get(entry.raw());
                            if query.intersects_ball(&entry_node.ball) {
                                out.push(ScanHit {
                                    id: entry_node.id,
                                    ball: entry_node.ball,
                                });
                            }
                            entry = entry_node.next_sibling;
                        }
                    }
                    leaf = leaf_node.next_sibling;
                }
            }
            branch = branch_node.next_sibling;
        }
    }

    /// Visit every branch, leaf, and entry with its ball and level.
    ///
    /// Read-only; intended for inspection and debug rendering.
    pub fn walk(&self, mut visitor: impl FnMut(Ball<V>, WalkLevel)) {
        let mut branch = self.nodes.get(ROOT.raw()).first_child;
        while branch.is_some() {
            let branch_node = self.nodes.get(branch.raw());
            visitor(branch_node.ball, WalkLevel::Branch);
            let mut leaf = branch_node.first_child;
            while leaf.is_some() {
                let leaf_node = self.nodes.get(leaf.raw());
                visitor(leaf_node.ball, WalkLevel::Leaf);
                let mut entry = leaf_node.first_child;
                while entry.is_some() {
                    let entry_node = self.nodes.get(entry.raw());
                    visitor(entry_node.ball, WalkLevel::Entry);
                    entry = entry_node.next_sibling;
                }
                leaf = leaf_node.next_sibling;
            }
            branch = branch_node.next_sibling;
        }
    }

    /// Remove every entry and encloser, keeping allocated capacity.
    ///
    /// Observationally equivalent to removing each entry and draining.
    pub fn clear(&mut self) {
        let center = self.nodes.get(ROOT.raw()).ball.center;
        self.nodes.clear();
        self.integrate_queue.clear();
        self.recompute_queue.clear();
        self.nodes.insert(Node::root(center));
    }

    /// The ball currently stored for `entry`.
    pub fn ball(&self, entry: NodeIndex) -> Ball<V> {
        self.nodes.get(entry.raw()).ball
    }

    /// True if the tree holds no entries, attached or pending.
    pub fn is_empty(&self) -> bool {
        self.nodes.get(ROOT.raw()).first_child.is_none() && self.integrate_queue.is_empty()
    }

    // --- maintenance internals ---

    fn queue_integrate(&mut self, index: NodeIndex) {
        let node = self.nodes.get_mut(index.raw());
        if node.flags.contains(NodeFlags::QUEUED_INTEGRATE) {
            return;
        }
        node.flags.insert(NodeFlags::QUEUED_INTEGRATE);
        self.integrate_queue.push(index);
    }

    fn queue_recompute(&mut self, index: NodeIndex) {
        let node = self.nodes.get_mut(index.raw());
        // The root's ball is fixed; it never recomputes.
        if node
            .flags
            .intersects(NodeFlags::ROOT | NodeFlags::QUEUED_RECOMPUTE)
        {
            return;
        }
        node.flags.insert(NodeFlags::QUEUED_RECOMPUTE);
        self.recompute_queue.push(index);
    }

    /// Splice `child` at the head of `parent`'s sibling chain and queue the
    /// parent for recompute.
    fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let old_head = self.nodes.get(parent.raw()).first_child;
        {
            let node = self.nodes.get_mut(child.raw());
            node.parent = parent;
            node.next_sibling = old_head;
        }
        self.nodes.get_mut(parent.raw()).first_child = child;
        self.queue_recompute(parent);
    }

    /// Unlink `child` from `parent`'s sibling chain and queue the parent
    /// for recompute.
    fn remove_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let child_next = self.nodes.get(child.raw()).next_sibling;
        let head = self.nodes.get(parent.raw()).first_child;
        if head == child {
            self.nodes.get_mut(parent.raw()).first_child = child_next;
        } else {
            let mut cursor = head;
            while cursor.is_some() {
                let next = self.nodes.get(cursor.raw()).next_sibling;
                if next == child {
                    self.nodes.get_mut(cursor.raw()).next_sibling = child_next;
                    break;
                }
                cursor = next;
            }
        }
        {
            let node = self.nodes.get_mut(child.raw());
            node.parent = NodeIndex::NONE;
            node.next_sibling = NodeIndex::NONE;
        }
        self.queue_recompute(parent);
    }

    /// Scan `parent`'s children for the first one whose ball contains
    /// `probe`, also tracking the child with the smallest overlap slack for
    /// the caller's grow decision.
    fn find_contains_or_nearest(&self, parent: NodeIndex, probe: &Ball<V>) -> ChainSearch {
        let mut found = ChainSearch {
            contains: None,
            nearest: None,
            nearest_slack: f64::MAX,
        };
        let mut cursor = self.nodes.get(parent.raw()).first_child;
        while cursor.is_some() {
            let child = self.nodes.get(cursor.raw());
            if child.ball.contains_ball(probe) {
                found.contains = Some(cursor);
                break;
            }
            let slack =
                child.ball.center.distance(probe.center) + probe.radius - child.ball.radius;
            if slack < found.nearest_slack {
                found.nearest = Some(cursor);
                found.nearest_slack = slack;
            }
            cursor = child.next_sibling;
        }
        found
    }

    fn integrate_one(&mut self, entry: NodeIndex) {
        self.nodes
            .get_mut(entry.raw())
            .flags
            .remove(NodeFlags::QUEUED_INTEGRATE);
        let entry_ball = self.nodes.get(entry.raw()).ball;

        // Branch-level placement scores the ball enlarged by one gravy, so
        // a branch adopted here has room for the leaf it will hold.
        let probe = entry_ball.grown(self.gravy);
        let branches = self.find_contains_or_nearest(ROOT, &probe);

        if let Some(branch) = branches.contains {
            // The branch keeps containing everything it contained before,
            // so only the leaf level below it changes.
            self.place_under_branch(branch, entry, entry_ball);
            return;
        }

        if let Some(nearest) = branches.nearest {
            let target = branches.nearest_slack + self.nodes.get(nearest.raw()).ball.radius;
            if target <= self.max_branch_size {
                self.nodes.get_mut(nearest.raw()).ball.radius = target + self.gravy;
                self.place_under_branch(nearest, entry, entry_ball);
                self.queue_recompute(nearest);
                return;
            }
        }

        // Nothing fits: a fresh branch and leaf both start as the entry's
        // ball plus one gravy.
        let ball = entry_ball.grown(self.gravy);
        let branch = NodeIndex::new(self.nodes.insert(Node::encloser(ball)));
        let leaf = NodeIndex::new(self.nodes.insert(Node::encloser(ball)));
        self.add_child(leaf, entry);
        self.add_child(branch, leaf);
        self.add_child(ROOT, branch);
    }

    /// Leaf-level placement under `branch`: attach to a containing leaf,
    /// grow the nearest leaf within the cap, or start a new leaf.
    fn place_under_branch(&mut self, branch: NodeIndex, entry: NodeIndex, entry_ball: Ball<V>) {
        let leaves = self.find_contains_or_nearest(branch, &entry_ball);

        if let Some(leaf) = leaves.contains {
            self.add_child(leaf, entry);
            return;
        }

        if let Some(nearest) = leaves.nearest {
            let target = leaves.nearest_slack + self.nodes.get(nearest.raw()).ball.radius;
            if target <= self.max_leaf_size {
                self.nodes.get_mut(nearest.raw()).ball.radius = target + self.gravy;
                self.add_child(nearest, entry);
                return;
            }
        }

        let leaf = NodeIndex::new(
            self.nodes
                .insert(Node::encloser(entry_ball.grown(self.gravy))),
        );
        self.add_child(branch, leaf);
        self.add_child(leaf, entry);
    }

    fn recompute_one(&mut self, index: NodeIndex) {
        self.nodes
            .get_mut(index.raw())
            .flags
            .remove(NodeFlags::QUEUED_RECOMPUTE);

        let node = *self.nodes.get(index.raw());
        if node.first_child.is_none() {
            // An encloser whose last child departed is deleted outright.
            self.remove_child(node.parent, index);
            self.nodes.erase(index.raw());
            return;
        }

        // Candidate center: the arithmetic mean of the child centers.
        let mut count = 0u32;
        let mut total = V::ZERO;
        let mut cursor = node.first_child;
        while cursor.is_some() {
            let child = self.nodes.get(cursor.raw());
            total = total + child.ball.center;
            count += 1;
            cursor = child.next_sibling;
        }
        let center = total * (1.0 / f64::from(count));

        // Radius needed from the candidate center. The moment that exceeds
        // the current ball, give up: recompute only ever shrinks, and the
        // current ball already contains every child.
        let mut required = 0.0_f64;
        let mut cursor = node.first_child;
        while cursor.is_some() {
            let child = self.nodes.get(cursor.raw());
            let radius = center.distance(child.ball.center) + child.ball.radius;
            if radius > required {
                required = radius;
                if required + self.gravy > node.ball.radius {
                    return;
                }
            }
            cursor = child.next_sibling;
        }

        let node = self.nodes.get_mut(index.raw());
        node.ball.center = center;
        node.ball.radius = required + self.gravy;
    }
}

impl<V: Vector> core::fmt::Debug for BallTree<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BallTree")
            .field("nodes", &self.nodes)
            .field("integrate_queued", &self.integrate_queue.len())
            .field("recompute_queued", &self.recompute_queue.len())
            .field("max_branch_size", &self.max_branch_size)
            .field("max_leaf_size", &self.max_leaf_size)
            .field("gravy", &self.gravy)
            .finish_non_exhaustive()
    }
}
