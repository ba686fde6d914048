// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Quad Tree: a uniform 4-way space-partitioning index over
//! axis-aligned rectangles.
//!
//! The tree recursively subdivides a fixed root rectangle into four equal
//! cells. Each node is either a leaf holding a bucket of entries or a
//! branch whose four children sit in four contiguous arena slots. A leaf
//! splits when its bucket outgrows the configured capacity (until the
//! maximum depth); [`QuadTree::clean_up`] collapses branches whose
//! children have all emptied out again.
//!
//! An entry is stored in every leaf cell its rectangle overlaps, so
//! [`QuadTree::scan`] reports such an entry once per overlapped cell;
//! callers that need a set deduplicate by id. Neither result order nor
//! multiplicity is part of the contract.
//!
//! This index answers the same kind of range query as
//! [`bramble_ball_tree`](https://docs.rs/bramble_ball_tree) with a
//! different algorithm and different trade-offs: subdivision is uniform
//! and re-insertion (`remove` + `insert`) replaces deferred maintenance.
//! The two indexes are independent; pick one per workload.
//!
//! # Example
//!
//! ```
//! use bramble_quad_tree::QuadTree;
//! use kurbo::Rect;
//!
//! let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 800.0));
//! tree.insert(1, Rect::new(10.0, 10.0, 20.0, 20.0));
//! tree.insert(2, Rect::new(400.0, 400.0, 410.0, 410.0));
//!
//! let mut hits = Vec::new();
//! tree.scan(Rect::new(0.0, 0.0, 100.0, 100.0), &mut hits);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use bramble_arena::FreeList;
use kurbo::Rect;

/// Bucket capacity used by [`QuadTree::new`].
pub const DEFAULT_CAPACITY: usize = 32;
/// Subdivision depth limit used by [`QuadTree::new`].
pub const DEFAULT_MAX_DEPTH: u32 = 12;

/// Sentinel for the absence of a node or entry slot.
const NONE: u32 = u32::MAX;
/// `count` value marking a node as a branch.
const BRANCH: i32 = -1;

/// An entry reported by [`QuadTree::scan`] and [`QuadTree::walk`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadEntry {
    /// Client identifier supplied at insert.
    pub id: u64,
    /// The entry's rectangle.
    pub rect: Rect,
}

/// One stored occurrence of an entry, linked into a leaf bucket.
#[derive(Copy, Clone, Debug)]
struct EntrySlot {
    id: u64,
    rect: Rect,
    next: u32,
}

/// A tree node: a leaf bucket or a branch over four contiguous children.
#[derive(Copy, Clone, Debug)]
struct QuadNode {
    /// For leaves, the head of the bucket chain (or `NONE`); for branches,
    /// the index of the first of the four child nodes.
    first_child: u32,
    /// Number of bucketed entries, or `BRANCH`.
    count: i32,
}

impl QuadNode {
    const EMPTY_LEAF: Self = Self {
        first_child: NONE,
        count: 0,
    };
}

/// A 4-way space-partitioning index for rectangles with client ids.
#[derive(Clone, Debug)]
pub struct QuadTree {
    bounds: Rect,
    capacity: usize,
    max_depth: u32,
    nodes: FreeList<QuadNode>,
    entries: FreeList<EntrySlot>,
}

impl QuadTree {
    /// Create an empty tree over `bounds` with the default capacity and
    /// depth limit.
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    /// Create an empty tree with explicit tuning.
    ///
    /// `capacity` is the bucket size a leaf may reach before it splits;
    /// `max_depth` bounds subdivision (leaves at the limit grow without
    /// splitting).
    pub fn with_config(bounds: Rect, capacity: usize, max_depth: u32) -> Self {
        debug_assert!(capacity > 0, "capacity must be positive");
        let mut nodes = FreeList::new();
        nodes.insert(QuadNode::EMPTY_LEAF);
        Self {
            bounds,
            capacity,
            max_depth,
            nodes,
            entries: FreeList::new(),
        }
    }

    /// The fixed root rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Insert an entry into every leaf cell its rectangle overlaps.
    ///
    /// Rectangles outside the root bounds are silently ignored, as are the
    /// parts of a rectangle hanging over the edge.
    pub fn insert(&mut self, id: u64, rect: Rect) {
        self.insert_rec(id, rect, self.bounds, 0, 0);
    }

    /// Remove the entry with `id` from every leaf cell `rect` overlaps.
    ///
    /// `rect` must be the rectangle the entry was inserted with (or one
    /// covering it); cells it does not reach are not searched.
    pub fn remove(&mut self, id: u64, rect: Rect) {
        self.remove_rec(id, rect, self.bounds, 0);
    }

    /// Append every entry whose rectangle strictly overlaps `rect`.
    ///
    /// An entry stored in several overlapped cells is appended once per
    /// cell; deduplicate by id if a set is needed.
    pub fn scan(&self, rect: Rect, out: &mut Vec<QuadEntry>) {
        self.scan_rec(rect, self.bounds, 0, out);
    }

    /// Collapse branches whose four children are all empty leaves,
    /// returning their slots to the arena.
    ///
    /// One call walks the branches once; deeply nested empty regions
    /// collapse one level per call.
    pub fn clean_up(&mut self) {
        let mut stack: Vec<u32> = Vec::new();
        if self.nodes.get(0).count == BRANCH {
            stack.push(0);
        }

        while let Some(node) = stack.pop() {
            let first = self.nodes.get(node).first_child;

            let mut empty_leaves = 0;
            for offset in 0..4 {
                let child = *self.nodes.get(first + offset);
                if child.count == 0 {
                    empty_leaves += 1;
                } else if child.count == BRANCH {
                    stack.push(first + offset);
                }
            }

            if empty_leaves == 4 {
                // Freed in reverse so the quad can be re-reserved whole.
                self.nodes.erase_quad(first);
                let n = self.nodes.get_mut(node);
                n.first_child = NONE;
                n.count = 0;
            }
        }
    }

    /// Remove every entry and subdivision, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
        self.nodes.insert(QuadNode::EMPTY_LEAF);
    }

    /// Visit every leaf cell with its quadrant index (0–3 within the
    /// parent), its rectangle, and its bucket.
    pub fn walk(&self, mut visitor: impl FnMut(usize, Rect, &[QuadEntry])) {
        self.walk_rec(&mut visitor, 0, self.bounds, 0);
    }

    fn insert_rec(&mut self, id: u64, rect: Rect, cell: Rect, depth: u32, node: u32) {
        if !rects_overlap(&cell, &rect) {
            return;
        }

        let n = *self.nodes.get(node);
        if n.count == BRANCH {
            for quadrant in 0..4 {
                self.insert_rec(
                    id,
                    rect,
                    quadrant_rect(cell, quadrant),
                    depth + 1,
                    n.first_child + quadrant as u32,
                );
            }
            return;
        }

        if n.count as usize + 1 > self.capacity && depth < self.max_depth {
            // Split: hand the bucket and the new entry down to four fresh
            // children, then turn this leaf into a branch.
            let first = self.nodes.insert_quad([QuadNode::EMPTY_LEAF; 4]);
            for quadrant in 0..4 {
                self.insert_rec(
                    id,
                    rect,
                    quadrant_rect(cell, quadrant),
                    depth + 1,
                    first + quadrant as u32,
                );
            }

            let mut cursor = n.first_child;
            while cursor != NONE {
                let slot = *self.entries.get(cursor);
                for quadrant in 0..4 {
                    self.insert_rec(
                        slot.id,
                        slot.rect,
                        quadrant_rect(cell, quadrant),
                        depth + 1,
                        first + quadrant as u32,
                    );
                }
                self.entries.erase(cursor);
                cursor = slot.next;
            }

            let node = self.nodes.get_mut(node);
            node.first_child = first;
            node.count = BRANCH;
        } else {
            let index = self.entries.insert(EntrySlot {
                id,
                rect,
                next: n.first_child,
            });
            let node = self.nodes.get_mut(node);
            node.first_child = index;
            node.count += 1;
        }
    }

    fn remove_rec(&mut self, id: u64, rect: Rect, cell: Rect, node: u32) {
        if !rects_overlap(&cell, &rect) {
            return;
        }

        let n = *self.nodes.get(node);
        if n.count == BRANCH {
            for quadrant in 0..4 {
                self.remove_rec(
                    id,
                    rect,
                    quadrant_rect(cell, quadrant),
                    n.first_child + quadrant as u32,
                );
            }
            return;
        }

        let mut prev = NONE;
        let mut cursor = n.first_child;
        while cursor != NONE {
            let slot = *self.entries.get(cursor);
            if slot.id == id {
                self.entries.erase(cursor);
                let node = self.nodes.get_mut(node);
                node.count -= 1;
                if prev == NONE {
                    node.first_child = slot.next;
                } else {
                    self.entries.get_mut(prev).next = slot.next;
                }
                return;
            }
            prev = cursor;
            cursor = slot.next;
        }
    }

    fn scan_rec(&self, rect: Rect, cell: Rect, node: u32, out: &mut Vec<QuadEntry>) {
        if !rects_overlap(&cell, &rect) {
            return;
        }

        let n = *self.nodes.get(node);
        if n.count == BRANCH {
            for quadrant in 0..4 {
                self.scan_rec(
                    rect,
                    quadrant_rect(cell, quadrant),
                    n.first_child + quadrant as u32,
                    out,
                );
            }
            return;
        }

        let mut cursor = n.first_child;
        while cursor != NONE {
            let slot = self.entries.get(cursor);
            if rects_overlap(&rect, &slot.rect) {
                out.push(QuadEntry {
                    id: slot.id,
                    rect: slot.rect,
                });
            }
            cursor = slot.next;
        }
    }

    fn walk_rec(
        &self,
        visitor: &mut impl FnMut(usize, Rect, &[QuadEntry]),
        quadrant: usize,
        cell: Rect,
        node: u32,
    ) {
        let n = *self.nodes.get(node);
        if n.count == BRANCH {
            for child in 0..4 {
                self.walk_rec(
                    visitor,
                    child,
                    quadrant_rect(cell, child),
                    n.first_child + child as u32,
                );
            }
            return;
        }

        let mut bucket = Vec::new();
        let mut cursor = n.first_child;
        while cursor != NONE {
            let slot = self.entries.get(cursor);
            bucket.push(QuadEntry {
                id: slot.id,
                rect: slot.rect,
            });
            cursor = slot.next;
        }
        visitor(quadrant, cell, &bucket);
    }
}

/// Strict rectangle overlap: shared edges do not count.
fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// The four equal subdivisions of `cell`, in a fixed quadrant order.
fn quadrant_rect(cell: Rect, quadrant: usize) -> Rect {
    let mx = 0.5 * (cell.x0 + cell.x1);
    let my = 0.5 * (cell.y0 + cell.y1);
    match quadrant {
        0 => Rect::new(mx, my, cell.x1, cell.y1),
        1 => Rect::new(cell.x0, my, mx, cell.y1),
        2 => Rect::new(cell.x0, cell.y0, mx, my),
        _ => Rect::new(mx, cell.y0, cell.x1, my),
    }
}
