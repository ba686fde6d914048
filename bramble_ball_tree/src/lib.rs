// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Ball Tree: a bounding-ball hierarchy for moving entities.
//!
//! The tree is a broad-phase spatial index over a large population of
//! point-like entities in 2-D or 3-D space, built for workloads where most
//! entities move a little on most frames: simulations, games, agent-based
//! models. It answers range queries ("which entries lie within this
//! region?") and stays correct across frequent position updates without
//! global rebuilds.
//!
//! - Every node is a ball (center + radius), and the tree always has four
//!   levels: Root → branches → leaves → entries. Branch and leaf balls
//!   enclose everything below them, so [`BallTree::scan`] prunes whole
//!   subtrees with two overlap tests.
//! - Mutations are cheap and deferred. [`BallTree::insert`] and
//!   out-of-leaf [`BallTree::set_ball`] calls queue work;
//!   [`BallTree::integrate`] and [`BallTree::recompute`] drain it in bulk.
//!   A typical frame applies its updates, runs both drains, then issues
//!   queries.
//! - Storage is a slot-recycling arena ([`bramble_arena::FreeList`]);
//!   handles are stable arena indices and removal never invalidates other
//!   entries' handles.
//!
//! The dimension is a type parameter: [`BallTree2D`] works over
//! [`glam::DVec2`] discs and [`BallTree3D`] over [`glam::DVec3`] spheres,
//! through the small [`Vector`] trait.
//!
//! # Example
//!
//! ```
//! use bramble_ball_tree::{Ball, BallTree2D};
//! use glam::DVec2;
//!
//! let mut tree = BallTree2D::new(DVec2::ZERO, 100.0, 20.0, 1.0);
//! let a = tree.insert(1, Ball::new(DVec2::new(5.0, 5.0), 1.0));
//! let _b = tree.insert(2, Ball::new(DVec2::new(6.0, 5.0), 1.0));
//!
//! // Attachment is deferred until the maintenance drains run.
//! tree.integrate();
//! tree.recompute();
//!
//! let mut hits = Vec::new();
//! tree.scan(Ball::new(DVec2::new(5.0, 5.0), 3.0), &mut hits);
//! assert_eq!(hits.len(), 2);
//!
//! // Small moves are purely local; large ones re-bucket on the next drain.
//! tree.set_ball(a, Ball::new(DVec2::new(500.0, 500.0), 1.0));
//! tree.integrate();
//! tree.recompute();
//!
//! hits.clear();
//! tree.scan(Ball::new(DVec2::new(500.0, 500.0), 2.0), &mut hits);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, 1);
//! ```
//!
//! Not in scope: collision response, raycasting, nearest-neighbour
//! queries, persistence, and thread safety (a single owner drives the
//! tree). The tree does not promise an optimal shape, only correct range
//! queries; maintenance is local and amortised.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod geom;
pub mod node;
pub mod tree;

pub use geom::{Ball, Ball2, Ball3, Vector};
pub use node::NodeIndex;
pub use tree::{BallTree, BallTree2D, BallTree3D, ScanHit, WalkLevel};
