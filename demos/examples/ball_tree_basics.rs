// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ball tree basics.
//!
//! Insert a handful of entities, drain the maintenance queues, move one
//! entity far away, and query both neighbourhoods.
//!
//! Run:
//! - `cargo run -p bramble_demos --example ball_tree_basics`

use bramble_ball_tree::{Ball, BallTree2D, WalkLevel};
use glam::DVec2;

fn main() {
    let mut tree = BallTree2D::new(DVec2::ZERO, 100.0, 20.0, 1.0);

    let a = tree.insert(1, Ball::new(DVec2::new(5.0, 5.0), 1.0));
    let _b = tree.insert(2, Ball::new(DVec2::new(5.0, 6.0), 1.0));
    let _c = tree.insert(3, Ball::new(DVec2::new(6.0, 5.0), 1.0));

    // Inserts are queued; nothing is attached until the drains run.
    tree.integrate();
    tree.recompute();

    let mut hits = Vec::new();
    tree.scan(Ball::new(DVec2::new(5.0, 5.0), 3.0), &mut hits);
    println!("entities near (5, 5): {:?}", hits.iter().map(|h| h.id).collect::<Vec<_>>());

    // A large move detaches the entry; the next drain re-buckets it.
    tree.set_ball(a, Ball::new(DVec2::new(500.0, 500.0), 1.0));
    tree.integrate();
    tree.recompute();

    hits.clear();
    tree.scan(Ball::new(DVec2::new(500.0, 500.0), 2.0), &mut hits);
    println!("entities near (500, 500): {:?}", hits.iter().map(|h| h.id).collect::<Vec<_>>());

    // Walk the hierarchy for a quick structural picture.
    let mut counts = [0usize; 3];
    tree.walk(|_, level| match level {
        WalkLevel::Branch => counts[0] += 1,
        WalkLevel::Leaf => counts[1] += 1,
        WalkLevel::Entry => counts[2] += 1,
    });
    println!(
        "{} branches, {} leaves, {} entries",
        counts[0], counts[1], counts[2]
    );
}
