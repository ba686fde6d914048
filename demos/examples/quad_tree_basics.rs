// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quad tree basics.
//!
//! Insert rectangles until a cell splits, query a window, then empty the
//! tree and collapse the subdivision again.
//!
//! Run:
//! - `cargo run -p bramble_demos --example quad_tree_basics`

use bramble_quad_tree::QuadTree;
use kurbo::Rect;

fn main() {
    let mut tree = QuadTree::with_config(Rect::new(0.0, 0.0, 400.0, 400.0), 4, 6);

    let rects: Vec<(u64, Rect)> = (0..12)
        .map(|i| {
            let x = 10.0 + (i % 4) as f64 * 95.0;
            let y = 10.0 + (i / 4) as f64 * 120.0;
            (i as u64, Rect::new(x, y, x + 20.0, y + 20.0))
        })
        .collect();
    for &(id, rect) in &rects {
        tree.insert(id, rect);
    }

    let mut cells = 0;
    tree.walk(|_, _, _| cells += 1);
    println!("leaf cells after inserts: {cells}");

    let mut hits = Vec::new();
    tree.scan(Rect::new(0.0, 0.0, 120.0, 120.0), &mut hits);
    let mut ids: Vec<u64> = hits.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    println!("ids overlapping the top-left window: {ids:?}");

    for &(id, rect) in &rects {
        tree.remove(id, rect);
    }
    tree.clean_up();

    cells = 0;
    tree.walk(|_, _, _| cells += 1);
    println!("leaf cells after removing everything: {cells}");
}
