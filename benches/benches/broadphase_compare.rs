// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bramble_ball_tree::{Ball, Ball2, BallTree2D};
use bramble_quad_tree::QuadTree;
use glam::DVec2;
use kurbo::Rect;

const WORLD: f64 = 8000.0;
const CENTER: DVec2 = DVec2::new(4000.0, 4000.0);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_positions(n: usize, seed: u64) -> Vec<DVec2> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| DVec2::new(rng.next_f64() * WORLD, rng.next_f64() * WORLD))
        .collect()
}

fn ball_tree_with(
    positions: &[DVec2],
    max_branch: f64,
) -> (BallTree2D, Vec<bramble_ball_tree::NodeIndex>) {
    let mut tree = BallTree2D::new(CENTER, max_branch, max_branch / 5.0, max_branch / 10.0);
    let handles = positions
        .iter()
        .enumerate()
        .map(|(i, &p)| tree.insert(i as u64, Ball::new(p, 1.0)))
        .collect();
    tree.integrate();
    tree.recompute();
    (tree, handles)
}

/// Drifting actors: every moving entity steps toward the world center, then
/// the maintenance queues are drained once per frame.
fn bench_ball_tree_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("ball_tree_churn");
    let actors = 2000usize;
    for &max_branch in &[100.0, 250.0, 500.0, 1000.0] {
        let moving = gen_positions(actors, 0xB011_F00D);
        let still = gen_positions(actors, 0x57A7_1C00);
        group.throughput(Throughput::Elements(actors as u64));

        group.bench_function(format!("actors{actors}_branch{max_branch}"), |b| {
            b.iter_batched(
                || {
                    let all: Vec<DVec2> =
                        moving.iter().chain(still.iter()).copied().collect();
                    let (tree, handles) = ball_tree_with(&all, max_branch);
                    (tree, handles, moving.clone())
                },
                |(mut tree, handles, mut positions)| {
                    for frame in 0..4 {
                        for (i, pos) in positions.iter_mut().enumerate() {
                            let delta = CENTER - *pos;
                            if delta.length() > 1.0 {
                                *pos += delta.normalize();
                            }
                            tree.set_ball(handles[i], Ball::new(*pos, 1.0));
                        }
                        tree.integrate();
                        tree.recompute();
                        black_box(frame);
                    }
                    black_box(tree.is_empty());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_ball_tree_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("ball_tree_scan");
    for &actors in &[100usize, 1000, 5000] {
        let positions = gen_positions(actors, 0x5CA9_0001);
        let (tree, _handles) = ball_tree_with(&positions, 1000.0);
        group.throughput(Throughput::Elements(actors as u64));

        group.bench_function(format!("actors{actors}"), |b| {
            let query = Ball2::new(CENTER, 100.0);
            let mut hits = Vec::new();
            b.iter(|| {
                hits.clear();
                tree.scan(black_box(query), &mut hits);
                black_box(hits.len());
            })
        });
    }
    group.finish();
}

/// The quad tree has no deferred maintenance: a move is a remove and a
/// re-insert at the new rectangle.
fn bench_quad_tree_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("quad_tree_churn");
    for &actors in &[1000usize, 2000, 5000] {
        let positions = gen_positions(actors, 0x9AD7_0002);
        group.throughput(Throughput::Elements(actors as u64));

        group.bench_function(format!("actors{actors}"), |b| {
            b.iter_batched(
                || {
                    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, WORLD, WORLD));
                    let mut rects = Vec::with_capacity(actors);
                    for (i, p) in positions.iter().enumerate() {
                        let rect = Rect::new(p.x, p.y, p.x + 1.0, p.y + 1.0);
                        tree.insert(i as u64, rect);
                        rects.push(rect);
                    }
                    (tree, rects)
                },
                |(mut tree, mut rects)| {
                    for (i, rect) in rects.iter_mut().enumerate() {
                        tree.remove(i as u64, *rect);
                        let toward = DVec2::new(
                            CENTER.x - rect.x0,
                            CENTER.y - rect.y0,
                        );
                        let step = if toward.length() > 0.03 {
                            toward.normalize() * 0.03
                        } else {
                            DVec2::ZERO
                        };
                        *rect = Rect::new(
                            rect.x0 + step.x,
                            rect.y0 + step.y,
                            rect.x1 + step.x,
                            rect.y1 + step.y,
                        );
                        tree.insert(i as u64, *rect);
                    }
                    black_box(rects.len());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_quad_tree_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("quad_tree_scan");
    for &actors in &[1000usize, 2000, 5000] {
        let positions = gen_positions(actors, 0x5CA9_0003);
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, WORLD, WORLD));
        for (i, p) in positions.iter().enumerate() {
            tree.insert(i as u64, Rect::new(p.x, p.y, p.x + 1.0, p.y + 1.0));
        }
        group.throughput(Throughput::Elements(actors as u64));

        group.bench_function(format!("actors{actors}"), |b| {
            let query = Rect::new(
                CENTER.x - 50.0,
                CENTER.y - 50.0,
                CENTER.x + 50.0,
                CENTER.y + 50.0,
            );
            let mut hits = Vec::new();
            b.iter(|| {
                hits.clear();
                tree.scan(black_box(query), &mut hits);
                black_box(hits.len());
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ball_tree_churn,
    bench_ball_tree_scan,
    bench_quad_tree_churn,
    bench_quad_tree_scan
);
criterion_main!(benches);
