// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bramble_ball_tree::{Ball, Ball2, BallTree2D};
use glam::DVec2;
use rstar::primitives::GeomWithData;
use rstar::RTree;

type RStarPoint = GeomWithData<[f64; 2], u64>;

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

fn gen_positions(n: usize) -> Vec<DVec2> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..n)
        .map(|_| DVec2::new(rng.next_f64() * 8000.0, rng.next_f64() * 8000.0))
        .collect()
}

fn bench_rstar_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_external_compare");
    for &n in &[1000usize, 5000] {
        let positions = gen_positions(n);
        let center = DVec2::new(4000.0, 4000.0);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("ball_tree_build_query_n{n}"), |b| {
            b.iter_batched(
                || positions.clone(),
                |positions| {
                    let mut tree = BallTree2D::new(center, 1000.0, 100.0, 10.0);
                    for (i, &p) in positions.iter().enumerate() {
                        let _ = tree.insert(i as u64, Ball::new(p, 1.0));
                    }
                    tree.integrate();
                    tree.recompute();
                    let mut hits = Vec::new();
                    tree.scan(Ball2::new(center, 100.0), &mut hits);
                    black_box(hits.len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || {
                    positions
                        .iter()
                        .enumerate()
                        .map(|(i, p)| RStarPoint::new([p.x, p.y], i as u64))
                        .collect::<Vec<_>>()
                },
                |points| {
                    let tree = RTree::bulk_load(points);
                    let hits: usize = tree
                        .locate_within_distance([center.x, center.y], 100.0 * 100.0)
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_external_compare);
criterion_main!(benches);
