use criterion::{Criterion, criterion_group, criterion_main};
use geothin::{DistanceMetric, Point2, SearchStrategy, Strategy, ThinParams, find_neighbors, thin};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::hint::black_box;

fn point_cloud(n: usize) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..n)
        .map(|_| {
            Point2::new(
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
            )
        })
        .collect()
}

fn neighbor_strategies(c: &mut Criterion) {
    let points = point_cloud(2000);
    let mut group = c.benchmark_group("find_neighbors");

    for (name, strategy) in [
        ("grid_hash", SearchStrategy::GridHash),
        ("kd_tree", SearchStrategy::KdTree { space_partition: false }),
        ("range_tree", SearchStrategy::RangeTree { space_partition: false }),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| find_neighbors(black_box(&points), 1.0, DistanceMetric::Planar, strategy))
        });
    }

    group.finish();
}

fn full_thin(c: &mut Criterion) {
    let points = point_cloud(2000);
    let mut params = ThinParams::new(1.0);
    params.metric = DistanceMetric::Planar;
    params.strategy = Strategy::GridHash;
    params.trials = 5;
    params.seed = Some(9);

    c.bench_function("thin_grid_hash", |b| {
        b.iter(|| thin(black_box(&points), &params).unwrap())
    });
}

criterion_group!(benches, neighbor_strategies, full_thin);
criterion_main!(benches);
