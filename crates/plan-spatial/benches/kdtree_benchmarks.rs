//! Benchmarks for the KD-tree against a linear scan.
//!
//! Run with: cargo bench -p plan-spatial
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p plan-spatial -- --save-baseline main
//! 2. After changes: cargo bench -p plan-spatial -- --baseline main

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use plan_spatial::{KdTree, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Point Generation
// =============================================================================

/// Uniform random points in `[0, 100)^dim` from a fixed seed.
fn random_points(count: usize, dim: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new((0..dim).map(|_| rng.gen_range(0.0..100.0)).collect()))
        .collect()
}

fn linear_nearest<'a>(points: &'a [Point], query: &Point) -> &'a Point {
    points
        .iter()
        .min_by(|a, b| {
            a.distance_squared(query)
                .total_cmp(&b.distance_squared(query))
        })
        .unwrap()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build");

    for &count in &[1_000usize, 10_000, 100_000] {
        let points = random_points(count, 3, 7);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("batch", count), &points, |b, points| {
            b.iter(|| KdTree::build(black_box(points.clone())).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("insert", count), &points, |b, points| {
            b.iter(|| {
                let mut tree = KdTree::new(3).unwrap();
                for p in points {
                    tree.insert(black_box(p.clone())).unwrap();
                }
                tree
            });
        });
    }

    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("Nearest");
    let queries = random_points(256, 3, 99);
    group.throughput(Throughput::Elements(queries.len() as u64));

    for &count in &[1_000usize, 10_000, 100_000] {
        let points = random_points(count, 3, 7);
        let tree = KdTree::build(points.clone()).unwrap();

        group.bench_with_input(BenchmarkId::new("kdtree", count), &tree, |b, tree| {
            b.iter(|| {
                for q in &queries {
                    black_box(tree.nearest(q).unwrap());
                }
            });
        });

        // The linear scan is only run on the smaller sets
        if count <= 10_000 {
            group.bench_with_input(BenchmarkId::new("linear", count), &points, |b, points| {
                b.iter(|| {
                    for q in &queries {
                        black_box(linear_nearest(points, q));
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_range_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("RangeQueries");
    let points = random_points(50_000, 3, 7);
    let tree = KdTree::build(points).unwrap();
    let query = Point::from([50.0, 50.0, 50.0]);

    for &k in &[1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("k_nearest", k), &k, |b, &k| {
            b.iter(|| tree.k_nearest(black_box(&query), k).unwrap());
        });
    }

    for &radius in &[1.0_f64, 5.0, 10.0] {
        group.bench_with_input(
            BenchmarkId::new("within_radius", radius as u32),
            &radius,
            |b, &radius| {
                b.iter(|| tree.within_radius(black_box(&query), radius).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_nearest, bench_range_queries);
criterion_main!(benches);
