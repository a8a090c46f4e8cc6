//! Benchmarks for grasp set metrics.
//!
//! Run with: cargo bench -p grasp-metrics

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grasp_metrics::{coverage, coverage_brute_force, similarity, DistanceWeights};
use grasp_types::{GraspPose, GraspSet, UnitQuaternion, Vector3};
use rand::prelude::*;

/// Deterministic random grasp set inside a half-meter cube.
fn random_set(n: usize, seed: u64) -> GraspSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let poses = (0..n)
        .map(|_| {
            GraspPose::new(
                UnitQuaternion::from_euler_angles(
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-3.0..3.0),
                ),
                Vector3::new(
                    rng.gen_range(-0.25..0.25),
                    rng.gen_range(-0.25..0.25),
                    rng.gen_range(-0.25..0.25),
                ),
            )
        })
        .collect();
    let widths = (0..n).map(|_| rng.gen_range(0.0..0.1)).collect();
    GraspSet::try_new(poses, widths, None).expect("arrays are parallel")
}

fn bench_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage");
    let weights = DistanceWeights::new();

    for &n in &[200_usize, 1000, 4000] {
        let candidates = random_set(n, 42);
        let reference = random_set(n / 2, 43);

        group.bench_with_input(BenchmarkId::new("kdtree", n), &n, |b, _| {
            b.iter(|| {
                coverage(
                    black_box(&candidates),
                    black_box(&reference),
                    0.02,
                    &weights,
                )
                .expect("inputs are non-empty")
            });
        });

        group.bench_with_input(BenchmarkId::new("brute_force", n), &n, |b, _| {
            b.iter(|| {
                coverage_brute_force(
                    black_box(&candidates),
                    black_box(&reference),
                    0.02,
                    &weights,
                )
                .expect("inputs are non-empty")
            });
        });
    }

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let weights = DistanceWeights::new();

    for &n in &[200_usize, 1000] {
        let a = random_set(n, 44);
        let b_set = random_set(n, 45);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| {
                similarity(black_box(&a), black_box(&b_set), &weights)
                    .expect("inputs are non-empty")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_coverage, bench_similarity);
criterion_main!(benches);
