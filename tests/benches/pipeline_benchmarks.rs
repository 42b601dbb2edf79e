//! Criterion benchmarks over the verification pipeline.
//!
//! Run with `cargo bench -p dv-tests`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dv_01_normalizer::{Normalizer, PayloadNormalizer};
use dv_02_merkle::DistributionTree;
use dv_03_analytics::{DistributionAnalytics, DistributionAnalyzer};
use dv_04_verifier::VerificationService;
use dv_tests::fixtures;
use shared_types::LeafFormat;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for size in [100u64, 1_000, 10_000] {
        let payload = fixtures::random_record_sequence(size, 42);
        let normalizer = Normalizer::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| normalizer.normalize(black_box(payload)).unwrap());
        });
    }
    group.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");
    let entries = fixtures::entries(1_000);
    for format in LeafFormat::DETECTION_ORDER {
        group.bench_with_input(
            BenchmarkId::from_parameter(format),
            &entries,
            |b, entries| {
                b.iter(|| DistributionTree::build(black_box(entries), format).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let analyzer = DistributionAnalyzer::new();
    for size in [100u64, 1_000, 10_000] {
        let entries = fixtures::entries(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| analyzer.analyze(black_box(entries)));
        });
    }
    group.finish();
}

fn bench_full_verification(c: &mut Criterion) {
    let entries = fixtures::entries(1_000);
    let root = DistributionTree::build(&entries, LeafFormat::Packed)
        .unwrap()
        .root_hex();
    let service = VerificationService::new();
    c.bench_function("verify_1000_entries", |b| {
        b.iter(|| {
            service
                .verify(black_box(&entries), &root, Some(LeafFormat::Packed))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_tree_build,
    bench_analyze,
    bench_full_verification
);
criterion_main!(benches);
