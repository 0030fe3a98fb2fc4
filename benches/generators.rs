//! Benchmarks for the generator families
//!
//! Run with: cargo bench --bench generators
//!
//! The sampling group compares the permutation and rejection strategies at the same
//! output size by varying the range width.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use intvec::rng::{Pcg32, SeedableRng};
use intvec::{
    corner_cases_by_bounds, range_generate, wildcard_expand, wildcard_parse, SamplingConfig,
    UniqueRandomSamples,
};
use std::hint::black_box;

fn bench_linear(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_generate");

    for count in [100i64, 10_000, 1_000_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| range_generate(black_box(0), black_box(count - 1), black_box(1)));
        });
    }

    group.finish();
}

fn bench_corner_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("corner_cases_by_bounds");

    group.bench_function("full_domain", |b| {
        b.iter(|| corner_cases_by_bounds(black_box(i64::MIN), black_box(i64::MAX), 1));
    });
    group.bench_function("small_positive", |b| {
        b.iter(|| corner_cases_by_bounds(black_box(0), black_box(1 << 16), 1));
    });

    group.finish();
}

fn bench_wildcard(c: &mut Criterion) {
    let mut group = c.benchmark_group("wildcard");

    for free_bits in [4u32, 12, 20].iter() {
        let mask = (1i64 << free_bits) - 1;
        group.throughput(Throughput::Elements(1 << free_bits));
        group.bench_with_input(
            BenchmarkId::new("expand", free_bits),
            &mask,
            |b, &mask| {
                b.iter(|| wildcard_expand(black_box(0x5A00_0000), black_box(mask)));
            },
        );
    }

    let pattern = "1x0?".repeat(16);
    group.bench_function("parse_64", |b| {
        b.iter(|| wildcard_parse(black_box(&pattern)));
    });

    group.finish();
}

fn bench_unique_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_samples");
    let amount = 10_000i64;
    group.throughput(Throughput::Elements(amount as u64));

    let unsorted = UniqueRandomSamples::with_config(SamplingConfig::unsorted())
        .expect("preset is valid");
    // width / amount: 2 uses the permutation strategy, 1000 uses rejection
    for density in [2i64, 1000].iter() {
        let max = amount * density - 1;
        group.bench_with_input(
            BenchmarkId::new("unsorted", density),
            &max,
            |b, &max| {
                let mut rng = Pcg32::seed_from_u64(1);
                b.iter(|| unsorted.sample(0, black_box(max), amount, &mut rng));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_linear,
    bench_corner_cases,
    bench_wildcard,
    bench_unique_sampling
);
criterion_main!(benches);
