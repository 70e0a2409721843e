//! Criterion micro-benchmarks for append, positional insert/erase, and copy.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use stowage::DynArray;
use stowage_bench::{erase_positions, filled, insert_positions};

/// Benchmark: Append 10K values to an empty array (doubling growth).
fn bench_push_back_10k(c: &mut Criterion) {
    c.bench_function("push_back_10k", |b| {
        b.iter(|| {
            let mut array = DynArray::new();
            for i in 0..10_000u64 {
                array.push_back(i);
            }
            black_box(array.len());
        });
    });
}

/// Benchmark: Append 10K values after reserving the exact capacity.
fn bench_push_back_reserved_10k(c: &mut Criterion) {
    c.bench_function("push_back_reserved_10k", |b| {
        b.iter(|| {
            let mut array = DynArray::with_capacity(10_000);
            for i in 0..10_000u64 {
                array.push_back(i);
            }
            black_box(array.len());
        });
    });
}

/// Benchmark: 1K inserts at deterministic positions into a 1K array.
fn bench_insert_random_1k(c: &mut Criterion) {
    let positions = insert_positions(1_000, 1_000, 42);
    c.bench_function("insert_random_1k", |b| {
        b.iter_batched(
            || filled(1_000),
            |mut array| {
                for (i, &at) in positions.iter().enumerate() {
                    array.insert(at, i as u64);
                }
                black_box(array)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Drain a 1K array by erasing at deterministic positions.
fn bench_erase_random_1k(c: &mut Criterion) {
    let positions = erase_positions(1_000, 42);
    c.bench_function("erase_random_1k", |b| {
        b.iter_batched(
            || filled(1_000),
            |mut array| {
                for &at in &positions {
                    array.erase(at);
                }
                black_box(array)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: Clone a 10K array of strings.
fn bench_clone_strings_10k(c: &mut Criterion) {
    let source = DynArray::from_fn(10_000, |i| i.to_string());
    c.bench_function("clone_strings_10k", |b| {
        b.iter(|| black_box(source.clone()));
    });
}

/// Benchmark: clone_from into a target that already has room.
fn bench_clone_from_in_place_10k(c: &mut Criterion) {
    let source = filled(10_000);
    let mut target = DynArray::with_capacity(10_000);
    c.bench_function("clone_from_in_place_10k", |b| {
        b.iter(|| {
            target.clone_from(&source);
            black_box(target.len());
        });
    });
}

criterion_group!(
    benches,
    bench_push_back_10k,
    bench_push_back_reserved_10k,
    bench_insert_random_1k,
    bench_erase_random_1k,
    bench_clone_strings_10k,
    bench_clone_from_in_place_10k
);
criterion_main!(benches);
