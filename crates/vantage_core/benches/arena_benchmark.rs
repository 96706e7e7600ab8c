//! # Record Arena Benchmark
//!
//! Measures the three operations every tick performs on a persistent
//! category: merge by key, sort by distance, evict stale records.
//!
//! Target: a 64-record pass well under 10µs.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vantage_core::{Keyed, RecordArena};

#[derive(Clone)]
struct Record {
    token: i32,
    distance: f32,
    stale: bool,
}

impl Keyed for Record {
    type Key = i32;

    fn key(&self) -> i32 {
        self.token
    }
}

fn populated(count: i32) -> RecordArena<Record> {
    let mut arena = RecordArena::with_capacity(count as usize);
    for token in 0..count {
        arena.insert(Record {
            token,
            distance: ((token * 7919) % 1000) as f32,
            stale: false,
        });
    }
    arena
}

/// Benchmark merging a full tick of observations into an existing arena
fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_upsert");

    for count in [16, 64, 256] {
        let mut arena = populated(count);
        group.bench_with_input(BenchmarkId::new("all_updated", count), &count, |b, &count| {
            b.iter(|| {
                for token in 0..count {
                    arena.upsert(
                        black_box(token),
                        |r| r.distance += 1.0,
                        || Record { token, distance: 0.0, stale: false },
                    );
                }
            });
        });
    }

    group.finish();
}

/// Benchmark the post-pass: sort then evict a quarter of the records
fn bench_sort_and_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_post_pass");

    for count in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("sort_evict", count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut arena = populated(count);
                    for record in arena.iter_mut() {
                        record.stale = record.token % 4 == 0;
                    }
                    arena
                },
                |mut arena| {
                    arena.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                    black_box(arena.retain(|r| !r.stale))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_upsert, bench_sort_and_evict);
criterion_main!(benches);
