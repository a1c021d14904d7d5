//! Benchmarks for ipzone resolution.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Range parsing throughput
//! - Resolution through the numeric index (cache disabled)
//! - Resolution served from the cache
//! - Scalability with different index sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ipzone::{parse_range, Locator, ZoneStore};
use tempfile::TempDir;

/// Build a store holding `count` consecutive /24 ranges starting at 1.0.0.0.
fn seeded_store(count: u32) -> (ZoneStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..count)
        .map(|i| {
            let base = 0x0100_0000u32 + (i << 8);
            let [a, b, c, _] = base.to_be_bytes();
            format!("{}.{}.{}.0/24", a, b, c)
        })
        .collect();
    std::fs::write(dir.path().join("XX.zone"), lines.join("\n")).unwrap();

    let store = ZoneStore::open(dir.path().join("bench.db"), false).unwrap();
    store.import_file(dir.path().join("XX.zone")).unwrap();
    (store, dir)
}

/// Queries spread evenly over the first `count` ranges.
fn generate_queries(count: u32, queries: u32) -> Vec<String> {
    (0..queries)
        .map(|i| {
            let base = 0x0100_0000u32 + ((i * 7919 % count) << 8) + 1;
            let [a, b, c, d] = base.to_be_bytes();
            format!("{}.{}.{}.{}", a, b, c, d)
        })
        .collect()
}

fn bench_parse_range(c: &mut Criterion) {
    let inputs = [
        "192.168.1.0/24",
        "1.0.0.0-1.0.0.255",
        "203.0.113.0/28",
        "8.8.8.0-8.8.8.255",
    ];

    let mut group = c.benchmark_group("parse_range");
    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("mixed", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(parse_range(black_box(input)).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_resolve_no_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_no_cache");

    for size in [100u32, 1_000, 10_000] {
        let (store, _dir) = seeded_store(size);
        let locator = Locator::new(&store, 0);
        let queries = generate_queries(size, 100);

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &queries, |b, queries| {
            b.iter(|| {
                for ip in queries {
                    black_box(locator.resolve(ip).unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_resolve_cached(c: &mut Criterion) {
    let (store, _dir) = seeded_store(10_000);
    let locator = Locator::new(&store, 10_000);
    let queries = generate_queries(10_000, 100);
    for ip in &queries {
        locator.resolve(ip).unwrap();
    }

    let mut group = c.benchmark_group("resolve_cached");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("hit", |b| {
        b.iter(|| {
            for ip in &queries {
                black_box(locator.resolve(ip).unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_range,
    bench_resolve_no_cache,
    bench_resolve_cached
);
criterion_main!(benches);
