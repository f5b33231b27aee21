//! Update payload codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecomap_bench::{key, random_value};
use ecomap_codec::{decode_update, encode_remove_range, encode_update, OmapUpdate, UpdateKind};

/// Benchmark encoding insert payloads of increasing size.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for keys in [1u32, 16, 256] {
        let update = OmapUpdate::insert((0..keys).map(|i| (key(i), random_value(64))));
        group.throughput(Throughput::Elements(u64::from(keys)));
        group.bench_with_input(BenchmarkId::new("insert", keys), &update, |b, update| {
            b.iter(|| black_box(encode_update(black_box(update)).unwrap()));
        });
    }

    group.bench_function("remove_range", |b| {
        b.iter(|| {
            black_box(encode_remove_range(black_box("key_000100"), Some("key_000200")).unwrap())
        });
    });

    group.finish();
}

/// Benchmark decoding insert payloads of increasing size.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for keys in [1u32, 16, 256] {
        let update = OmapUpdate::insert((0..keys).map(|i| (key(i), random_value(64))));
        let (kind, payload) = encode_update(&update).unwrap();
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("insert", keys), &payload, |b, payload| {
            b.iter(|| black_box(decode_update(kind, black_box(payload)).unwrap()));
        });
    }

    let (_, payload) = encode_update(&OmapUpdate::remove((0..64).map(key))).unwrap();
    group.bench_function("remove_64", |b| {
        b.iter(|| black_box(decode_update(UpdateKind::Remove, black_box(&payload)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
