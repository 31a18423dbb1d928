//! Criterion benchmarks for Sawyer chunk encodings.
//!
//! Each encoding is measured both ways over payloads shaped like track
//! designs: long runs of repeated flag bytes broken by short literals.
//!
//! Run with: cargo bench -p park_save --bench sawyer_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use park_save::sawyer::{decode_chunk, encode_chunk, ChunkEncoding};

fn design_like_payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| match i % 40 {
            0..=23 => 0,
            24..=31 => (i / 40) as u8,
            _ => (i * 7) as u8,
        })
        .collect()
}

const ENCODINGS: [(&str, ChunkEncoding); 3] = [
    ("rle", ChunkEncoding::Rle),
    ("rle_compressed", ChunkEncoding::RleCompressed),
    ("rotate", ChunkEncoding::Rotate),
];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("sawyer_encode");
    for len in [1024, 16 * 1024, 256 * 1024] {
        let payload = design_like_payload(len);
        for (name, encoding) in ENCODINGS {
            group.bench_with_input(BenchmarkId::new(name, len), &payload, |b, data| {
                b.iter(|| black_box(encode_chunk(encoding, data).len()));
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("sawyer_decode");
    for len in [1024, 16 * 1024, 256 * 1024] {
        let payload = design_like_payload(len);
        for (name, encoding) in ENCODINGS {
            let encoded = encode_chunk(encoding, &payload);
            group.bench_with_input(BenchmarkId::new(name, len), &encoded, |b, data| {
                b.iter(|| black_box(decode_chunk(encoding, data).unwrap().len()));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
