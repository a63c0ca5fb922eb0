//! Benchmarks for the WAL record codec and engine operations

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use strata::compute::CommandId;
use strata::wal::LogRecord;
use strata::InMemoryEngine;

fn record_codec_benchmarks(c: &mut Criterion) {
    let record = LogRecord::new(
        42,
        7,
        CommandId::Set,
        vec!["user:1234".to_string(), "a-typical-value-payload".to_string()],
    );
    let encoded = record.encode_to_vec().unwrap();

    c.bench_function("record_encode", |b| {
        b.iter(|| black_box(&record).encode_to_vec().unwrap())
    });

    c.bench_function("record_decode", |b| {
        b.iter(|| {
            let mut buf = encoded.as_slice();
            LogRecord::decode(black_box(&mut buf)).unwrap()
        })
    });
}

fn engine_benchmarks(c: &mut Criterion) {
    let engine = InMemoryEngine::with_partitions(16).unwrap();
    let keys: Vec<String> = (0..10_000).map(|i| format!("key-{i}")).collect();
    for key in &keys {
        engine.set(key, "value");
    }

    c.bench_function("engine_set", |b| {
        let mut i = 0usize;
        b.iter(|| {
            engine.set(&keys[i % keys.len()], "value");
            i += 1;
        })
    });

    c.bench_function("engine_get", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let value = engine.get(&keys[i % keys.len()]).unwrap();
            i += 1;
            black_box(value)
        })
    });
}

criterion_group!(benches, record_codec_benchmarks, engine_benchmarks);
criterion_main!(benches);
