//! Throughput Benchmark for kvproxy
//!
//! Measures the RESP codec on the paths every request takes: encoding the
//! command, parsing the reply and projecting it to JSON.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvproxy::protocol::{parse_message, RespValue};

/// Benchmark command encoding
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    let small: Vec<String> = ["SET", "user:101", "alice"].iter().map(|s| s.to_string()).collect();
    group.bench_function("encode_small", |b| {
        b.iter(|| black_box(RespValue::command(&small).serialize()));
    });

    let large: Vec<String> = vec!["SET".to_string(), "blob".to_string(), "x".repeat(64 * 1024)];
    group.bench_function("encode_large", |b| {
        b.iter(|| black_box(RespValue::command(&large).serialize()));
    });

    group.finish();
}

/// Benchmark reply parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_simple", |b| {
        b.iter(|| black_box(parse_message(b"+PONG\r\n").unwrap()));
    });

    let bulk = RespValue::bulk_string(Bytes::from("x".repeat(1024))).serialize();
    group.bench_function("parse_bulk_1k", |b| {
        b.iter(|| black_box(parse_message(&bulk).unwrap()));
    });

    let array = RespValue::array(
        (0..1000)
            .map(|i| RespValue::bulk_string(Bytes::from(format!("key:{}", i))))
            .collect(),
    )
    .serialize();
    group.bench_function("parse_array_1000", |b| {
        b.iter(|| black_box(parse_message(&array).unwrap()));
    });

    group.finish();
}

/// Benchmark JSON projection of replies
fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    group.throughput(Throughput::Elements(1));

    let reply = RespValue::array(vec![
        RespValue::bulk_string(Bytes::from("0")),
        RespValue::array(
            (0..100)
                .map(|i| RespValue::bulk_string(Bytes::from(format!("key:{}", i))))
                .collect(),
        ),
    ]);
    group.bench_function("scan_page", |b| {
        b.iter(|| black_box(serde_json::to_vec(&reply).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_parse, bench_json);

criterion_main!(benches);
