//! Packet codec benchmarks.
//!
//! Every request and response passes through the codec once, so this is the
//! per-exchange CPU cost of a walk.

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use snmp_walker::{BerCodec, Codec, Oid, Packet, PduType, Value, VarBind, Version};
use std::hint::black_box;

fn get_next_request() -> Packet {
    Packet::request(
        Version::V2c,
        Bytes::from_static(b"public"),
        PduType::GetNextRequest,
        42,
        &[Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2])],
    )
}

/// A GETBULK reply with `rows` ifTable-like bindings.
fn bulk_response(rows: u32) -> Packet {
    let varbinds = (1..=rows)
        .map(|i| {
            VarBind::new(
                Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2, i]),
                Value::OctetString(Bytes::from(format!("GigabitEthernet0/{}", i))),
            )
        })
        .collect();
    Packet::response(Version::V2c, Bytes::from_static(b"public"), 42, varbinds)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_encode");

    let request = get_next_request();
    group.bench_function("get_next_request", |b| {
        b.iter(|| black_box(BerCodec.encode(black_box(&request)).unwrap()))
    });

    for rows in [10u32, 50] {
        let response = bulk_response(rows);
        group.throughput(Throughput::Elements(u64::from(rows)));
        group.bench_with_input(BenchmarkId::new("bulk_response", rows), &response, |b, p| {
            b.iter(|| black_box(BerCodec.encode(p).unwrap()))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decode");

    let request = BerCodec.encode(&get_next_request()).unwrap();
    group.bench_function("get_next_request", |b| {
        b.iter(|| black_box(BerCodec.decode(request.clone()).unwrap()))
    });

    for rows in [10u32, 50] {
        let data = BerCodec.encode(&bulk_response(rows)).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("bulk_response", rows), &data, |b, data| {
            b.iter(|| black_box(BerCodec.decode(data.clone()).unwrap()))
        });
    }

    group.finish();
}

fn bench_oid_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("oid_parse");

    for (name, s) in [
        ("short", "1.3.6.1"),
        ("column", "1.3.6.1.2.1.2.2.1.2"),
        ("leading_dot", ".1.3.6.1.4.1.9.9.42.1.2.3.4.5.6.7.8.9.10"),
    ] {
        group.bench_with_input(BenchmarkId::new("parse", name), s, |b, s| {
            b.iter(|| black_box(Oid::parse(s).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_oid_parse);
criterion_main!(benches);
