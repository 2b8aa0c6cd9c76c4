//! Framer throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_codec::{crc16, decode_frame, Framer, TelemetryRecord};

fn bench_encode(c: &mut Criterion) {
    let mut framer = Framer::with_capacity(256);
    let channels = [0i16, 32767, -32768, 205, -205, 12000, -12000, 1];

    c.bench_function("encode_8ch_frame", |b| {
        let mut ts = 0u64;
        b.iter(|| {
            ts += 10;
            let record = TelemetryRecord::new(ts, &channels);
            black_box(framer.encode(black_box(&record)).map(|f| f.len()))
        })
    });
}

fn bench_crc(c: &mut Criterion) {
    let payload = b"1234567,0,32767,-32768,205,-205,12000,-12000,1";
    c.bench_function("crc16_payload", |b| b.iter(|| crc16(black_box(payload))));
}

fn bench_decode(c: &mut Criterion) {
    let mut framer = Framer::with_capacity(256);
    let frame = framer
        .encode(&TelemetryRecord::new(1_000, &[1, 2, 3, 4, 5, 6, 7, 8]))
        .map(|f| f.to_vec())
        .unwrap_or_default();

    c.bench_function("decode_8ch_frame", |b| b.iter(|| decode_frame(black_box(&frame))));
}

criterion_group!(benches, bench_encode, bench_crc, bench_decode);
criterion_main!(benches);
