//! Benchmarks for date encoder operations.

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use date_encoder::{DateEncoder, DateEncoderConfig, ScalarEncoder, ScalarEncoderConfig};

fn encoder() -> DateEncoder {
    DateEncoder::new(
        DateEncoderConfig::default()
            .season(3)
            .day_of_week(1)
            .weekend(3)
            .custom_days(3, ["mon", "wed"])
            .holiday(5)
            .time_of_day(5),
    )
    .unwrap()
}

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 11, 4)
        .unwrap()
        .and_hms_opt(14, 55, 0)
        .unwrap()
}

fn benchmark_construction(c: &mut Criterion) {
    c.bench_function("date_encoder_new", |b| b.iter(encoder));
}

fn benchmark_scalar_encode(c: &mut Criterion) {
    let scalar =
        ScalarEncoder::new(ScalarEncoderConfig::new(21, 0.0, 100.0, 10.0)).unwrap();

    c.bench_function("scalar_encode", |b| {
        b.iter(|| scalar.encode(black_box(42.5)))
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let encoder = encoder();
    let ts = timestamp();

    c.bench_function("date_encode", |b| b.iter(|| encoder.encode(black_box(ts))));
}

fn benchmark_encode_into_array(c: &mut Criterion) {
    let encoder = encoder();
    let ts = timestamp();
    let mut buffer = vec![0u8; encoder.width()];

    c.bench_function("date_encode_into_array", |b| {
        b.iter(|| encoder.encode_into_array(black_box(ts), &mut buffer))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let encoder = encoder();
    let bits = encoder.encode(timestamp());

    c.bench_function("date_decode", |b| {
        b.iter(|| encoder.decode(black_box(bits.data())))
    });
}

fn benchmark_top_down(c: &mut Criterion) {
    let encoder = encoder();
    let bits = encoder.encode(timestamp());

    c.bench_function("date_top_down_compute", |b| {
        b.iter(|| encoder.top_down_compute(black_box(bits.data())))
    });
}

fn benchmark_bucket_round_trip(c: &mut Criterion) {
    let encoder = encoder();
    let ts = timestamp();

    c.bench_function("date_bucket_round_trip", |b| {
        b.iter(|| {
            let buckets = encoder.bucket_indices(black_box(ts));
            encoder.bucket_info(&buckets)
        })
    });
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_scalar_encode,
    benchmark_encode,
    benchmark_encode_into_array,
    benchmark_decode,
    benchmark_top_down,
    benchmark_bucket_round_trip,
);
criterion_main!(benches);
