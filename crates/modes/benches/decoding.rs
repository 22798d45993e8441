use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modes::frame::Frame;
use modes::message;

const DF17_AIRBORNE_POSITION: &str = "8d3c6488583e82d690c8ac7dcea9";
const DF4_ALTITUDE_REPLY: &str = "20000f7bbab761";

fn decode_extended_squitter(c: &mut Criterion) {
    c.bench_function("decode df17 airborne position", |b| {
        b.iter(|| {
            let frame = Frame::from_hex(black_box(DF17_AIRBORNE_POSITION), false).unwrap();
            black_box(message::decode(frame).unwrap());
        });
    });
}

fn decode_altitude_reply(c: &mut Criterion) {
    c.bench_function("decode df4 altitude reply", |b| {
        b.iter(|| {
            let frame = Frame::from_hex(black_box(DF4_ALTITUDE_REPLY), false).unwrap();
            black_box(message::decode(frame).unwrap());
        });
    });
}

criterion_group!(benches, decode_extended_squitter, decode_altitude_reply);
criterion_main!(benches);
