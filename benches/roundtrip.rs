use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lzstr::{decode::Decoder, encode::Encoder, Alphabet};

pub fn criterion_benchmark(c: &mut Criterion, name: &str, text: &str) {
    let data: Vec<u16> = text.encode_utf16().collect();
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(data.len() as u64));

    for alphabet in Alphabet::ALL {
        let id = BenchmarkId::new("encode", alphabet);
        group.bench_with_input(id, &data, |b, data| {
            let encoder = Encoder::new(alphabet);
            b.iter(|| black_box(encoder.encode(data)))
        });

        let compressed = Encoder::new(alphabet).encode(&data);
        let id = BenchmarkId::new("decode", alphabet);
        group.bench_with_input(id, &compressed, |b, compressed| {
            let decoder = Decoder::new(alphabet);
            b.iter(|| black_box(decoder.decode(compressed).expect("Error")))
        });
    }
}

pub fn bench_toml(c: &mut Criterion) {
    criterion_benchmark(c, "toml", include_str!("../Cargo.toml"));
}

pub fn bench_source(c: &mut Criterion) {
    criterion_benchmark(c, "source", include_str!("../src/decode.rs"));
}

pub fn bench_repetitive(c: &mut Criterion) {
    criterion_benchmark(c, "repetitive", &"AAAAAAAAAAAAAAAA".repeat(4096));
}

criterion_group!(benches, bench_toml, bench_source, bench_repetitive);
criterion_main!(benches);
