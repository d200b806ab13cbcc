use std::io::Write;

use criterion::criterion_main;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use osmap::map::read_map;

const NODES_PER_BLOCK: usize = 8_000;
const WAYS_PER_BLOCK: usize = 500;

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn put_len_field(out: &mut Vec<u8>, fnum: u32, bytes: &[u8]) {
    put_varint(out, ((fnum as u64) << 3) | 2);
    put_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

fn put_varint_field(out: &mut Vec<u8>, fnum: u32, value: u64) {
    put_varint(out, (fnum as u64) << 3);
    put_varint(out, value);
}

fn zigzag(value: i64) -> u64 {
    ((value as u64) << 1) ^ ((value >> 63) as u64)
}

fn packed_deltas(values: impl Iterator<Item = i64>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev = 0i64;
    for v in values {
        put_varint(&mut out, zigzag(v - prev));
        prev = v;
    }
    out
}

/// One OSMData blob shaped like a real extract: a string table, a dense
/// node run, and a batch of tagged ways.
fn primitive_block() -> Vec<u8> {
    let mut table = Vec::new();
    for s in ["", "highway", "residential", "name", "Main Street"] {
        put_len_field(&mut table, 1, s.as_bytes());
    }

    let mut dense = Vec::new();
    let ids = (0..NODES_PER_BLOCK as i64).map(|i| 1_000_000 + i);
    let lats = (0..NODES_PER_BLOCK as i64).map(|i| 408_000_000 + i * 13);
    let lons = (0..NODES_PER_BLOCK as i64).map(|i| -731_000_000 - i * 7);
    put_len_field(&mut dense, 1, &packed_deltas(ids));
    put_len_field(&mut dense, 8, &packed_deltas(lats));
    put_len_field(&mut dense, 9, &packed_deltas(lons));

    let mut group = Vec::new();
    put_len_field(&mut group, 2, &dense);
    for w in 0..WAYS_PER_BLOCK as i64 {
        let mut way = Vec::new();
        put_varint_field(&mut way, 1, (5_000_000 + w) as u64);
        put_len_field(&mut way, 2, &[1, 3]);
        put_len_field(&mut way, 3, &[2, 4]);
        let refs = (0..16).map(|r| 1_000_000 + w * 16 + r);
        put_len_field(&mut way, 8, &packed_deltas(refs));
        put_len_field(&mut group, 3, &way);
    }

    let mut block = Vec::new();
    put_len_field(&mut block, 1, &table);
    put_len_field(&mut block, 2, &group);
    block
}

fn file(compressed: bool) -> Vec<u8> {
    let block = primitive_block();

    let blob = if compressed {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&block).unwrap();
        let deflated = encoder.finish().unwrap();

        let mut blob = Vec::new();
        put_varint_field(&mut blob, 2, block.len() as u64);
        put_len_field(&mut blob, 3, &deflated);
        blob
    } else {
        let mut blob = Vec::new();
        put_len_field(&mut blob, 1, &block);
        blob
    };

    let mut header = Vec::new();
    put_len_field(&mut header, 1, b"OSMData");
    put_varint_field(&mut header, 3, blob.len() as u64);

    let mut out = Vec::new();
    out.extend_from_slice(&(header.len() as u32).to_be_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(&blob);
    out
}

fn decode_benchmark(c: &mut criterion::Criterion) {
    let mut group = c.benchmark_group("decode");
    group.significance_level(0.1).sample_size(30);

    let raw = file(false);
    let zlib = file(true);

    group.bench_function("raw_block", |b| {
        b.iter(|| read_map(raw.as_slice()).expect("raw block decodes"))
    });
    group.bench_function("zlib_block", |b| {
        b.iter(|| read_map(zlib.as_slice()).expect("zlib block decodes"))
    });
    group.finish();
}

criterion::criterion_group!(decode_benches, decode_benchmark);
criterion_main!(decode_benches);
