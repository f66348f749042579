use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use resumable_decompress::{
    adler32, decompress_lzss, decompress_rle, decompress_zlib, Decompress, DecompressReader,
    DeflateDecoder, RleDecoder,
};
use std::hint::black_box;
use std::io::Read;
use std::time::Duration;

const REFERENCE_RAW: &[u8] = include_bytes!("../tests/data/reference.raw");
const REFERENCE_RLE: &[u8] = include_bytes!("../tests/data/reference.rle");
const REFERENCE_LZSS: &[u8] = include_bytes!("../tests/data/reference.lzss");
const REFERENCE_ZLIB: &[u8] = include_bytes!("../tests/data/reference.zlib");
const TEXT_RAW: &[u8] = include_bytes!("../tests/data/text.raw");
const TEXT_ZLIB: &[u8] = include_bytes!("../tests/data/text.zlib");

fn generate_data(size: usize, pattern: &str) -> Vec<u8> {
    match pattern {
        "runs" => (0..size).map(|i| ((i / 37) % 7) as u8).collect(),
        "binary" => (0..size).map(|i| ((i * 17 + 11) % 256) as u8).collect(),
        _ => panic!("Unknown pattern: {}", pattern),
    }
}

/// Pack `data` with ILBM RLE, fill runs only where they pay off
fn pack_rle(data: &[u8]) -> Vec<u8> {
    let mut packed = Vec::new();
    let mut literals = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let byte = data[pos];
        let run = data[pos..]
            .iter()
            .take(128)
            .take_while(|&&b| b == byte)
            .count();
        if run >= 3 || literals.len() == 128 {
            for chunk in literals.chunks(128) {
                packed.push((chunk.len() - 1) as u8);
                packed.extend_from_slice(chunk);
            }
            literals.clear();
        }
        if run >= 3 {
            packed.push((257 - run) as u8);
            packed.push(byte);
            pos += run;
        } else {
            literals.push(byte);
            pos += 1;
        }
    }
    for chunk in literals.chunks(128) {
        packed.push((chunk.len() - 1) as u8);
        packed.extend_from_slice(chunk);
    }
    packed
}

/// zlib stream of stored blocks
fn pack_stored(data: &[u8]) -> Vec<u8> {
    let mut packed = vec![0x78, 0x01];
    let mut blocks = data.chunks(0xFFFF).peekable();
    while let Some(block) = blocks.next() {
        packed.push(u8::from(blocks.peek().is_none()));
        let len = block.len() as u16;
        packed.extend_from_slice(&len.to_le_bytes());
        packed.extend_from_slice(&(!len).to_le_bytes());
        packed.extend_from_slice(block);
    }
    packed.extend_from_slice(&adler32(data).to_be_bytes());
    packed
}

fn reference_vectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_vectors");
    group.throughput(Throughput::Bytes(REFERENCE_RAW.len() as u64));

    group.bench_function("rle", |b| {
        b.iter(|| decompress_rle(black_box(REFERENCE_RLE), REFERENCE_RAW.len()).unwrap())
    });
    group.bench_function("lzss", |b| {
        b.iter(|| decompress_lzss(black_box(REFERENCE_LZSS), REFERENCE_RAW.len()).unwrap())
    });
    group.bench_function("zlib", |b| {
        b.iter(|| decompress_zlib(black_box(REFERENCE_ZLIB), REFERENCE_RAW.len()).unwrap())
    });

    group.finish();
}

fn decompression_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_throughput");
    group.measurement_time(Duration::from_secs(10));

    for size in [1024, 102400, 1048576].iter() {
        let size_label = match *size {
            1024 => "1KB",
            102400 => "100KB",
            1048576 => "1MB",
            _ => "unknown",
        };

        for pattern in ["runs", "binary"].iter() {
            let original = generate_data(*size, pattern);
            let rle = pack_rle(&original);
            let stored = pack_stored(&original);
            group.throughput(Throughput::Bytes(*size as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("rle_{}", pattern), size_label),
                &rle,
                |b, packed| b.iter(|| decompress_rle(black_box(packed), *size).unwrap()),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("zlib_stored_{}", pattern), size_label),
                &stored,
                |b, packed| b.iter(|| decompress_zlib(black_box(packed), *size).unwrap()),
            );
        }
    }

    group.finish();
}

fn chunked_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_decompression");
    group.throughput(Throughput::Bytes(TEXT_RAW.len() as u64));

    // Cost of resuming: the same stream fed through ever smaller output windows
    for chunk_size in [1usize, 64, 4096, 32768].iter() {
        group.bench_with_input(
            BenchmarkId::new("zlib_dynamic", chunk_size),
            chunk_size,
            |b, &chunk_size| {
                let mut decoder = DeflateDecoder::new();
                let mut chunk = vec![0u8; chunk_size];
                b.iter(|| {
                    decoder.reset();
                    let mut input = TEXT_ZLIB;
                    let mut total = 0;
                    while !decoder.is_finished() {
                        decoder.process(&mut chunk, input).unwrap();
                        input = &input[decoder.processed_input_size()..];
                        total += decoder.processed_output_size();
                    }
                    black_box(total)
                })
            },
        );
    }

    group.finish();
}

fn streaming_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_reader");
    let original = generate_data(1048576, "runs");
    let packed = pack_rle(&original);
    group.throughput(Throughput::Bytes(original.len() as u64));

    for buffer_size in [64usize, 0x800, 0x8000].iter() {
        group.bench_with_input(
            BenchmarkId::new("rle", buffer_size),
            buffer_size,
            |b, &buffer_size| {
                b.iter(|| {
                    let mut reader = DecompressReader::with_buffer_size(
                        &packed[..],
                        RleDecoder::new(),
                        buffer_size,
                    );
                    let mut output = Vec::with_capacity(original.len());
                    reader.read_to_end(&mut output).unwrap();
                    black_box(output)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    reference_vectors,
    decompression_throughput,
    chunked_decompression,
    streaming_reader
);
criterion_main!(benches);
