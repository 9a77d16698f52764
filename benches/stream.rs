//! Benchmarks for CowStream read/write throughput.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use cowstream::{CowStream, SharedPool};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const SOURCE_LEN: usize = 1024 * 1024;

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 255) as u8).collect()
}

fn benchmark_read_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_through");

    for page_size in [512usize, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            page_size,
            |b, &page_size| {
                let data = patterned(SOURCE_LEN);
                let mut buf = vec![0u8; 8192];
                b.iter(|| {
                    let mut src = Cursor::new(data.clone());
                    let mut stream = CowStream::with_page_size(&mut src, page_size).unwrap();
                    loop {
                        let n = stream.read(black_box(&mut buf)).unwrap();
                        if n == 0 {
                            break;
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_write_read_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_read_back");

    for page_size in [512usize, 4096].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            page_size,
            |b, &page_size| {
                let data = patterned(SOURCE_LEN);
                let chunk = vec![0xABu8; 8192];
                let mut buf = vec![0u8; 8192];
                let pool = Arc::new(SharedPool::new());
                b.iter(|| {
                    let mut src = Cursor::new(data.clone());
                    let mut stream =
                        CowStream::with_pool(&mut src, page_size, Arc::clone(&pool))
                            .unwrap();
                    for _ in 0..(SOURCE_LEN / chunk.len()) {
                        stream.write_all(black_box(&chunk)).unwrap();
                    }
                    stream.seek(SeekFrom::Start(0)).unwrap();
                    loop {
                        let n = stream.read(&mut buf).unwrap();
                        if n == 0 {
                            break;
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_page");

    // One-byte writes, each touching a fresh page: isolates the CoW fill.
    for page_size in [512usize, 4096].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            page_size,
            |b, &page_size| {
                let data = patterned(SOURCE_LEN);
                let pages = SOURCE_LEN / page_size;
                let pool = Arc::new(SharedPool::new());
                b.iter(|| {
                    let mut src = Cursor::new(data.clone());
                    let mut stream =
                        CowStream::with_pool(&mut src, page_size, Arc::clone(&pool))
                            .unwrap();
                    for page in 0..pages {
                        stream
                            .seek(SeekFrom::Start((page * page_size) as u64))
                            .unwrap();
                        stream.write_all(black_box(&[0xFF])).unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_read_through,
    benchmark_write_read_back,
    benchmark_materialization
);
criterion_main!(benches);
