//! Benchmarks for the flame pipeline.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use flame_core::{acquire, decode, decode_bytes, ImageDescriptor, Orchestrator};
use flame_ffi::{render_gradient, NativeGenerator};

const SIDES: [u32; 3] = [256, 1024, 2048];

/// Decoding a ready buffer, no native calls.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for side in SIDES {
        let desc = ImageDescriptor::new(side, side);
        let Some(bytes) = render_gradient(side, side) else {
            continue;
        };

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode_bytes", side), &bytes, |b, bytes| {
            b.iter(|| decode_bytes(black_box(bytes), &desc))
        });
    }

    group.finish();
}

/// Native allocation and release through the C entry points.
fn bench_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire");

    for side in SIDES {
        let desc = ImageDescriptor::new(side, side);
        group.throughput(Throughput::Elements(desc.pixel_count()));
        group.bench_with_input(BenchmarkId::new("native", side), &desc, |b, desc| {
            b.iter(|| {
                if let Ok(handle) = acquire(&NativeGenerator, black_box(desc)) {
                    handle.release();
                }
            })
        });
    }

    group.finish();
}

/// Acquire, decode and release: everything except persistence.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    for side in SIDES {
        let desc = ImageDescriptor::new(side, side);
        group.throughput(Throughput::Elements(desc.pixel_count()));

        group.bench_with_input(BenchmarkId::new("orchestrator", side), &side, |b, &side| {
            let mut orchestrator = Orchestrator::new(NativeGenerator);
            b.iter(|| orchestrator.generate_and_decode(black_box(side), black_box(side)))
        });

        group.bench_with_input(BenchmarkId::new("manual", side), &desc, |b, desc| {
            b.iter(|| {
                let handle = acquire(&NativeGenerator, desc).ok()?;
                let image = decode(&handle, desc).ok();
                handle.release();
                image
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_acquire, bench_pipeline);
criterion_main!(benches);
