//! Performance benchmarks for the snapshot buffer.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

/// Count-only metric used to drive complete snapshot cycles.
struct Counting {
    buffer: SnapshotBuffer,
    applied: AtomicU64,
}

impl Counting {
    fn new() -> Self {
        Self {
            buffer: SnapshotBuffer::new(),
            applied: AtomicU64::new(0),
        }
    }

    fn record(&self, value: f64) {
        if self.buffer.append(value) == AppendMode::Direct {
            self.applied.fetch_add(1, Ordering::Release);
        }
    }
}

impl SnapshotSource for Counting {
    type Snapshot = u64;

    fn is_quiescent(&self, baseline_sequence: u64) -> bool {
        self.applied.load(Ordering::Acquire) == baseline_sequence
    }

    fn produce(&self) -> u64 {
        self.applied.load(Ordering::Acquire)
    }

    fn replay(&self, _value: f64) {
        self.applied.fetch_add(1, Ordering::Release);
    }
}

fn bench_append(c: &mut Criterion) {
    let buffer = SnapshotBuffer::new();

    c.bench_function("append_direct", |b| {
        b.iter(|| buffer.append(black_box(1.5)));
    });

    c.bench_function("append_and_apply", |b| {
        let metric = Counting::new();
        b.iter(|| metric.record(black_box(1.5)));
    });
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("snapshot_idle", |b| {
        let metric = Counting::new();
        b.iter(|| metric.buffer.snapshot(&metric));
    });

    let mut group = c.benchmark_group("snapshot_after_appends");
    let sizes: [u64; 3] = [100, 1_000, 10_000];
    for &size in &sizes {
        group.bench_with_input(
            BenchmarkId::new("direct_appends", size),
            &size,
            |b: &mut criterion::Bencher, &size| {
                let metric = Counting::new();
                b.iter(|| {
                    for _ in 0..size {
                        metric.record(1.0);
                    }
                    metric.buffer.snapshot(&metric)
                });
            },
        );
    }
    group.finish();
}

fn bench_concurrent_writers(c: &mut Criterion) {
    let metric = std::sync::Arc::new(Counting::new());

    c.bench_function("record_while_snapshotting", |b| {
        let writer_metric = std::sync::Arc::clone(&metric);
        b.iter(|| {
            writer_metric.record(black_box(2.5));
            writer_metric.buffer.snapshot(&*writer_metric)
        });
    });
}

criterion_group!(
    benches,
    bench_append,
    bench_snapshot,
    bench_concurrent_writers,
);

criterion_main!(benches);
