//! Fuzz target driving interleaved append and snapshot operations.
//!
//! # Usage
//!
//! ```bash
//! cd crates/pitwall-atomic
//! cargo fuzz run fuzz_snapshot_cycle
//! ```

#![no_main]

use std::sync::atomic::{AtomicU64, Ordering};

use libfuzzer_sys::fuzz_target;
use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};

struct Counting {
    buffer: SnapshotBuffer,
    applied: AtomicU64,
}

impl Counting {
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

fuzz_target!(|data: &[u8]| {
    let metric = Counting {
        buffer: SnapshotBuffer::new(),
        applied: AtomicU64::new(0),
    };
    let mut appended: u64 = 0;

    for chunk in data.chunks_exact(2) {
        if chunk[0] % 4 == 0 {
            let produced = metric.buffer.snapshot(&metric);
            assert_eq!(produced, appended);
            assert_eq!(metric.buffer.pending_len(), 0);
            assert!(!metric.buffer.generation().is_buffered());
        } else {
            metric.record(f64::from(chunk[1]));
            appended += 1;
        }
    }

    assert_eq!(metric.buffer.generation().sequence(), appended);
    assert_eq!(metric.buffer.snapshot(&metric), appended);
});
