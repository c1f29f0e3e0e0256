//! Property-based tests for pitwall-atomic using quickcheck.
//!
//! These tests verify invariants of the generation word packing and the
//! append/snapshot partitioning that should hold for all inputs.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use pitwall_atomic::{AppendMode, Generation, GenerationCounter, SnapshotBuffer, SnapshotSource};
use quickcheck_macros::quickcheck;

/// Mask selecting the 63-bit sequence field of a packed generation word.
const SEQUENCE_BITS: u64 = u64::MAX >> 1;

/// Count-only metric harness; `window` values are appended inside
/// `produce`, so they land in the buffered window of that snapshot.
struct Counting {
    buffer: SnapshotBuffer,
    applied: AtomicU64,
    window: Mutex<Vec<f64>>,
}

impl Counting {
    fn with_window(window: Vec<f64>) -> Self {
        Self {
            buffer: SnapshotBuffer::new(),
            applied: AtomicU64::new(0),
            window: Mutex::new(window),
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
        for value in self.window.lock().drain(..) {
            // Buffered while the snapshot is in flight; must not move the
            // applied count before this cycle replays.
            self.record(value);
        }
        self.applied.load(Ordering::Acquire)
    }

    fn replay(&self, _value: f64) {
        self.applied.fetch_add(1, Ordering::Release);
    }
}

#[quickcheck]
fn prop_generation_new_masks_sequence(sequence: u64, buffered: bool) -> bool {
    let generation = Generation::new(sequence, buffered);
    generation.sequence() == (sequence & SEQUENCE_BITS) && generation.is_buffered() == buffered
}

#[quickcheck]
fn prop_generation_from_raw_splits_fields(raw: u64) -> bool {
    let generation = Generation::from_raw(raw);
    generation.sequence() == (raw & SEQUENCE_BITS)
        && generation.is_buffered() == (raw >> 63 == 1)
        && generation.raw() == raw
}

#[quickcheck]
fn prop_increment_advances_sequence_by_one(start: u64, buffered: bool) -> bool {
    // Stay clear of the sequence field's upper edge.
    let start = start & (u64::MAX >> 2);
    let counter = GenerationCounter::with_value(Generation::new(start, buffered));

    let next = counter.increment();
    next.sequence() == start + 1 && next.is_buffered() == buffered
}

#[quickcheck]
fn prop_activate_returns_baseline_and_sets_flag(start: u64) -> bool {
    let start = start & (u64::MAX >> 2);
    let counter = GenerationCounter::with_value(Generation::new(start, false));

    let baseline = counter.activate();
    baseline.sequence() == start && !baseline.is_buffered() && counter.load().is_buffered()
}

#[quickcheck]
fn prop_deactivate_preserves_window_increments(start: u64, window_appends: u8) -> bool {
    let start = start & (u64::MAX >> 2);
    let counter = GenerationCounter::with_value(Generation::new(start, false));

    let baseline = counter.activate();
    for _ in 0..window_appends {
        let generation = counter.increment();
        if !generation.is_buffered() {
            return false;
        }
    }

    let deactivated = counter.deactivate();
    deactivated.sequence() - baseline.sequence() == u64::from(window_appends)
        && !counter.load().is_buffered()
}

#[quickcheck]
fn prop_idle_appends_are_all_direct(values: Vec<f64>) -> bool {
    let buffer = SnapshotBuffer::new();

    for &value in &values {
        if buffer.append(value) != AppendMode::Direct {
            return false;
        }
    }

    buffer.pending_len() == 0 && buffer.generation().sequence() == values.len() as u64
}

#[quickcheck]
fn prop_snapshot_partitions_observations(direct: Vec<f64>, window: Vec<f64>) -> bool {
    let window_len = window.len();
    let source = Counting::with_window(window);

    for &value in &direct {
        source.record(value);
    }

    let produced = source.buffer.snapshot(&source);

    produced == direct.len() as u64
        && source.applied.load(Ordering::Acquire) == (direct.len() + window_len) as u64
        && source.buffer.pending_len() == 0
        && !source.buffer.generation().is_buffered()
}

#[quickcheck]
fn prop_next_snapshot_observes_replayed_window(direct: Vec<f64>, window: Vec<f64>) -> bool {
    let window_len = window.len();
    let source = Counting::with_window(window);

    for &value in &direct {
        source.record(value);
    }

    let first = source.buffer.snapshot(&source);
    let second = source.buffer.snapshot(&source);

    first == direct.len() as u64 && second == (direct.len() + window_len) as u64
}

#[quickcheck]
fn prop_sequence_survives_snapshot_cycles(before: Vec<f64>, after: Vec<f64>) -> bool {
    let source = Counting::with_window(Vec::new());

    for &value in &before {
        source.record(value);
    }
    source.buffer.snapshot(&source);
    for &value in &after {
        source.record(value);
    }

    source.buffer.generation().sequence() == (before.len() + after.len()) as u64
}
