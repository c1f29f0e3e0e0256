//! Monotonic counter with consistent snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};

use crate::error::{MetricsError, MetricsResult};
use crate::snapshots::CounterSnapshot;

/// A monotonically increasing `f64` counter.
///
/// Increments from any number of threads are applied with atomic operations
/// only. A collection thread calling [`Counter::snapshot`] gets a view in
/// which the accumulated total and the increment count agree with each
/// other, which a pair of independent atomic loads cannot guarantee.
///
/// # RT Safety
///
/// [`Counter::inc`] and [`Counter::inc_by`] never block. While a snapshot
/// is in flight they enqueue the increment for replay instead of applying
/// it, at the cost of one short queue lock.
#[derive(Debug)]
pub struct Counter {
    total_bits: AtomicU64,
    increments: AtomicU64,
    buffer: SnapshotBuffer,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_bits: AtomicU64::new(0),
            increments: AtomicU64::new(0),
            buffer: SnapshotBuffer::new(),
        }
    }

    /// Add one to the counter.
    #[inline]
    pub fn inc(&self) {
        self.record(1.0);
    }

    /// Add `amount` to the counter.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NegativeIncrement`] when `amount` is less
    /// than zero; counters only move forward.
    #[inline]
    pub fn inc_by(&self, amount: f64) -> MetricsResult<()> {
        if amount < 0.0 {
            return Err(MetricsError::negative_increment(amount));
        }
        self.record(amount);
        Ok(())
    }

    /// Current accumulated total.
    ///
    /// Reflects applied increments only; an increment recorded while a
    /// snapshot is in flight surfaces here after the cycle replays it.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        f64::from_bits(self.total_bits.load(Ordering::Acquire))
    }

    /// Capture a consistent view of the counter.
    ///
    /// Serializes with other snapshot calls on this counter; increments are
    /// never blocked. See [`SnapshotBuffer::snapshot`] for the cycle and
    /// its livelock caveat.
    pub fn snapshot(&self) -> CounterSnapshot {
        self.buffer.snapshot(self)
    }

    fn record(&self, amount: f64) {
        if self.buffer.append(amount) == AppendMode::Direct {
            self.apply(amount);
        }
    }

    /// Fold `amount` into the total, then publish the increment. The
    /// increment count moves last so a quiescence check that has seen it
    /// also sees the total update.
    fn apply(&self, amount: f64) {
        let mut current = self.total_bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + amount).to_bits();
            match self.total_bits.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
        self.increments.fetch_add(1, Ordering::Release);
    }
}

impl SnapshotSource for Counter {
    type Snapshot = CounterSnapshot;

    fn is_quiescent(&self, baseline_sequence: u64) -> bool {
        self.increments.load(Ordering::Acquire) == baseline_sequence
    }

    fn produce(&self) -> CounterSnapshot {
        CounterSnapshot {
            total: f64::from_bits(self.total_bits.load(Ordering::Acquire)),
            increments: self.increments.load(Ordering::Acquire),
        }
    }

    fn replay(&self, value: f64) {
        self.apply(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = Counter::new();
        assert!(counter.total().abs() < f64::EPSILON);

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increments, 0);
        assert!(counter.total().abs() < f64::EPSILON);
    }

    #[test]
    fn test_inc_and_inc_by_accumulate() {
        let counter = Counter::new();
        counter.inc();
        counter.inc();
        assert!(counter.inc_by(2.5).is_ok());

        assert!((counter.total() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_increment_rejected() {
        let counter = Counter::new();
        counter.inc();

        let result = counter.inc_by(-1.0);
        assert!(matches!(result, Err(MetricsError::NegativeIncrement(_))));
        assert!((counter.total() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_matches_live_state() {
        let counter = Counter::new();
        counter.inc();
        assert!(counter.inc_by(4.0).is_ok());

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increments, 2);
        assert!((snapshot.total - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_increment_is_allowed() {
        let counter = Counter::new();
        assert!(counter.inc_by(0.0).is_ok());

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increments, 1);
        assert!(snapshot.total.abs() < f64::EPSILON);
    }
}
