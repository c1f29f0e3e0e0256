//! Count/sum/min/max summary with consistent snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};

use crate::observer::DistributionObserver;
use crate::snapshots::SummarySnapshot;

/// A lightweight distribution summary tracking count, sum, minimum, and
/// maximum of observed values.
///
/// Unlike a [`Histogram`](crate::histogram::Histogram) it needs no bucket
/// layout up front, at the cost of not supporting quantile estimates.
/// [`Summary::snapshot`] returns a view in which all four statistics
/// describe the same set of observations.
///
/// Observing a NaN increments the count and poisons the running sum, but
/// leaves minimum and maximum untouched; NaN is unordered, so neither
/// extreme has a meaningful update for it.
///
/// # RT Safety
///
/// [`Summary::observe`] never blocks. While a snapshot is in flight it
/// enqueues the observation for replay instead of applying it, at the cost
/// of one short queue lock.
#[derive(Debug)]
pub struct Summary {
    count: AtomicU64,
    sum_bits: AtomicU64,
    min_bits: AtomicU64,
    max_bits: AtomicU64,
    buffer: SnapshotBuffer,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    /// Create an empty summary.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0),
            min_bits: AtomicU64::new(f64::INFINITY.to_bits()),
            max_bits: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            buffer: SnapshotBuffer::new(),
        }
    }

    /// Record one observation.
    #[inline]
    pub fn observe(&self, amount: f64) {
        self.record(amount);
    }

    /// Number of observations applied so far.
    ///
    /// Observations recorded while a snapshot is in flight surface here
    /// after the cycle replays them.
    #[inline]
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Capture a consistent view of the summary.
    ///
    /// Serializes with other snapshot calls on this summary; observers are
    /// never blocked. See [`SnapshotBuffer::snapshot`] for the cycle and
    /// its livelock caveat.
    pub fn snapshot(&self) -> SummarySnapshot {
        self.buffer.snapshot(self)
    }

    fn record(&self, amount: f64) {
        if self.buffer.append(amount) == AppendMode::Direct {
            self.apply(amount);
        }
    }

    /// Apply one observation to the live statistics. The count moves last
    /// so a quiescence check that has seen it also sees the other updates.
    fn apply(&self, amount: f64) {
        self.add_to_sum(amount);
        self.update_min(amount);
        self.update_max(amount);
        self.count.fetch_add(1, Ordering::Release);
    }

    fn add_to_sum(&self, amount: f64) {
        let mut current = self.sum_bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + amount).to_bits();
            match self.sum_bits.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn update_min(&self, amount: f64) {
        let mut current = self.min_bits.load(Ordering::Relaxed);
        while amount < f64::from_bits(current) {
            match self.min_bits.compare_exchange_weak(
                current,
                amount.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    fn update_max(&self, amount: f64) {
        let mut current = self.max_bits.load(Ordering::Relaxed);
        while amount > f64::from_bits(current) {
            match self.max_bits.compare_exchange_weak(
                current,
                amount.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

impl DistributionObserver for Summary {
    #[inline]
    fn observe(&self, amount: f64) {
        self.record(amount);
    }
}

impl SnapshotSource for Summary {
    type Snapshot = SummarySnapshot;

    fn is_quiescent(&self, baseline_sequence: u64) -> bool {
        self.count.load(Ordering::Acquire) == baseline_sequence
    }

    fn produce(&self) -> SummarySnapshot {
        let count = self.count.load(Ordering::Acquire);
        SummarySnapshot {
            count,
            sum: f64::from_bits(self.sum_bits.load(Ordering::Acquire)),
            min: (count > 0).then(|| f64::from_bits(self.min_bits.load(Ordering::Acquire))),
            max: (count > 0).then(|| f64::from_bits(self.max_bits.load(Ordering::Acquire))),
        }
    }

    fn replay(&self, value: f64) {
        self.apply(value);
    }
}
