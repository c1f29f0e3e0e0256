//! Fixed-bucket histogram with consistent snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};

use crate::error::{MetricsError, MetricsResult};
use crate::observer::DistributionObserver;
use crate::snapshots::{BucketCount, HistogramSnapshot};

/// Default bucket upper bounds, tuned for latencies measured in seconds.
pub const DEFAULT_UPPER_BOUNDS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// A histogram over a fixed set of inclusive upper bounds.
///
/// Every histogram carries one more bucket than it has configured bounds:
/// the final bucket has an upper bound of `f64::INFINITY` and catches
/// everything larger than the last configured bound. NaN observations are
/// counted there too, and poison the running sum. Bucket counts are
/// per-bucket rather than cumulative, so they always add up to the total
/// observation count.
///
/// [`Histogram::snapshot`] returns a view in which the total count, the
/// sum, and every bucket describe the same set of observations.
///
/// # Example
///
/// ```rust
/// use pitwall_metrics::Histogram;
///
/// let histogram = Histogram::new(vec![0.1, 1.0, 10.0])?;
/// histogram.observe(0.05);
/// histogram.observe(2.5);
///
/// let snapshot = histogram.snapshot();
/// assert_eq!(snapshot.count, 2);
/// assert_eq!(snapshot.buckets.len(), 4);
/// # Ok::<(), pitwall_metrics::MetricsError>(())
/// ```
///
/// # RT Safety
///
/// [`Histogram::observe`] never blocks. While a snapshot is in flight it
/// enqueues the observation for replay instead of applying it, at the cost
/// of one short queue lock.
#[derive(Debug)]
pub struct Histogram {
    upper_bounds: Box<[f64]>,
    buckets: Box<[AtomicU64]>,
    sum_bits: AtomicU64,
    count: AtomicU64,
    buffer: SnapshotBuffer,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_default_buckets()
    }
}

impl Histogram {
    /// Create a histogram over the given inclusive upper bounds.
    ///
    /// The overflow bucket is added automatically; do not include
    /// `f64::INFINITY` in `upper_bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidBuckets`] when `upper_bounds` is
    /// empty, contains a non-finite bound, or is not strictly increasing.
    pub fn new(upper_bounds: Vec<f64>) -> MetricsResult<Self> {
        if upper_bounds.is_empty() {
            return Err(MetricsError::invalid_buckets(
                "at least one bucket bound is required",
            ));
        }
        for bound in &upper_bounds {
            if !bound.is_finite() {
                return Err(MetricsError::invalid_buckets(format!(
                    "bound {bound} is not finite; the overflow bucket is implicit"
                )));
            }
        }
        for pair in upper_bounds.windows(2) {
            if let [lower, upper] = pair {
                if lower >= upper {
                    return Err(MetricsError::invalid_buckets(format!(
                        "bounds must be strictly increasing, got {lower} then {upper}"
                    )));
                }
            }
        }
        Ok(Self::from_validated(upper_bounds))
    }

    /// Create a histogram over [`DEFAULT_UPPER_BOUNDS`].
    #[must_use]
    pub fn with_default_buckets() -> Self {
        Self::from_validated(DEFAULT_UPPER_BOUNDS.to_vec())
    }

    fn from_validated(upper_bounds: Vec<f64>) -> Self {
        let bucket_count = upper_bounds.len().saturating_add(1);
        let buckets = std::iter::repeat_with(AtomicU64::default)
            .take(bucket_count)
            .collect();
        Self {
            upper_bounds: upper_bounds.into_boxed_slice(),
            buckets,
            sum_bits: AtomicU64::new(0),
            count: AtomicU64::new(0),
            buffer: SnapshotBuffer::new(),
        }
    }

    /// Record one observation.
    #[inline]
    pub fn observe(&self, amount: f64) {
        self.record(amount);
    }

    /// The configured upper bounds, excluding the implicit overflow bucket.
    #[inline]
    #[must_use]
    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
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

    /// Capture a consistent view of the histogram.
    ///
    /// Serializes with other snapshot calls on this histogram; observers
    /// are never blocked. See [`SnapshotBuffer::snapshot`] for the cycle
    /// and its livelock caveat.
    pub fn snapshot(&self) -> HistogramSnapshot {
        self.buffer.snapshot(self)
    }

    fn record(&self, amount: f64) {
        if self.buffer.append(amount) == AppendMode::Direct {
            self.apply(amount);
        }
    }

    /// Apply one observation to the live buckets. The count moves last so
    /// a quiescence check that has seen it also sees the bucket and sum
    /// updates.
    fn apply(&self, amount: f64) {
        let index = self.bucket_index(amount);
        if let Some(bucket) = self.buckets.get(index) {
            bucket.fetch_add(1, Ordering::Relaxed);
        }
        self.add_to_sum(amount);
        self.count.fetch_add(1, Ordering::Release);
    }

    /// Index of the bucket that owns `amount`. NaN compares false against
    /// every bound, so it is routed to the overflow bucket explicitly.
    fn bucket_index(&self, amount: f64) -> usize {
        if amount.is_nan() {
            return self.upper_bounds.len();
        }
        self.upper_bounds.partition_point(|bound| *bound < amount)
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
}

impl DistributionObserver for Histogram {
    #[inline]
    fn observe(&self, amount: f64) {
        self.record(amount);
    }
}

impl SnapshotSource for Histogram {
    type Snapshot = HistogramSnapshot;

    fn is_quiescent(&self, baseline_sequence: u64) -> bool {
        self.count.load(Ordering::Acquire) == baseline_sequence
    }

    fn produce(&self) -> HistogramSnapshot {
        let mut buckets = Vec::with_capacity(self.buckets.len());
        for (index, bucket) in self.buckets.iter().enumerate() {
            let upper_bound = self
                .upper_bounds
                .get(index)
                .copied()
                .unwrap_or(f64::INFINITY);
            buckets.push(BucketCount {
                upper_bound,
                count: bucket.load(Ordering::Acquire),
            });
        }
        HistogramSnapshot {
            count: self.count.load(Ordering::Acquire),
            sum: f64::from_bits(self.sum_bits.load(Ordering::Acquire)),
            buckets,
        }
    }

    fn replay(&self, value: f64) {
        self.apply(value);
    }
}
