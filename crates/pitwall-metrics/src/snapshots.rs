//! Plain value types published by metric snapshots.
//!
//! Snapshots are detached from the live metric: once produced they are
//! ordinary data, safe to serialize, ship across threads, or diff against
//! an earlier snapshot without touching the hot path.

use serde::{Deserialize, Serialize};

/// Observation count for a single histogram bucket.
///
/// Counts are per-bucket, not cumulative. The final bucket of every
/// histogram carries an upper bound of `f64::INFINITY` so the bucket counts
/// always sum to the total observation count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BucketCount {
    /// Inclusive upper bound of the bucket.
    pub upper_bound: f64,
    /// Number of observations that fell into this bucket.
    pub count: u64,
}

/// Point-in-time view of a [`Histogram`](crate::histogram::Histogram).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    /// Total number of observations.
    pub count: u64,
    /// Sum of all observed values.
    pub sum: f64,
    /// Per-bucket observation counts, ordered by ascending upper bound.
    pub buckets: Vec<BucketCount>,
}

impl HistogramSnapshot {
    /// Mean observed value, or `0.0` when nothing has been observed.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Point-in-time view of a [`Summary`](crate::summary::Summary).
///
/// `min` and `max` are `None` until the first observation lands.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SummarySnapshot {
    /// Total number of observations.
    pub count: u64,
    /// Sum of all observed values.
    pub sum: f64,
    /// Smallest observed value.
    pub min: Option<f64>,
    /// Largest observed value.
    pub max: Option<f64>,
}

impl SummarySnapshot {
    /// Mean observed value, or `0.0` when nothing has been observed.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Point-in-time view of a [`Counter`](crate::counter::Counter).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Accumulated counter value.
    pub total: f64,
    /// Number of increments applied since creation.
    pub increments: u64,
}
