//! Prelude for pitwall-metrics.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use pitwall_metrics::prelude::*;
//!
//! let latencies = Histogram::with_default_buckets();
//! latencies.observe(0.042);
//!
//! let snapshot = latencies.snapshot();
//! assert_eq!(snapshot.count, 1);
//! ```

pub use crate::counter::Counter;
pub use crate::error::{MetricsError, MetricsResult};
pub use crate::histogram::{DEFAULT_UPPER_BOUNDS, Histogram};
pub use crate::observer::DistributionObserver;
pub use crate::snapshots::{BucketCount, CounterSnapshot, HistogramSnapshot, SummarySnapshot};
pub use crate::summary::Summary;
