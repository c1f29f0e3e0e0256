//! # pitwall-metrics
//!
//! Counter, histogram, and summary metrics with consistent snapshots for
//! `Pitwall`.
//!
//! Each metric type in this crate pairs its live atomic state with a
//! [`SnapshotBuffer`](pitwall_atomic::SnapshotBuffer), so any number of
//! threads can record observations with atomic operations only while a
//! collection thread captures views in which count, sum, and every derived
//! statistic agree with each other.
//!
//! ## Safety Guarantees
//!
//! - **Recording never blocks** - `inc` and `observe` are lock-free in the
//!   common case, taking one short queue lock only while a snapshot is in
//!   flight
//! - **Exactly-once accounting** - observations that race a snapshot are
//!   replayed afterwards, never lost or double-counted
//! - **Internally consistent snapshots** - a snapshot never shows a sum
//!   that includes an observation its count is missing
//!
//! ## Architecture
//!
//! The crate is organized into six modules:
//!
//! - [`counter`] - [`Counter`]: monotonically increasing `f64` totals
//! - [`histogram`] - [`Histogram`]: fixed inclusive upper bounds plus an
//!   overflow bucket
//! - [`summary`] - [`Summary`]: count, sum, minimum, and maximum
//! - [`observer`] - [`DistributionObserver`]: the shared observation trait
//! - [`snapshots`] - the plain serializable views snapshots return
//! - [`error`] - [`MetricsError`] and [`MetricsResult`]
//!
//! ## Usage
//!
//! ```rust
//! use pitwall_metrics::{Histogram, MetricsResult};
//!
//! fn main() -> MetricsResult<()> {
//!     let latencies = Histogram::new(vec![0.01, 0.1, 1.0])?;
//!
//!     latencies.observe(0.003);
//!     latencies.observe(0.25);
//!
//!     let snapshot = latencies.snapshot();
//!     assert_eq!(snapshot.count, 2);
//!     assert!((snapshot.sum - 0.253).abs() < 1e-9);
//!     Ok(())
//! }
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counter;
pub mod error;
pub mod histogram;
pub mod observer;
pub mod snapshots;
pub mod summary;

pub mod prelude;

pub use counter::Counter;
pub use error::{MetricsError, MetricsResult};
pub use histogram::{DEFAULT_UPPER_BOUNDS, Histogram};
pub use observer::DistributionObserver;
pub use snapshots::{BucketCount, CounterSnapshot, HistogramSnapshot, SummarySnapshot};
pub use summary::Summary;
