//! Shared observation interface for distribution metrics.

use std::time::Instant;

/// Capability trait for metrics that accept individual `f64` observations.
///
/// [`Histogram`](crate::histogram::Histogram) and
/// [`Summary`](crate::summary::Summary) both implement this trait, so
/// instrumentation code can record into either through a common interface
/// and the choice of distribution type stays a wiring decision.
///
/// # RT Safety
///
/// Implementations must keep `observe` lock-free on the hot path. A writer
/// thread recording an observation never blocks, regardless of any snapshot
/// in progress on a reader thread.
pub trait DistributionObserver {
    /// Record a single observation.
    fn observe(&self, amount: f64);

    /// Run `f`, observe its wall-clock duration in seconds, and return its result.
    ///
    /// The duration is recorded even when the closure is cheap; callers who
    /// need filtering should wrap the closure themselves.
    #[inline]
    fn observe_duration<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
        Self: Sized,
    {
        let start = Instant::now();
        let result = f();
        self.observe(start.elapsed().as_secs_f64());
        result
    }
}
