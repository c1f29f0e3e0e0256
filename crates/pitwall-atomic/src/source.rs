//! The capability contract between a [`SnapshotBuffer`] and the metric
//! structure that owns it.
//!
//! A metric type implements [`SnapshotSource`] on itself and passes `&self`
//! to [`SnapshotBuffer::snapshot`]; counters, histograms, and summaries all
//! share the one buffer implementation through this trait.
//!
//! [`SnapshotBuffer`]: crate::SnapshotBuffer
//! [`SnapshotBuffer::snapshot`]: crate::SnapshotBuffer::snapshot

/// Callbacks a live metric structure supplies to one snapshot cycle.
///
/// The three methods are invoked by [`SnapshotBuffer::snapshot`] in a fixed
/// pattern: `is_quiescent` repeatedly until it reports true, then `produce`
/// exactly once, then `replay` once per observation that was deferred while
/// the snapshot was being taken.
///
/// # Contract
///
/// - `is_quiescent` must never block; the buffer calls it in a cooperative
///   busy-wait loop.
/// - `produce` must read the live structure without mutating it. The buffer
///   guarantees no direct-mode write is concurrent with it.
/// - `replay` must apply one observation through the same logic a
///   direct-mode write uses, including whatever bookkeeping `is_quiescent`
///   is derived from; the next cycle's quiescence wait relies on that to
///   tolerate a replay still in flight when it activates.
///
/// A source whose `is_quiescent` can never report true, or whose
/// direct-mode writers stall forever between claiming a sequence number and
/// finishing their update, livelocks the snapshot cycle. See
/// [`SnapshotBuffer::snapshot`] for the full discussion.
///
/// [`SnapshotBuffer::snapshot`]: crate::SnapshotBuffer::snapshot
pub trait SnapshotSource {
    /// The point-in-time view `produce` builds.
    type Snapshot;

    /// Report whether every direct-mode observation with a sequence number
    /// at or below `baseline_sequence` has finished mutating the live
    /// structure.
    ///
    /// The usual implementation keeps an applied-observation count that is
    /// incremented last in every write path and compares it against
    /// `baseline_sequence` for equality.
    fn is_quiescent(&self, baseline_sequence: u64) -> bool;

    /// Build the snapshot from the live structure.
    ///
    /// Runs while the structure is guaranteed stable: quiescence has been
    /// reached and concurrent observations are being buffered.
    fn produce(&self) -> Self::Snapshot;

    /// Apply one deferred observation to the live structure.
    ///
    /// Invoked after the snapshot's critical section has been released, in
    /// the order the deferred observations reached the pending queue.
    fn replay(&self, value: f64);
}
