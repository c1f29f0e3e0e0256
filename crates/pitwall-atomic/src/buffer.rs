//! The snapshot buffer: observation classification plus the snapshot cycle.
//!
//! [`SnapshotBuffer`] couples a [`GenerationCounter`] to a pending-value
//! queue so that an occasional reader can capture an internally consistent
//! view of a live metric structure while writers keep recording. Writers
//! pay one atomic increment in the common case; only observations that race
//! a snapshot are queued and replayed afterwards.
//!
//! # RT Safety
//!
//! [`SnapshotBuffer::append`] in direct mode is a single atomic fetch-add:
//! no locks, no allocation, no syscalls. In buffered mode it additionally
//! takes a short queue lock and may allocate on queue growth. The snapshot
//! cycle itself belongs on a non-RT collection thread.

use crossbeam::utils::Backoff;
use parking_lot::Mutex;

use crate::generation::{Generation, GenerationCounter};
use crate::source::SnapshotSource;

/// Classification of one appended observation.
///
/// Returned by [`SnapshotBuffer::append`]. A `Direct` observation has not
/// been recorded anywhere: the caller must apply it to the live structure
/// itself. A `Buffered` observation is already queued and will reach the
/// live structure through [`SnapshotSource::replay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a Direct observation must be applied to the live structure by the caller"]
pub enum AppendMode {
    /// The caller applies the value to the live structure now.
    Direct,
    /// The value was queued; the snapshot cycle replays it later.
    Buffered,
}

/// Lock-minimal buffer giving one reader consistent snapshots of a
/// structure many writers mutate.
///
/// The buffer owns the generation counter, the pending-value queue, and the
/// reader mutex that serializes snapshot cycles. It knows nothing about the
/// live structure; the owning metric type supplies that behaviour through
/// [`SnapshotSource`].
///
/// # Example
///
/// ```rust
/// use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// /// A metric that only counts how many observations were applied.
/// struct HitCount {
///     buffer: SnapshotBuffer,
///     applied: AtomicU64,
/// }
///
/// impl HitCount {
///     fn record(&self) {
///         if self.buffer.append(1.0) == AppendMode::Direct {
///             self.applied.fetch_add(1, Ordering::Release);
///         }
///     }
/// }
///
/// impl SnapshotSource for HitCount {
///     type Snapshot = u64;
///
///     fn is_quiescent(&self, baseline_sequence: u64) -> bool {
///         self.applied.load(Ordering::Acquire) == baseline_sequence
///     }
///
///     fn produce(&self) -> u64 {
///         self.applied.load(Ordering::Acquire)
///     }
///
///     fn replay(&self, _value: f64) {
///         self.applied.fetch_add(1, Ordering::Release);
///     }
/// }
///
/// let metric = HitCount {
///     buffer: SnapshotBuffer::new(),
///     applied: AtomicU64::new(0),
/// };
/// metric.record();
/// metric.record();
/// assert_eq!(metric.buffer.snapshot(&metric), 2);
/// ```
#[derive(Debug)]
pub struct SnapshotBuffer {
    generation: GenerationCounter,
    pending: Mutex<Vec<f64>>,
    reader: Mutex<()>,
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuffer {
    /// Create an idle buffer with an empty pending queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: GenerationCounter::new(),
            pending: Mutex::new(Vec::new()),
            reader: Mutex::new(()),
        }
    }

    /// Create an idle buffer whose pending queue can hold `capacity` values
    /// before its first growth.
    #[must_use]
    pub fn with_pending_capacity(capacity: usize) -> Self {
        Self {
            generation: GenerationCounter::new(),
            pending: Mutex::new(Vec::with_capacity(capacity)),
            reader: Mutex::new(()),
        }
    }

    /// Record one observation attempt and classify it.
    ///
    /// Claims the next sequence number with a single atomic increment and
    /// reads the buffering mode from the same word. On
    /// [`AppendMode::Direct`] the caller owns applying `value` to the live
    /// structure. On [`AppendMode::Buffered`] the value has been pushed
    /// onto the pending queue and will be replayed by the in-flight
    /// snapshot cycle; the caller does nothing further.
    ///
    /// The classification is never ambiguous: the sequence number and mode
    /// flag come from one atomic word, so an observation either fully
    /// precedes a snapshot's activation (direct, awaited by its quiescence
    /// check) or fully follows it (buffered, owed to its pending queue).
    ///
    /// # RT Safety
    ///
    /// Direct mode: one atomic fetch-add, nothing else. Buffered mode:
    /// additionally takes the pending-queue lock for one push, which may
    /// allocate on growth.
    #[inline]
    pub fn append(&self, value: f64) -> AppendMode {
        let generation = self.generation.increment();
        if generation.is_buffered() {
            self.pending.lock().push(value);
            AppendMode::Buffered
        } else {
            AppendMode::Direct
        }
    }

    /// Run one snapshot cycle against `source` and return the produced
    /// view.
    ///
    /// The cycle: flip the counter into buffered mode and capture the
    /// baseline; busy-wait until `source` reports quiescence for that
    /// baseline; call [`SnapshotSource::produce`] exactly once; flip back
    /// to direct mode, learning how many observations were buffered during
    /// the window; busy-wait until all of them have reached the pending
    /// queue; take the queue contents and release the reader lock; replay
    /// the taken values in arrival order. Replayed values surface in the
    /// *next* snapshot, never the one returning here.
    ///
    /// Concurrent callers serialize on the internal reader mutex. Writers
    /// are never blocked: while a cycle is in flight their observations are
    /// queued, and replay runs after the lock is released, so it may
    /// overlap the next cycle's direct-mode writes.
    ///
    /// Both waits use exponential backoff that spins briefly and then
    /// yields to the scheduler.
    ///
    /// # Livelock
    ///
    /// The cycle has no timeout. If a writer stalls forever between
    /// claiming a sequence number and finishing its update (or its queue
    /// push), the corresponding wait never completes and this call spins
    /// indefinitely. There is no recovery that would preserve the
    /// consistency guarantees, so none is attempted; keep writer update
    /// sections short and non-blocking. The completed cycle emits a
    /// `debug!` event under the `pitwall::snapshot` target with the wait
    /// iteration counts, which makes a pathological wait visible in traces.
    pub fn snapshot<S: SnapshotSource>(&self, source: &S) -> S::Snapshot {
        let reader = self.reader.lock();

        let baseline = self.generation.activate();

        let mut quiescence_spins: u64 = 0;
        let backoff = Backoff::new();
        while !source.is_quiescent(baseline.sequence()) {
            backoff.snooze();
            quiescence_spins = quiescence_spins.saturating_add(1);
        }

        let produced = source.produce();

        let deactivated = self.generation.deactivate();
        let expected_pending = deactivated.sequence().saturating_sub(baseline.sequence());

        let mut drain_spins: u64 = 0;
        let backoff = Backoff::new();
        while self.pending.lock().len() as u64 != expected_pending {
            backoff.snooze();
            drain_spins = drain_spins.saturating_add(1);
        }

        let replayable = std::mem::take(&mut *self.pending.lock());
        drop(reader);

        for value in &replayable {
            source.replay(*value);
        }

        tracing::debug!(
            target: "pitwall::snapshot",
            replayed = replayable.len(),
            quiescence_spins,
            drain_spins,
            "snapshot cycle complete"
        );

        produced
    }

    /// Number of values currently queued for replay.
    ///
    /// Zero whenever no snapshot cycle is in flight.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// The current generation word.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation.load()
    }
}
