//! Generation counter: a packed `{sequence, mode}` word behind one atomic.
//!
//! This module provides [`Generation`], a decoded view of the counter word,
//! and [`GenerationCounter`], the shared atomic that writers increment once
//! per observation. The low 63 bits of the word are a monotonically
//! increasing sequence number; the top bit is the buffering mode flag.
//! All transitions are single atomic read-modify-write instructions, and no
//! code path depends on arithmetic wrapping across the mode bit.
//!
//! # RT Safety
//!
//! [`GenerationCounter::increment`] is the writer hot path: one atomic
//! fetch-add, no allocation, no blocking, bounded execution time. The
//! remaining operations belong to the reader side of a snapshot cycle.

use std::sync::atomic::{AtomicU64, Ordering};

/// Bit weight of the buffering mode flag (the top bit of the word).
const MODE_BIT: u64 = 1 << 63;

/// Mask selecting the 63-bit sequence field.
const SEQUENCE_MASK: u64 = MODE_BIT - 1;

/// Decoded view of one counter word: a 63-bit sequence number plus the
/// buffering mode flag.
///
/// A `Generation` is a plain value captured from a [`GenerationCounter`];
/// it never changes after capture. The two fields are read together from a
/// single atomic word, so a sequence number and the mode it was observed
/// under are always mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// Decode a generation from a raw counter word.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Build a generation from its two fields.
    ///
    /// Sequence bits above the 63-bit field are discarded.
    #[inline]
    #[must_use]
    pub const fn new(sequence: u64, buffered: bool) -> Self {
        let mode = if buffered { MODE_BIT } else { 0 };
        Self((sequence & SEQUENCE_MASK) | mode)
    }

    /// The 63-bit observation sequence number.
    ///
    /// Increments exactly once per [`GenerationCounter::increment`] call and
    /// never resets for the lifetime of the counter.
    #[inline]
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0 & SEQUENCE_MASK
    }

    /// Whether the buffering mode flag was set when this value was captured.
    #[inline]
    #[must_use]
    pub const fn is_buffered(self) -> bool {
        self.0 & MODE_BIT != 0
    }

    /// The raw packed word.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The shared atomic word coupling the observation sequence to the
/// buffering mode.
///
/// Writers call [`increment`](Self::increment) once per observation; the
/// new value's mode flag tells the writer whether to apply the observation
/// directly or hand it to the pending queue. The snapshot reader flips the
/// mode flag with [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate), which are bit set/clear operations and
/// therefore cannot disturb the sequence field.
///
/// # Thread Safety
///
/// All operations are single atomic read-modify-writes with `AcqRel`
/// ordering (loads use `Acquire`). Read-modify-writes on one atomic form a
/// total order, which is what makes the Direct/Buffered classification of
/// every increment unambiguous relative to activation and deactivation.
///
/// # RT Safety
///
/// [`increment`](Self::increment) is RT-safe: a single atomic instruction,
/// no allocation, no blocking.
#[derive(Debug)]
pub struct GenerationCounter(AtomicU64);

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationCounter {
    /// Create a counter at sequence zero in direct mode.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Create a counter resuming from a captured generation.
    ///
    /// Useful for testing mid-stream states.
    #[must_use]
    pub const fn with_value(generation: Generation) -> Self {
        Self(AtomicU64::new(generation.raw()))
    }

    /// Claim the next sequence number and return the resulting generation.
    ///
    /// The returned value's mode flag classifies the caller's observation:
    /// direct when clear, buffered when set. The increment is visible to
    /// all threads before this call returns.
    ///
    /// The sequence field holds 63 bits; at one increment per nanosecond it
    /// lasts roughly 292 years, so carry into the mode flag is not a
    /// reachable state in practice.
    ///
    /// # RT Safety
    ///
    /// RT-safe. Single atomic fetch-add instruction.
    #[inline]
    #[must_use]
    pub fn increment(&self) -> Generation {
        Generation::from_raw(self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
    }

    /// Set the mode flag and return the generation observed immediately
    /// before the flip.
    ///
    /// The returned baseline carries the sequence number that partitions
    /// increments into the direct set (at or below it) and the buffered set
    /// (above it, until [`deactivate`](Self::deactivate)).
    #[inline]
    #[must_use]
    pub fn activate(&self) -> Generation {
        Generation::from_raw(self.0.fetch_or(MODE_BIT, Ordering::AcqRel))
    }

    /// Clear the mode flag and return the generation observed at the flip.
    ///
    /// The returned value's sequence field includes every increment that
    /// landed while the flag was set; the difference from the activation
    /// baseline is the exact number of buffered observations owed to the
    /// pending queue.
    #[inline]
    #[must_use]
    pub fn deactivate(&self) -> Generation {
        Generation::from_raw(self.0.fetch_and(!MODE_BIT, Ordering::AcqRel))
    }

    /// Read the current generation.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Generation {
        Generation::from_raw(self.0.load(Ordering::Acquire))
    }
}
