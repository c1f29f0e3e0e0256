//! # pitwall-atomic
//!
//! Generation-gated snapshot buffering for concurrent metrics in `Pitwall`.
//!
//! This crate provides the synchronization primitive that lets many writer
//! threads record `f64` observations into a live metric structure while an
//! occasional reader computes a point-in-time, internally consistent view of
//! it. No observation is lost or double-counted, and writers never block on
//! the reader.
//!
//! ## Safety Guarantees
//!
//! - **Writers never block on a reader** - the common append path is a
//!   single atomic instruction
//! - **No allocation on the direct append path** - only buffered appends
//!   may grow the pending queue
//! - **Exactly-once accounting** - every observation reaches the live
//!   structure exactly once, either directly or via replay
//! - **Consistent snapshots** - the produced view reflects a stable
//!   structure, never a torn one
//!
//! ## Architecture
//!
//! The crate is organized into three modules:
//!
//! - [`generation`] - The packed `{sequence, mode}` atomic word
//! - [`buffer`] - [`SnapshotBuffer`]: append classification and the
//!   snapshot cycle
//! - [`source`] - [`SnapshotSource`]: the capability trait metric types
//!   implement to plug into the cycle
//!
//! ## Usage
//!
//! ```rust
//! use pitwall_atomic::{AppendMode, SnapshotBuffer, SnapshotSource};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct HitCount {
//!     buffer: SnapshotBuffer,
//!     applied: AtomicU64,
//! }
//!
//! impl HitCount {
//!     fn record(&self) {
//!         // Direct means the caller applies the observation itself.
//!         if self.buffer.append(1.0) == AppendMode::Direct {
//!             self.applied.fetch_add(1, Ordering::Release);
//!         }
//!     }
//! }
//!
//! impl SnapshotSource for HitCount {
//!     type Snapshot = u64;
//!
//!     fn is_quiescent(&self, baseline_sequence: u64) -> bool {
//!         self.applied.load(Ordering::Acquire) == baseline_sequence
//!     }
//!
//!     fn produce(&self) -> u64 {
//!         self.applied.load(Ordering::Acquire)
//!     }
//!
//!     fn replay(&self, _value: f64) {
//!         self.applied.fetch_add(1, Ordering::Release);
//!     }
//! }
//!
//! let metric = HitCount {
//!     buffer: SnapshotBuffer::new(),
//!     applied: AtomicU64::new(0),
//! };
//! metric.record();
//! metric.record();
//!
//! // The snapshot cycle serializes against writers without blocking them.
//! assert_eq!(metric.buffer.snapshot(&metric), 2);
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

pub mod buffer;
pub mod generation;
pub mod source;

pub mod prelude;

pub use buffer::{AppendMode, SnapshotBuffer};
pub use generation::{Generation, GenerationCounter};
pub use source::SnapshotSource;
