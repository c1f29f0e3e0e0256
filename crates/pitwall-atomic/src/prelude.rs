//! Prelude for pitwall-atomic.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use pitwall_atomic::prelude::*;
//!
//! let buffer = SnapshotBuffer::new();
//! let mode = buffer.append(1.0);
//! assert_eq!(mode, AppendMode::Direct);
//! ```

pub use crate::buffer::{AppendMode, SnapshotBuffer};
pub use crate::generation::{Generation, GenerationCounter};
pub use crate::source::SnapshotSource;
