//! Error types for metric construction and recording.
//!
//! This module provides error handling for metric operations with
//! proper error classification and context.

use thiserror::Error;

/// Errors that can occur while building or updating metrics.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    /// Histogram bucket bounds were rejected during construction.
    #[error("Invalid bucket bounds: {0}")]
    InvalidBuckets(String),

    /// A counter was asked to move backwards.
    #[error("Negative increment rejected: {0}")]
    NegativeIncrement(f64),
}

impl MetricsError {
    /// Create an invalid bucket bounds error.
    #[must_use]
    pub fn invalid_buckets(reason: impl Into<String>) -> Self {
        Self::InvalidBuckets(reason.into())
    }

    /// Create a negative increment error.
    #[must_use]
    pub fn negative_increment(amount: f64) -> Self {
        Self::NegativeIncrement(amount)
    }
}

/// A specialized `Result` type for metric operations.
pub type MetricsResult<T> = std::result::Result<T, MetricsError>;
