//! Metrics error types.

use thiserror::Error;

/// Errors raised by the streaming metric engines.
///
/// Both variants signal caller defects rather than data problems: a
/// historical read past the end of a ring buffer, or an engine built from an
/// inconsistent configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// Historical read or capture longer than the buffer holds.
    #[error("Offset {offset} out of range for buffer of capacity {capacity}")]
    OutOfRange { offset: usize, capacity: usize },

    /// Invalid construction parameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for metric engine operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
