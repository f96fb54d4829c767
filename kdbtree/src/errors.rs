//! Error types for KDB-tree operations.

use thiserror::Error;

/// Errors that can occur while building or querying a KDB-tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KdbError {
    /// A point (or a split cutter) lies outside the region it was given to.
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Capacities below the minimum supported by the split algorithm.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A split was requested on a node with no usable split dimension.
    #[error("Cannot split node: {0}")]
    CannotSplit(String),
}

impl KdbError {
    /// Returns `true` for errors caused by coordinates outside a region.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, KdbError::Domain(_))
    }
}

/// Result type for KDB-tree operations
pub type KdbResult<T> = Result<T, KdbError>;
