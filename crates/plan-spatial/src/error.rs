//! Error types for spatial operations.

/// Errors that can occur while building or querying spatial structures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// The input batch or value is malformed.
    ///
    /// Raised for empty batches when the dimensionality cannot be inferred,
    /// batches with mixed dimensionality, zero-dimensional indices,
    /// non-finite coordinates and negative radii.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A point's dimensionality does not match the structure it is used with.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index or map.
        expected: usize,
        /// Dimensionality of the offending point.
        actual: usize,
    },

    /// A nearest-neighbour query was made against an index with no points.
    #[error("spatial index is empty")]
    EmptyIndex,
}

impl SpatialError {
    /// Creates an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns `true` if this is a dimension mismatch.
    #[must_use]
    pub const fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Returns `true` if this is an empty index error.
    #[must_use]
    pub const fn is_empty_index(&self) -> bool {
        matches!(self, Self::EmptyIndex)
    }
}
