//! Error types for grid operations.

use thiserror::Error;

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur when constructing or indexing a grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Every grid dimension must be at least 1.
    #[error("invalid grid dimensions {nx}x{ny}x{nz}: every axis must be at least 1")]
    InvalidDimensions {
        /// Requested x dimension.
        nx: usize,
        /// Requested y dimension.
        ny: usize,
        /// Requested z dimension.
        nz: usize,
    },

    /// The sample buffer does not match the grid's point count.
    #[error("sample count mismatch: grid has {expected} points but {actual} samples were given")]
    SampleCountMismatch {
        /// Number of points the grid holds.
        expected: usize,
        /// Number of samples supplied.
        actual: usize,
    },

    /// A point id lies outside the grid's sample storage.
    #[error("point id {id} is out of bounds for a grid of {len} points")]
    IndexOutOfBounds {
        /// The offending flat point id.
        id: usize,
        /// Total number of points in the grid.
        len: usize,
    },
}

impl GridError {
    /// Create an invalid dimensions error.
    #[must_use]
    pub const fn invalid_dimensions(dimensions: [usize; 3]) -> Self {
        Self::InvalidDimensions {
            nx: dimensions[0],
            ny: dimensions[1],
            nz: dimensions[2],
        }
    }

    /// Create a sample count mismatch error.
    #[must_use]
    pub const fn sample_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::SampleCountMismatch { expected, actual }
    }

    /// Create an index out of bounds error.
    #[must_use]
    pub const fn index_out_of_bounds(id: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { id, len }
    }
}
