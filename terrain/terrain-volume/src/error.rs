//! Error types for volume computation.

use terrain_types::GridError;
use thiserror::Error;

/// Result type alias for volume operations.
pub type VolumeResult<T> = Result<T, VolumeError>;

/// Errors that can occur during volume computation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VolumeError {
    /// An underlying grid operation failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The two surfaces have no common region.
    ///
    /// Raised when the intersection of the grids is empty along any axis.
    /// Surfaces with incompatible spacing typically surface here as well.
    #[error("surfaces do not intersect")]
    EmptyIntersection,

    /// A prism was handed four posts with no zero after slab reduction.
    ///
    /// Unreachable when called through the accumulator; per-cell occurrences
    /// are counted and the cell contributes zero volume.
    #[error("invalid corner configuration: no zero post after slab reduction")]
    InvalidCornerConfiguration,
}
