//! Cut/fill volume estimation between two height-field surfaces.
//!
//! This crate computes the volumetric difference between a *reference* and
//! an *actual* terrain surface, each sampled on a regular grid. Every grid
//! cell lifts its footprint from the reference to the actual surface,
//! forming a hexahedron that is measured exactly by tetrahedral
//! decomposition and classified as lying above or below the reference.
//!
//! # Features
//!
//! - **Grid alignment**: surfaces with different origins and extents are
//!   intersected onto a common iteration region
//! - **Exact cell volumes**: tetrahedron, prism and wedge closed forms for
//!   every corner-sign configuration, including degenerate cells
//! - **Filtering**: optional z-range, height-band and minimum-volume
//!   rejection rules per cell
//! - **Selection policies**: accumulate all cells, only cut, only fill, or
//!   only mixed cells
//! - **Cell records**: optional per-cell output of world-coordinate
//!   vertices and volumes for downstream visualisation
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be
//! used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use terrain_types::Surface;
//! use terrain_volume::{calculate_volume, VolumeParams};
//!
//! let spacing = Vector3::new(1.0, 1.0, 1.0);
//!
//! // Survey before and after earthworks: a flat site raised by 10 units.
//! let before = Surface::flat(2, 2, Point3::origin(), spacing, 100.0).unwrap();
//! let after = Surface::flat(2, 2, Point3::origin(), spacing, 110.0).unwrap();
//!
//! let summary = calculate_volume(&before, &after, &VolumeParams::default()).unwrap();
//! assert!((summary.volume_above - 10.0).abs() < 1e-9);
//! assert!(summary.volume_below.abs() < 1e-12);
//! ```
//!
//! # Sign Convention
//!
//! Heights are differenced `actual - reference`: material above the
//! reference surface is fill (`volume_above`), material below is cut
//! (`volume_below`). Both totals are non-negative.
//!
//! # Preconditions
//!
//! The two surfaces must share the same x/y post spacing; this is not
//! enforced, see [`spacing_matches`]. Saddle-shaped cells use a fixed
//! "valley" decomposition, a known approximation documented on
//! [`prism_volume`].

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod accumulate;
mod classify;
mod decompose;
mod error;
mod filter;
mod intersect;
mod params;
mod result;

// Re-export main types and functions
pub use accumulate::{calculate_volume, VolumeCalculator};
pub use classify::{classify, corner_heights, CellClass};
pub use decompose::{cell_volume, hexahedron_volume, prism_volume, CellVolume};
pub use error::{VolumeError, VolumeResult};
pub use filter::FilterChain;
pub use intersect::{intersect, spacing_matches, GridIntersection};
pub use params::{CuboidSelector, HeightFilter, RangeFilter, VolumeParams};
pub use result::{CellRecord, VolumeSummary};

// Re-export the surface types for convenience
pub use terrain_types::{StructuredGrid, Surface};
