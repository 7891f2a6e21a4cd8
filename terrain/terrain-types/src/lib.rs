//! Core grid types for terrain processing.
//!
//! This crate provides the foundational types for height-field terrain
//! work:
//!
//! - [`StructuredGrid`] - A regular axis-aligned lattice of scalar samples
//! - [`Surface`] - A grid whose samples are terrain heights
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be
//! used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates and samples are
//! `f64`. Downstream crates assume heights share the unit of the x/y
//! spacing.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: easting (column index `i`)
//! - Y: northing (row index `j`)
//! - Z: height (up)
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use terrain_types::Surface;
//!
//! let heights = vec![100.0, 101.0, 102.0, 103.0];
//! let surface = Surface::from_heights(
//!     2,
//!     2,
//!     Point3::origin(),
//!     Vector3::new(1.0, 1.0, 1.0),
//!     heights,
//! ).unwrap();
//!
//! assert_eq!(surface.grid().point_count(), 4);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod grid;
mod surface;

// Re-export core types
pub use error::{GridError, GridResult};
pub use grid::StructuredGrid;
pub use surface::Surface;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
