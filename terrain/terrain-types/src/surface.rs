//! Height-field surfaces.
//!
//! A [`Surface`] is a [`StructuredGrid`] whose samples are terrain heights.
//! Whether it acts as the reference or the actual surface of a comparison is
//! decided by argument position in the consuming API, not by the type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GridResult;
use crate::grid::StructuredGrid;

/// A terrain surface sampled on a regular grid.
///
/// The surface owns its grid by value; cloning produces an independent
/// copy, so two computations can never alias the same height data.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use terrain_types::Surface;
///
/// // A 2x2 height field, one metre post spacing, flat at 100 m.
/// let surface = Surface::flat(
///     2,
///     2,
///     Point3::origin(),
///     Vector3::new(1.0, 1.0, 1.0),
///     100.0,
/// ).unwrap();
///
/// assert!((surface.height_at(1, 1).unwrap() - 100.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surface {
    grid: StructuredGrid,
}

impl Surface {
    /// Wrap an existing grid as a surface.
    #[inline]
    #[must_use]
    pub const fn from_grid(grid: StructuredGrid) -> Self {
        Self { grid }
    }

    /// Create a 2-D height field from a flat buffer of heights.
    ///
    /// The grid is `nx` by `ny` posts with a single layer (`nz = 1`);
    /// heights are ordered x-fastest: `heights[i + j*nx]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the buffer length is not
    /// `nx * ny`.
    pub fn from_heights(
        nx: usize,
        ny: usize,
        origin: Point3<f64>,
        spacing: Vector3<f64>,
        heights: Vec<f64>,
    ) -> GridResult<Self> {
        Ok(Self {
            grid: StructuredGrid::from_samples([nx, ny, 1], origin, spacing, heights)?,
        })
    }

    /// Create a 2-D height field with every post at the same height.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero.
    pub fn flat(
        nx: usize,
        ny: usize,
        origin: Point3<f64>,
        spacing: Vector3<f64>,
        height: f64,
    ) -> GridResult<Self> {
        Self::from_heights(nx, ny, origin, spacing, vec![height; nx * ny])
    }

    /// The underlying grid.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &StructuredGrid {
        &self.grid
    }

    /// Mutable access to the underlying grid.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut StructuredGrid {
        &mut self.grid
    }

    /// Consume the surface, returning the grid.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // destructor would run in const context
    pub fn into_grid(self) -> StructuredGrid {
        self.grid
    }

    /// Height of the post at `(i, j)` on the base layer.
    ///
    /// # Errors
    ///
    /// Returns an error if `(i, j)` lies outside the grid.
    #[inline]
    pub fn height_at(&self, i: usize, j: usize) -> GridResult<f64> {
        self.grid.sample(self.grid.point_id(i, j, 0))
    }

    /// Set the height of the post at `(i, j)` on the base layer.
    ///
    /// # Errors
    ///
    /// Returns an error if `(i, j)` lies outside the grid.
    #[inline]
    pub fn set_height(&mut self, i: usize, j: usize, height: f64) -> GridResult<()> {
        let id = self.grid.point_id(i, j, 0);
        self.grid.set_sample(id, height)
    }
}

impl From<StructuredGrid> for Surface {
    fn from(grid: StructuredGrid) -> Self {
        Self::from_grid(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_heights_row_major() {
        let surface = Surface::from_heights(
            2,
            2,
            Point3::origin(),
            Vector3::new(1.0, 1.0, 1.0),
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .expect("valid surface");
        assert!((surface.height_at(1, 0).expect("in bounds") - 2.0).abs() < f64::EPSILON);
        assert!((surface.height_at(0, 1).expect("in bounds") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_heights_rejects_bad_length() {
        let result = Surface::from_heights(
            2,
            2,
            Point3::origin(),
            Vector3::new(1.0, 1.0, 1.0),
            vec![1.0, 2.0, 3.0],
        );
        assert!(result.is_err());
    }

    #[test]
    fn set_height_round_trip() {
        let mut surface = Surface::flat(
            3,
            3,
            Point3::origin(),
            Vector3::new(1.0, 1.0, 1.0),
            0.0,
        )
        .expect("valid surface");
        surface.set_height(2, 1, 42.0).expect("in bounds");
        assert!((surface.height_at(2, 1).expect("in bounds") - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clone_is_independent() {
        let mut surface = Surface::flat(
            2,
            2,
            Point3::origin(),
            Vector3::new(1.0, 1.0, 1.0),
            5.0,
        )
        .expect("valid surface");
        let copy = surface.clone();
        surface.set_height(0, 0, -5.0).expect("in bounds");
        assert!((copy.height_at(0, 0).expect("in bounds") - 5.0).abs() < f64::EPSILON);
    }
}
