//! Regular-lattice structured grid.
//!
//! A [`StructuredGrid`] stores scalar samples on an axis-aligned lattice
//! defined by dimensions, an origin and a per-axis spacing. Samples live in
//! a flat buffer indexed `id = i + j*stride_x + k*stride_y`.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A regular axis-aligned lattice of scalar samples.
///
/// The grid owns its sample buffer; cloning a grid yields a fully
/// independent copy.
///
/// # Index Arithmetic
///
/// Point ids are flat indices `i + j*nx + k*nx*ny`. [`point_id`] performs no
/// bounds checking; pair it with [`check_point_bounds`] when indices come
/// from outside the grid.
///
/// [`point_id`]: StructuredGrid::point_id
/// [`check_point_bounds`]: StructuredGrid::check_point_bounds
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use terrain_types::StructuredGrid;
///
/// let grid = StructuredGrid::new(
///     [3, 3, 1],
///     Point3::origin(),
///     Vector3::new(1.0, 1.0, 1.0),
/// ).unwrap();
///
/// assert_eq!(grid.point_count(), 9);
/// assert_eq!(grid.cell_count(), 4);
/// assert_eq!(grid.point_id(1, 2, 0), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructuredGrid {
    dimensions: [usize; 3],
    origin: Point3<f64>,
    spacing: Vector3<f64>,
    /// Running products of dimensions: `[nx, nx*ny, nx*ny*nz]`.
    point_stride: [usize; 3],
    /// Running products of `dimensions - 1`.
    cell_stride: [usize; 3],
    samples: Vec<f64>,
}

impl StructuredGrid {
    /// Create a grid with all samples set to zero.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if any dimension is zero.
    pub fn new(
        dimensions: [usize; 3],
        origin: Point3<f64>,
        spacing: Vector3<f64>,
    ) -> GridResult<Self> {
        let (point_stride, cell_stride) = strides(dimensions)?;
        let samples = vec![0.0; point_stride[2]];
        Ok(Self {
            dimensions,
            origin,
            spacing,
            point_stride,
            cell_stride,
            samples,
        })
    }

    /// Create a grid from an existing flat sample buffer.
    ///
    /// Samples are ordered x-fastest: `id = i + j*nx + k*nx*ny`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if any dimension is zero, or
    /// [`GridError::SampleCountMismatch`] if `samples.len() != nx*ny*nz`.
    pub fn from_samples(
        dimensions: [usize; 3],
        origin: Point3<f64>,
        spacing: Vector3<f64>,
        samples: Vec<f64>,
    ) -> GridResult<Self> {
        let (point_stride, cell_stride) = strides(dimensions)?;
        if samples.len() != point_stride[2] {
            return Err(GridError::sample_count_mismatch(
                point_stride[2],
                samples.len(),
            ));
        }
        Ok(Self {
            dimensions,
            origin,
            spacing,
            point_stride,
            cell_stride,
            samples,
        })
    }

    /// Resize the grid, recomputing strides and zero-filling the samples.
    ///
    /// Existing samples are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if any dimension is zero.
    pub fn set_dimensions(&mut self, dimensions: [usize; 3]) -> GridResult<()> {
        let (point_stride, cell_stride) = strides(dimensions)?;
        self.dimensions = dimensions;
        self.point_stride = point_stride;
        self.cell_stride = cell_stride;
        self.samples.clear();
        self.samples.resize(point_stride[2], 0.0);
        Ok(())
    }

    /// Grid dimensions `[nx, ny, nz]`.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// World coordinates of the lattice point `(0, 0, 0)`.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Per-axis lattice spacing.
    #[inline]
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// Total number of lattice points.
    #[inline]
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.point_stride[2]
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_stride[2]
    }

    /// Flat point id for lattice indices `(i, j, k)`.
    ///
    /// No bounds checking is performed; out-of-range indices produce an id
    /// that [`sample`](Self::sample) will reject.
    #[inline]
    #[must_use]
    pub const fn point_id(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.point_stride[0] + k * self.point_stride[1]
    }

    /// Flat cell id for cell indices `(i, j, k)`.
    ///
    /// No bounds checking is performed.
    #[inline]
    #[must_use]
    pub const fn cell_id(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.cell_stride[0] + k * self.cell_stride[1]
    }

    /// Lattice indices `(i, j, k)` of a flat point id.
    ///
    /// Inverse of [`point_id`](Self::point_id) for in-bounds ids.
    #[inline]
    #[must_use]
    pub const fn point_coord(&self, id: usize) -> [usize; 3] {
        [
            id % self.dimensions[0],
            (id / self.dimensions[0]) % self.dimensions[1],
            id / (self.dimensions[0] * self.dimensions[1]),
        ]
    }

    /// Cell indices `(i, j, k)` of a flat cell id.
    ///
    /// Inverse of [`cell_id`](Self::cell_id) for in-bounds ids.
    ///
    /// # Panics
    ///
    /// Panics on grids with no cells along the x or y axis (`nx == 1` or
    /// `ny == 1`), where cell ids do not exist.
    #[inline]
    #[must_use]
    pub const fn cell_coord(&self, id: usize) -> [usize; 3] {
        let cx = self.dimensions[0] - 1;
        let cy = self.dimensions[1] - 1;
        [id % cx, (id / cx) % cy, id / (cx * cy)]
    }

    /// Check that signed lattice indices name a point inside the grid.
    #[inline]
    #[must_use]
    pub fn check_point_bounds(&self, i: i64, j: i64, k: i64) -> bool {
        let ijk = [i, j, k];
        (0..3).all(|axis| ijk[axis] >= 0 && (ijk[axis] as usize) < self.dimensions[axis])
    }

    /// The 8 corner point ids of the cell at `(i, j, k)`.
    ///
    /// Corners are ordered `[o, +x, +y, +x+y, +z, +x+z, +y+z, +x+y+z]`
    /// relative to the cell's lower corner. At the upper boundary of an
    /// axis (`i == nx-1` etc.) the ids on the far side are duplicated from
    /// the lower side, yielding a pinched ghost cell of zero volume.
    #[must_use]
    pub fn corner_ids(&self, i: usize, j: usize, k: usize) -> [usize; 8] {
        let o = self.point_id(i, j, k);
        let sx = self.point_stride[0];
        let sy = self.point_stride[1];
        let mut ids = [
            o,
            o + 1,
            o + sx,
            o + sx + 1,
            o + sy,
            o + sy + 1,
            o + sy + sx,
            o + sy + sx + 1,
        ];
        if i == self.dimensions[0] - 1 {
            ids[1] = ids[0];
            ids[3] = ids[2];
            ids[5] = ids[4];
            ids[7] = ids[6];
        }
        if j == self.dimensions[1] - 1 {
            ids[2] = ids[0];
            ids[3] = ids[1];
            ids[6] = ids[4];
            ids[7] = ids[5];
        }
        if k == self.dimensions[2] - 1 {
            ids[4] = ids[0];
            ids[5] = ids[1];
            ids[6] = ids[2];
            ids[7] = ids[3];
        }
        ids
    }

    /// Sample value at a flat point id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfBounds`] if `id` is not a valid point.
    #[inline]
    pub fn sample(&self, id: usize) -> GridResult<f64> {
        self.samples
            .get(id)
            .copied()
            .ok_or_else(|| GridError::index_out_of_bounds(id, self.samples.len()))
    }

    /// Set the sample value at a flat point id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfBounds`] if `id` is not a valid point.
    #[inline]
    pub fn set_sample(&mut self, id: usize, value: f64) -> GridResult<()> {
        let len = self.samples.len();
        match self.samples.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(GridError::index_out_of_bounds(id, len)),
        }
    }

    /// Raw sample buffer, x-fastest ordering.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Lattice indices of the structured point closest below a world point.
    ///
    /// Computed as `trunc((coord - origin) / spacing)` per axis. Truncation,
    /// not rounding: the result is the index of the cell containing the
    /// point for coordinates at or right of the origin. Indices may lie
    /// outside the grid (including negative values); check with
    /// [`check_point_bounds`](Self::check_point_bounds) before indexing.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn find_closest_index(&self, point: &Point3<f64>) -> [i64; 3] {
        [
            ((point.x - self.origin.x) / self.spacing.x) as i64,
            ((point.y - self.origin.y) / self.spacing.y) as i64,
            ((point.z - self.origin.z) / self.spacing.z) as i64,
        ]
    }
}

/// Compute point and cell stride products, validating dimensions.
fn strides(dimensions: [usize; 3]) -> GridResult<([usize; 3], [usize; 3])> {
    if dimensions.iter().any(|&d| d < 1) {
        return Err(GridError::invalid_dimensions(dimensions));
    }
    let [nx, ny, nz] = dimensions;
    let point = [nx, nx * ny, nx * ny * nz];
    let cell = [nx - 1, (nx - 1) * (ny - 1), (nx - 1) * (ny - 1) * (nz - 1)];
    Ok((point, cell))
}
