//! Alignment of two surfaces onto a common iteration region.
//!
//! Two height fields may share neither origin nor extent. The intersector
//! finds the lattice region where both are defined, expressed in each
//! grid's own index space, so the accumulator can advance both index
//! triples in lockstep.

use nalgebra::Point3;
use terrain_types::Surface;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{VolumeError, VolumeResult};

/// The common iteration region of two grids.
///
/// `ref_origin` and `act_origin` are the indices of the shared origin in
/// the reference and actual grid respectively; `upper_bound` is exclusive
/// and expressed in reference index space. A cell `(i, j)` of the region
/// maps to `(i - ref_origin + act_origin, j - ...)` on the actual grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridIntersection {
    /// Index of the common origin in the reference grid.
    pub ref_origin: [usize; 3],
    /// Index of the common origin in the actual grid.
    pub act_origin: [usize; 3],
    /// Exclusive upper bound of the region, in reference index space.
    pub upper_bound: [usize; 3],
}

impl GridIntersection {
    /// Number of lattice points in the region along each axis.
    #[must_use]
    pub const fn extent(&self) -> [usize; 3] {
        [
            self.upper_bound[0] - self.ref_origin[0],
            self.upper_bound[1] - self.ref_origin[1],
            self.upper_bound[2] - self.ref_origin[2],
        ]
    }
}

/// Compute the common iteration region of two surfaces.
///
/// The shared origin is the componentwise maximum of the two grid origins;
/// the upper bound along each axis is the smaller of the two remaining
/// extents, shifted back into reference index space. Recomputed from the
/// surfaces on every call; nothing is cached.
///
/// # Errors
///
/// Returns [`VolumeError::EmptyIntersection`] if the region is empty along
/// any axis.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use terrain_types::Surface;
/// use terrain_volume::intersect;
///
/// let spacing = Vector3::new(1.0, 1.0, 1.0);
/// let reference = Surface::flat(4, 4, Point3::origin(), spacing, 0.0).unwrap();
/// let actual = Surface::flat(4, 4, Point3::new(2.0, 1.0, 0.0), spacing, 0.0).unwrap();
///
/// let region = intersect(&reference, &actual).unwrap();
/// assert_eq!(region.ref_origin, [2, 1, 0]);
/// assert_eq!(region.act_origin, [0, 0, 0]);
/// assert_eq!(region.upper_bound, [4, 4, 1]);
/// ```
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn intersect(reference: &Surface, actual: &Surface) -> VolumeResult<GridIntersection> {
    let ref_grid = reference.grid();
    let act_grid = actual.grid();

    let common = common_origin(&ref_grid.origin(), &act_grid.origin());
    let ro = ref_grid.find_closest_index(&common);
    let ao = act_grid.find_closest_index(&common);

    let rd = ref_grid.dimensions();
    let ad = act_grid.dimensions();

    let mut ref_origin = [0_usize; 3];
    let mut act_origin = [0_usize; 3];
    let mut upper_bound = [0_usize; 3];
    for axis in 0..3 {
        // The common origin is >= both grid origins, so the closest indices
        // are non-negative up to floating error.
        let ro_axis = ro[axis].max(0);
        let ao_axis = ao[axis].max(0);
        let lub = i64::min(
            rd[axis] as i64 - ro_axis,
            ad[axis] as i64 - ao_axis,
        ) + ro_axis;
        if lub <= ro_axis {
            return Err(VolumeError::EmptyIntersection);
        }
        ref_origin[axis] = ro_axis as usize;
        act_origin[axis] = ao_axis as usize;
        upper_bound[axis] = lub as usize;
    }

    Ok(GridIntersection {
        ref_origin,
        act_origin,
        upper_bound,
    })
}

/// Check that two surfaces use identical spacing on every axis.
///
/// Exact comparison; matching x/y spacing is a documented precondition of
/// the volume computation, left to the caller to enforce.
#[must_use]
pub fn spacing_matches(reference: &Surface, actual: &Surface) -> bool {
    reference.grid().spacing() == actual.grid().spacing()
}

/// Componentwise maximum of the two origins.
fn common_origin(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
