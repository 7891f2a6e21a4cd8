//! Tetrahedral decomposition of cell volumes.
//!
//! Each grid cell lifts its rectangular footprint from the reference
//! surface to the actual surface, forming an 8-vertex hexahedron. The
//! canonical footprint ordering is counter-clockwise `a, b, c, d` at local
//! coordinates `(0,0), (sx,0), (sx,sy), (0,sy)`; base vertex `c` (index
//! 0..3) carries the reference height and pairs vertically with top vertex
//! `c + 4` at the actual height.
//!
//! Cells entirely above or below the reference decompose into five fixed
//! tetrahedra. Mixed cells split into an above and a below prism, each a
//! slab plus a remainder keyed by how many reduced posts are exactly zero.

use nalgebra::Point3;

use crate::classify::{classify, corner_heights, CellClass};
use crate::error::{VolumeError, VolumeResult};

/// Above/below volume split of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellVolume {
    /// Volume of the cell lying above the reference surface.
    pub above: f64,
    /// Volume of the cell lying below the reference surface.
    pub below: f64,
}

impl CellVolume {
    /// A cell with no volume on either side.
    pub const ZERO: Self = Self {
        above: 0.0,
        below: 0.0,
    };

    /// Total volume regardless of side.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.above + self.below
    }
}

/// Corner tetrahedra of the canonical hexahedron decomposition.
///
/// With base indices 0..3 and top indices 4..7, cutting the four corners
/// off the hexahedron leaves the core [`CORE_TET`]. Each quadruple lists
/// the apex vertex first; edge vectors run from it to the other three.
const CORNER_TETS: [[usize; 4]; 4] = [
    [0, 2, 1, 5],
    [0, 2, 3, 7],
    [5, 7, 6, 2],
    [5, 7, 4, 0],
];

/// Core tetrahedron remaining after the four corners are cut off.
const CORE_TET: [usize; 4] = [0, 2, 5, 7];

/// Corner-tetrahedra selection for a remainder with one zero post, keyed
/// by which post is zero. Entries index into [`CORNER_TETS`]; the core
/// tetrahedron is always added.
const ONE_ZERO_SETS: [[usize; 3]; 4] = [[0, 1, 2], [1, 2, 3], [0, 1, 3], [0, 2, 3]];

/// Two-tetrahedra decompositions for a remainder with one nonzero post,
/// keyed by which post is nonzero.
const ONE_POST_TETS: [[[usize; 4]; 2]; 4] = [
    [[2, 1, 0, 4], [2, 3, 0, 4]],
    [[3, 0, 1, 5], [3, 2, 1, 5]],
    [[0, 1, 2, 6], [0, 3, 2, 6]],
    [[1, 2, 3, 7], [1, 0, 3, 7]],
];

/// Valley decomposition for zero posts on the `a`/`c` diagonal.
const VALLEY_AC_TETS: [[usize; 4]; 2] = [[0, 2, 1, 5], [0, 2, 3, 7]];

/// Valley decomposition for zero posts on the `b`/`d` diagonal.
const VALLEY_BD_TETS: [[usize; 4]; 2] = [[1, 3, 0, 4], [1, 3, 2, 6]];

/// Volume of a tetrahedron given its four vertices.
///
/// `|u . (v x w)| / 6` with `u, v, w` the edge vectors from `a`.
fn tetra_volume(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, d: Point3<f64>) -> f64 {
    let u = b - a;
    let v = c - a;
    let w = d - a;
    (u.dot(&v.cross(&w)) / 6.0).abs()
}

/// The 8 local vertices of a cell: footprint corners with base and top heights.
fn cell_vertices(base: &[f64; 4], top: &[f64; 4], sx: f64, sy: f64) -> [Point3<f64>; 8] {
    [
        Point3::new(0.0, 0.0, base[0]),
        Point3::new(sx, 0.0, base[1]),
        Point3::new(sx, sy, base[2]),
        Point3::new(0.0, sy, base[3]),
        Point3::new(0.0, 0.0, top[0]),
        Point3::new(sx, 0.0, top[1]),
        Point3::new(sx, sy, top[2]),
        Point3::new(0.0, sy, top[3]),
    ]
}

/// Sum the volumes of the tetrahedra named by `sets` over `vertices`.
fn tetra_sum(vertices: &[Point3<f64>; 8], sets: &[[usize; 4]]) -> f64 {
    sets.iter()
        .map(|t| tetra_volume(vertices[t[0]], vertices[t[1]], vertices[t[2]], vertices[t[3]]))
        .sum()
}

/// Exact volume of a full hexahedral cell via five tetrahedra.
///
/// Used for cells whose posts all lie on the same side of the reference
/// surface; the caller assigns the result wholly above or below. The base
/// need not be planar.
///
/// # Example
///
/// ```
/// use terrain_volume::hexahedron_volume;
///
/// // Flat base at 0, flat top at 2, over a 3x4 footprint.
/// let v = hexahedron_volume(&[0.0; 4], &[2.0; 4], 3.0, 4.0);
/// assert!((v - 24.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn hexahedron_volume(base: &[f64; 4], top: &[f64; 4], sx: f64, sy: f64) -> f64 {
    let vertices = cell_vertices(base, top, sx, sy);
    tetra_sum(&vertices, &CORNER_TETS) + tetra_sum(&vertices, &[CORE_TET])
}

/// Closed-form wedge volume over two nonzero posts sharing a footprint edge.
fn wedge_volume(h0: f64, h1: f64, sx: f64, sy: f64) -> f64 {
    let (lo, hi) = if h0 < h1 { (h0, h1) } else { (h1, h0) };
    sx * sy * ((hi - lo) / 3.0 + lo / 2.0)
}

/// Volume of a degenerate prism standing on the cell footprint.
///
/// The prism is a slab of height `min(heights)` plus a remainder whose
/// reduced posts have at least one exact zero. The remainder decomposes by
/// zero count: corner tetrahedra plus the core for a single zero, a
/// closed-form wedge for adjacent zeros, a two-tetrahedron pair for
/// diagonal zeros or a single nonzero post.
///
/// Diagonal zeros are ambiguous between a "valley" and a "ridge" reading of
/// the saddle; the valley decomposition is always used. This is a known
/// approximation for saddle-shaped cells, kept as the contract default.
///
/// The result is always non-negative, and zero when all posts are equal
/// (including all-zero).
///
/// # Errors
///
/// Returns [`VolumeError::InvalidCornerConfiguration`] if no reduced post
/// is zero, which cannot happen when the minimum is subtracted exactly.
///
/// # Example
///
/// ```
/// use terrain_volume::prism_volume;
///
/// // Two posts at 0, two at 3 across an edge: a triangular wedge.
/// let v = prism_volume(&[0.0, 0.0, 3.0, 3.0], 1.0, 1.0).unwrap();
/// assert!((v - 1.5).abs() < 1e-12);
/// ```
pub fn prism_volume(heights: &[f64; 4], sx: f64, sy: f64) -> VolumeResult<f64> {
    if is_constant(heights) {
        return Ok(0.0);
    }

    let h_min = heights.iter().fold(heights[0], |m, &h| m.min(h));
    let slab = h_min.abs() * sx * sy;

    let reduced = [
        heights[0] - h_min,
        heights[1] - h_min,
        heights[2] - h_min,
        heights[3] - h_min,
    ];
    let zeros = [
        reduced[0] == 0.0,
        reduced[1] == 0.0,
        reduced[2] == 0.0,
        reduced[3] == 0.0,
    ];
    let zero_count = zeros.iter().filter(|&&z| z).count();

    if zero_count == 4 {
        // Flat remainder.
        return Ok(slab);
    }
    if zero_count == 0 {
        // Cannot arise from subtracting the minimum.
        return Err(VolumeError::InvalidCornerConfiguration);
    }

    let vertices = cell_vertices(&[0.0; 4], &reduced, sx, sy);
    let remainder = match zero_count {
        1 => {
            let corner = zeros.iter().position(|&z| z).unwrap_or(0);
            let corner_sum: f64 = ONE_ZERO_SETS[corner]
                .iter()
                .map(|&t| tetra_sum(&vertices, &[CORNER_TETS[t]]))
                .sum();
            corner_sum + tetra_sum(&vertices, &[CORE_TET])
        }
        2 => {
            if zeros[0] && zeros[2] {
                tetra_sum(&vertices, &VALLEY_AC_TETS)
            } else if zeros[1] && zeros[3] {
                tetra_sum(&vertices, &VALLEY_BD_TETS)
            } else {
                let (h0, h1) = if zeros[0] && zeros[1] {
                    (reduced[2], reduced[3])
                } else if zeros[1] && zeros[2] {
                    (reduced[0], reduced[3])
                } else if zeros[2] && zeros[3] {
                    (reduced[0], reduced[1])
                } else {
                    (reduced[2], reduced[1])
                };
                wedge_volume(h0, h1, sx, sy)
            }
        }
        _ => {
            let post = zeros.iter().position(|&z| !z).unwrap_or(0);
            tetra_sum(&vertices, &ONE_POST_TETS[post])
        }
    };

    Ok(slab + remainder)
}

/// Above/below volume of one cell as a pure function of its corner heights.
///
/// `base` and `top` are the reference and actual heights at the four
/// footprint corners in canonical order. Cells entirely on one side use the
/// exact hexahedron decomposition; mixed cells split each post's difference
/// into a non-negative above part and below part and measure the two
/// resulting prisms independently. A constant part (including all-zero)
/// contributes nothing.
///
/// # Errors
///
/// Propagates [`VolumeError::InvalidCornerConfiguration`] from the prism
/// decomposition; unreachable for inputs built from real corner heights.
///
/// # Example
///
/// ```
/// use terrain_volume::cell_volume;
///
/// // Reference flat at 100, actual flat at 110: a 10-unit slab above.
/// let v = cell_volume(&[100.0; 4], &[110.0; 4], 1.0, 1.0).unwrap();
/// assert!((v.above - 10.0).abs() < 1e-12);
/// assert!(v.below.abs() < 1e-12);
/// ```
pub fn cell_volume(base: &[f64; 4], top: &[f64; 4], sx: f64, sy: f64) -> VolumeResult<CellVolume> {
    let heights = corner_heights(base, top);
    match classify(&heights) {
        CellClass::AllEqual => Ok(CellVolume::ZERO),
        CellClass::AllAbove => Ok(CellVolume {
            above: hexahedron_volume(base, top, sx, sy),
            below: 0.0,
        }),
        CellClass::AllBelow => Ok(CellVolume {
            above: 0.0,
            below: hexahedron_volume(base, top, sx, sy),
        }),
        CellClass::Mixed => {
            // Split every post into its above and below part; a constant
            // part (necessarily all-zero here) measures zero.
            let ha = heights.map(|h| h.max(0.0));
            let hb = heights.map(|h| (-h).max(0.0));
            Ok(CellVolume {
                above: prism_volume(&ha, sx, sy)?,
                below: prism_volume(&hb, sx, sy)?,
            })
        }
    }
}

/// Check whether all four posts are equal.
fn is_constant(heights: &[f64; 4]) -> bool {
    heights[0] == heights[1] && heights[1] == heights[2] && heights[2] == heights[3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tetra_volume_unit_corner() {
        // Right tetrahedron on the unit axes: volume 1/6.
        let v = tetra_volume(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert_relative_eq!(v, 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn hexahedron_volume_nonplanar_base() {
        // Base posts 0,0,1,1 and top flat at 3 over a unit footprint: the
        // solid is a unit slab of height 3 minus a wedge of volume 1/2.
        let v = hexahedron_volume(&[0.0, 0.0, 1.0, 1.0], &[3.0; 4], 1.0, 1.0);
        assert_relative_eq!(v, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn prism_constant_posts_measure_zero() {
        for h in [0.0, 2.0, -3.5] {
            let v = prism_volume(&[h; 4], 1.5, 2.0).expect("valid posts");
            assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn prism_one_zero_post() {
        // Three corner tetrahedra plus the core. The core tetrahedron
        // spans the a-c diagonal, so the two diagonals measure differently:
        // 5H/6 with the zero on a or c, 2H/3 with the zero on b or d.
        let h = 2.0;
        for heights in [[0.0, h, h, h], [h, h, 0.0, h]] {
            let v = prism_volume(&heights, 1.0, 1.0).expect("valid posts");
            assert_relative_eq!(v, 5.0 * h / 6.0, epsilon = 1e-12);
        }
        for heights in [[h, 0.0, h, h], [h, h, h, 0.0]] {
            let v = prism_volume(&heights, 1.0, 1.0).expect("valid posts");
            assert_relative_eq!(v, 2.0 * h / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn prism_adjacent_zeros_wedge() {
        let h = 4.0;
        for heights in [
            [0.0, 0.0, h, h],
            [h, 0.0, 0.0, h],
            [h, h, 0.0, 0.0],
            [0.0, h, h, 0.0],
        ] {
            let v = prism_volume(&heights, 1.0, 1.0).expect("valid posts");
            assert_relative_eq!(v, h / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn prism_uneven_wedge() {
        // Nonzero posts 1 and 3: (3-1)/3 + 1/2 over a unit footprint.
        let v = prism_volume(&[0.0, 0.0, 1.0, 3.0], 1.0, 1.0).expect("valid posts");
        assert_relative_eq!(v, 2.0 / 3.0 + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn prism_diagonal_zeros_valley() {
        // Saddle posts: the valley reading yields two opposite
        // quarter-pyramids, H/3 over a unit footprint.
        let h = 3.0;
        let v = prism_volume(&[h, 0.0, h, 0.0], 1.0, 1.0).expect("valid posts");
        assert_relative_eq!(v, h / 3.0, epsilon = 1e-12);

        let v = prism_volume(&[0.0, h, 0.0, h], 1.0, 1.0).expect("valid posts");
        assert_relative_eq!(v, h / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn prism_single_post_pyramid() {
        let h = 6.0;
        for heights in [
            [h, 0.0, 0.0, 0.0],
            [0.0, h, 0.0, 0.0],
            [0.0, 0.0, h, 0.0],
            [0.0, 0.0, 0.0, h],
        ] {
            let v = prism_volume(&heights, 1.0, 1.0).expect("valid posts");
            assert_relative_eq!(v, h / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn prism_negative_minimum_adds_slab() {
        // h_min = -1 contributes |h_min| as a slab; remainder is the
        // [0, 0, 2, 2] wedge.
        let v = prism_volume(&[-1.0, -1.0, 1.0, 1.0], 1.0, 1.0).expect("valid posts");
        assert_relative_eq!(v, 1.0 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn prism_never_negative() {
        let cases = [
            [0.0, 1.0, 2.0, 3.0],
            [5.0, 0.1, 3.3, 0.1],
            [-2.0, -4.0, -1.0, -3.0],
            [1e-9, 0.0, 1e9, 2.0],
        ];
        for heights in cases {
            let v = prism_volume(&heights, 0.7, 1.3).expect("valid posts");
            assert!(v >= 0.0, "negative volume for {heights:?}");
        }
    }

    #[test]
    fn cell_volume_all_above_matches_hexahedron() {
        let base = [100.0, 101.0, 99.5, 100.5];
        let top = [110.0, 111.0, 112.0, 113.0];
        let cell = cell_volume(&base, &top, 2.0, 2.0).expect("valid cell");
        assert_relative_eq!(
            cell.above,
            hexahedron_volume(&base, &top, 2.0, 2.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(cell.below, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cell_volume_all_below_mirrors_above() {
        let base = [100.0; 4];
        let top = [90.0, 91.0, 92.0, 93.0];
        let cell = cell_volume(&base, &top, 1.0, 1.0).expect("valid cell");
        assert_relative_eq!(cell.above, 0.0, epsilon = 1e-12);
        assert!(cell.below > 0.0);

        // Swapping the surfaces swaps the components exactly.
        let swapped = cell_volume(&top, &base, 1.0, 1.0).expect("valid cell");
        assert_relative_eq!(swapped.above, cell.below, epsilon = 1e-12);
        assert_relative_eq!(swapped.below, cell.above, epsilon = 1e-12);
    }

    #[test]
    fn cell_volume_all_equal_is_zero() {
        let cell = cell_volume(&[7.0; 4], &[7.0; 4], 1.0, 1.0).expect("valid cell");
        assert_eq!(cell, CellVolume::ZERO);
    }

    #[test]
    fn cell_volume_mixed_splits_sides() {
        // Three posts 10 above, one 10 below.
        let base = [100.0; 4];
        let top = [110.0, 110.0, 110.0, 90.0];
        let cell = cell_volume(&base, &top, 1.0, 1.0).expect("valid cell");
        assert!(cell.above > 0.0);
        assert!(cell.below > 0.0);
        // Above prism [10, 10, 10, 0] (zero on d), below prism [0, 0, 0, 10].
        assert_relative_eq!(cell.above, 2.0 * 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cell.below, 10.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn cell_volume_mixed_with_equal_post() {
        // A coincident post zeroes one corner of both prisms.
        let base = [100.0; 4];
        let top = [100.0, 110.0, 110.0, 90.0];
        let cell = cell_volume(&base, &top, 1.0, 1.0).expect("valid cell");
        assert!(cell.above > 0.0);
        assert!(cell.below > 0.0);
    }

    #[test]
    fn prism_rejects_no_zero_after_reduction() {
        // Unreachable through cell_volume; direct calls must not panic.
        // Subtracting the minimum always leaves an exact zero for ordered
        // inputs, so force the error with posts that never compare equal.
        let v = prism_volume(&[f64::NAN; 4], 1.0, 1.0);
        assert_eq!(v, Err(VolumeError::InvalidCornerConfiguration));
    }
}
