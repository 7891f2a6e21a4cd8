//! Volume accumulation across the common region of two surfaces.
//!
//! The calculator walks the x/y cells of the grid intersection in
//! lockstep on both surfaces, measures each cell with the tetrahedral
//! decomposition, applies the filter chain and selector policy, and sums
//! the retained volumes.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use terrain_types::{Point3, Surface};

use crate::classify::{classify, corner_heights, CellClass};
use crate::decompose::{cell_volume, CellVolume};
use crate::error::VolumeResult;
use crate::filter::FilterChain;
use crate::intersect::{intersect, GridIntersection};
use crate::params::{CuboidSelector, VolumeParams};
use crate::result::{CellRecord, VolumeSummary};

/// Footprint permutation from grid corner order `[o, +x, +y, +x+y]` to the
/// canonical counter-clockwise ordering `a, b, c, d`.
const FOOTPRINT_PERM: [usize; 4] = [0, 1, 3, 2];

/// Cut/fill volume calculator over a reference and an actual surface.
///
/// Surfaces are copied in; the calculator never aliases caller-owned
/// height data, so the same surfaces can feed several calculators.
/// Parameters persist across calls until changed.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use terrain_types::Surface;
/// use terrain_volume::VolumeCalculator;
///
/// let spacing = Vector3::new(1.0, 1.0, 1.0);
/// let reference = Surface::flat(2, 2, Point3::origin(), spacing, 100.0).unwrap();
/// let actual = Surface::flat(2, 2, Point3::origin(), spacing, 110.0).unwrap();
///
/// let summary = VolumeCalculator::new(&reference, &actual)
///     .calculate()
///     .unwrap();
/// assert!((summary.volume_above - 10.0).abs() < 1e-9);
/// assert!(summary.volume_below.abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct VolumeCalculator {
    reference: Surface,
    actual: Surface,
    params: VolumeParams,
}

impl VolumeCalculator {
    /// Create a calculator over copies of the two surfaces.
    #[must_use]
    pub fn new(reference: &Surface, actual: &Surface) -> Self {
        Self {
            reference: reference.clone(),
            actual: actual.clone(),
            params: VolumeParams::default(),
        }
    }

    /// Replace the parameter set.
    #[must_use]
    pub fn with_params(mut self, params: VolumeParams) -> Self {
        self.params = params;
        self
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &VolumeParams {
        &self.params
    }

    /// Replace the parameter set in place.
    pub fn set_params(&mut self, params: VolumeParams) {
        self.params = params;
    }

    /// Replace the reference surface with a copy of `surface`.
    pub fn set_reference_surface(&mut self, surface: &Surface) {
        self.reference = surface.clone();
    }

    /// Replace the actual surface with a copy of `surface`.
    pub fn set_actual_surface(&mut self, surface: &Surface) {
        self.actual = surface.clone();
    }

    /// Overwrite the actual surface with the reference surface.
    pub fn copy_reference_to_actual(&mut self) {
        self.actual = self.reference.clone();
    }

    /// Overwrite the reference surface with the actual surface.
    pub fn copy_actual_to_reference(&mut self) {
        self.reference = self.actual.clone();
    }

    /// The reference surface.
    #[must_use]
    pub const fn reference(&self) -> &Surface {
        &self.reference
    }

    /// The actual surface.
    #[must_use]
    pub const fn actual(&self) -> &Surface {
        &self.actual
    }

    /// Accumulate cut/fill volumes over the common region.
    ///
    /// Deterministic: repeated calls on unmodified surfaces return
    /// identical results.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::EmptyIntersection`](crate::VolumeError::EmptyIntersection)
    /// if the surfaces share no region, or a grid error if a surface is
    /// inconsistent.
    pub fn calculate(&self) -> VolumeResult<VolumeSummary> {
        run(&self.reference, &self.actual, &self.params, None)
    }

    /// Accumulate volumes, emitting a [`CellRecord`] for every cell that
    /// passes the filters and is admitted by the selector.
    ///
    /// The record carries world-coordinate vertices for downstream mesh or
    /// visualisation construction. Totals are identical to
    /// [`calculate`](Self::calculate).
    ///
    /// # Errors
    ///
    /// As for [`calculate`](Self::calculate).
    pub fn calculate_with<F>(&self, mut sink: F) -> VolumeResult<VolumeSummary>
    where
        F: FnMut(&CellRecord),
    {
        run(&self.reference, &self.actual, &self.params, Some(&mut sink))
    }

    /// Accumulate volumes with rows processed in parallel.
    ///
    /// Per-cell results are independent, so rows are mapped across threads
    /// and partial sums merged in row order. Totals match
    /// [`calculate`](Self::calculate) up to floating-point summation
    /// order; counters match exactly.
    ///
    /// # Errors
    ///
    /// As for [`calculate`](Self::calculate).
    pub fn calculate_parallel(&self) -> VolumeResult<VolumeSummary> {
        let region = intersect(&self.reference, &self.actual)?;
        debug!(?region, "grid intersection computed");

        let chain = FilterChain::new(&self.params);
        let partials = (region.ref_origin[0]..region.upper_bound[0])
            .into_par_iter()
            .map(|i| accumulate_row(&self.reference, &self.actual, &chain, self.params.selector, &region, i, None))
            .collect::<VolumeResult<Vec<_>>>()?;

        let mut summary = VolumeSummary::default();
        for partial in &partials {
            summary.merge(partial);
        }
        info!(
            volume_above = summary.volume_above,
            volume_below = summary.volume_below,
            cells = summary.cells_evaluated,
            "volume accumulation complete"
        );
        Ok(summary)
    }
}

/// Convenience wrapper: accumulate volumes over two surfaces.
///
/// Equivalent to building a [`VolumeCalculator`] with `params` and calling
/// [`calculate`](VolumeCalculator::calculate), without copying the
/// surfaces.
///
/// # Errors
///
/// As for [`VolumeCalculator::calculate`].
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use terrain_types::Surface;
/// use terrain_volume::{calculate_volume, VolumeParams};
///
/// let spacing = Vector3::new(1.0, 1.0, 1.0);
/// let reference = Surface::flat(2, 2, Point3::origin(), spacing, 100.0).unwrap();
/// let actual = Surface::flat(2, 2, Point3::origin(), spacing, 110.0).unwrap();
///
/// let summary = calculate_volume(&reference, &actual, &VolumeParams::default()).unwrap();
/// assert!((summary.volume_above - 10.0).abs() < 1e-9);
/// ```
pub fn calculate_volume(
    reference: &Surface,
    actual: &Surface,
    params: &VolumeParams,
) -> VolumeResult<VolumeSummary> {
    run(reference, actual, params, None)
}

/// Sequential accumulation over the intersection region.
fn run(
    reference: &Surface,
    actual: &Surface,
    params: &VolumeParams,
    mut sink: Option<&mut (dyn FnMut(&CellRecord) + '_)>,
) -> VolumeResult<VolumeSummary> {
    let region = intersect(reference, actual)?;
    debug!(?region, "grid intersection computed");

    let chain = FilterChain::new(params);
    let mut summary = VolumeSummary::default();
    for i in region.ref_origin[0]..region.upper_bound[0] {
        let row = accumulate_row(
            reference,
            actual,
            &chain,
            params.selector,
            &region,
            i,
            sink.as_deref_mut(),
        )?;
        summary.merge(&row);
    }
    info!(
        volume_above = summary.volume_above,
        volume_below = summary.volume_below,
        cells = summary.cells_evaluated,
        "volume accumulation complete"
    );
    Ok(summary)
}

/// Accumulate one x-row of cells.
fn accumulate_row(
    reference: &Surface,
    actual: &Surface,
    chain: &FilterChain<'_>,
    selector: CuboidSelector,
    region: &GridIntersection,
    i: usize,
    mut sink: Option<&mut (dyn FnMut(&CellRecord) + '_)>,
) -> VolumeResult<VolumeSummary> {
    let spacing = reference.grid().spacing();
    let act_i = i - region.ref_origin[0] + region.act_origin[0];

    let mut row = VolumeSummary::default();
    for j in region.ref_origin[1]..region.upper_bound[1] {
        let act_j = j - region.ref_origin[1] + region.act_origin[1];
        let ref_ids = reference.grid().corner_ids(i, j, region.ref_origin[2]);
        let act_ids = actual.grid().corner_ids(act_i, act_j, region.act_origin[2]);

        // Pinched boundary cells have no footprint and no volume.
        if is_ghost(&ref_ids) || is_ghost(&act_ids) {
            row.cells_skipped += 1;
            continue;
        }
        row.cells_evaluated += 1;

        let base = footprint_heights(reference, &ref_ids)?;
        let top = footprint_heights(actual, &act_ids)?;
        let heights = corner_heights(&base, &top);

        if classify(&heights) == CellClass::AllEqual {
            continue;
        }
        if !chain.accept_range(&base, &top) || !chain.accept_height(&heights) {
            row.cells_rejected += 1;
            continue;
        }

        let volume = match cell_volume(&base, &top, spacing.x, spacing.y) {
            Ok(volume) => volume,
            Err(err) => {
                warn!(i, j, %err, "cell decomposition failed; cell contributes zero");
                row.anomalies += 1;
                continue;
            }
        };
        if !chain.accept_tolerance(volume.total()) {
            row.cells_rejected += 1;
            continue;
        }

        let admitted = match selector {
            CuboidSelector::None => false,
            CuboidSelector::All => true,
            CuboidSelector::AboveOnly => volume.below == 0.0,
            CuboidSelector::BelowOnly => volume.above == 0.0,
            CuboidSelector::Mixed => volume.above != 0.0 && volume.below != 0.0,
        };
        if !admitted {
            continue;
        }
        match selector {
            CuboidSelector::AboveOnly => row.volume_above += volume.above,
            CuboidSelector::BelowOnly => row.volume_below += volume.below,
            _ => {
                row.volume_above += volume.above;
                row.volume_below += volume.below;
            }
        }
        if let Some(sink) = sink.as_deref_mut() {
            let record = cell_record(reference, actual, &ref_ids, &act_ids, &base, &top, volume);
            sink(&record);
        }
    }
    Ok(row)
}

/// A corner id set with duplicated footprint ids marks a ghost cell.
fn is_ghost(ids: &[usize; 8]) -> bool {
    ids[0] == ids[1] || ids[0] == ids[2]
}

/// Heights at the four footprint corners in canonical `a, b, c, d` order.
fn footprint_heights(surface: &Surface, ids: &[usize; 8]) -> VolumeResult<[f64; 4]> {
    let grid = surface.grid();
    Ok([
        grid.sample(ids[FOOTPRINT_PERM[0]])?,
        grid.sample(ids[FOOTPRINT_PERM[1]])?,
        grid.sample(ids[FOOTPRINT_PERM[2]])?,
        grid.sample(ids[FOOTPRINT_PERM[3]])?,
    ])
}

/// Build the world-coordinate record for a retained cell.
#[allow(clippy::cast_precision_loss)]
fn cell_record(
    reference: &Surface,
    actual: &Surface,
    ref_ids: &[usize; 8],
    act_ids: &[usize; 8],
    base: &[f64; 4],
    top: &[f64; 4],
    volume: CellVolume,
) -> CellRecord {
    let mut vertices = [Point3::origin(); 8];
    for c in 0..4 {
        vertices[c] = world_vertex(reference, ref_ids[FOOTPRINT_PERM[c]], base[c]);
        vertices[c + 4] = world_vertex(actual, act_ids[FOOTPRINT_PERM[c]], top[c]);
    }
    CellRecord {
        vertices,
        volume_above: volume.above,
        volume_below: volume.below,
        volume_total: volume.total(),
    }
}

/// World x/y of a lattice point, with the sampled height as z.
#[allow(clippy::cast_precision_loss)]
fn world_vertex(surface: &Surface, id: usize, height: f64) -> Point3<f64> {
    let grid = surface.grid();
    let coord = grid.point_coord(id);
    let origin = grid.origin();
    let spacing = grid.spacing();
    Point3::new(
        coord[0] as f64 * spacing.x + origin.x,
        coord[1] as f64 * spacing.y + origin.y,
        height,
    )
}
