//! Per-cell rejection rules.
//!
//! Filters run in a fixed order: absolute-z range over the 8 cell
//! vertices, |height difference| band over the 4 posts, then minimum
//! total volume. Each is independently optional; a rejected cell
//! contributes zero and never reaches the selector.

use crate::params::VolumeParams;

/// The fixed-order rejection chain for one calculation.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain<'a> {
    params: &'a VolumeParams,
}

impl<'a> FilterChain<'a> {
    /// Build the chain over a parameter set.
    #[must_use]
    pub const fn new(params: &'a VolumeParams) -> Self {
        Self { params }
    }

    /// Accept a cell by the absolute z of its base and top heights.
    ///
    /// Rejects when any of the 8 vertex heights falls outside the
    /// configured band. Always accepts when the range filter is off.
    #[must_use]
    pub fn accept_range(&self, base: &[f64; 4], top: &[f64; 4]) -> bool {
        let Some(range) = self.params.range else {
            return true;
        };
        let mut min_z = base[0];
        let mut max_z = base[0];
        for &z in base.iter().chain(top.iter()) {
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }
        min_z >= range.min && max_z <= range.max
    }

    /// Accept a cell by the magnitudes of its per-post height differences.
    ///
    /// Bounds are compared as magnitudes. Always accepts when the height
    /// filter is off.
    #[must_use]
    pub fn accept_height(&self, heights: &[f64; 4]) -> bool {
        let Some(band) = self.params.height else {
            return true;
        };
        let mut min_h = heights[0].abs();
        let mut max_h = min_h;
        for &h in &heights[1..] {
            min_h = min_h.min(h.abs());
            max_h = max_h.max(h.abs());
        }
        min_h >= band.min.abs() && max_h <= band.max.abs()
    }

    /// Accept a cell by its total volume.
    ///
    /// Always accepts when the tolerance filter is off.
    #[must_use]
    pub fn accept_tolerance(&self, total_volume: f64) -> bool {
        match self.params.tolerance {
            Some(tolerance) => total_volume >= tolerance,
            None => true,
        }
    }
}
