//! Parameters for volume calculation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Band of acceptable absolute z values for a cell's vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeFilter {
    /// Lowest acceptable vertex height.
    pub min: f64,
    /// Highest acceptable vertex height.
    pub max: f64,
}

/// Band of acceptable per-post height differences.
///
/// Bounds are taken as magnitudes; the sign of the configured values is
/// ignored, as is the sign of the per-post differences.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeightFilter {
    /// Smallest acceptable |actual - reference| at any post.
    pub min: f64,
    /// Largest acceptable |actual - reference| at any post.
    pub max: f64,
}

/// Policy deciding which cells contribute to the running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CuboidSelector {
    /// No cell contributes; useful for dry runs of the filters.
    None,
    /// Every retained cell contributes both components.
    #[default]
    All,
    /// A cell contributes its above-volume only when its below-volume is zero.
    AboveOnly,
    /// A cell contributes its below-volume only when its above-volume is zero.
    BelowOnly,
    /// A cell contributes only when both components are nonzero.
    Mixed,
}

/// Configuration for a volume calculation.
///
/// Every filter is off by default and the selector admits all cells,
/// matching a plain cut/fill computation.
///
/// # Example
///
/// ```
/// use terrain_volume::{CuboidSelector, VolumeParams};
///
/// let params = VolumeParams::default()
///     .with_range(90.0, 120.0)
///     .with_tolerance(1e-6)
///     .with_selector(CuboidSelector::AboveOnly);
///
/// assert!(params.range.is_some());
/// assert!(params.height.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeParams {
    /// Reject cells with any vertex outside this z band.
    pub range: Option<RangeFilter>,
    /// Reject cells with any |height difference| outside this band.
    pub height: Option<HeightFilter>,
    /// Reject cells whose total volume falls below this threshold.
    pub tolerance: Option<f64>,
    /// Which cells feed the running totals.
    pub selector: CuboidSelector,
}

impl VolumeParams {
    /// Create params with every filter off and the `All` selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the absolute-z range filter.
    #[must_use]
    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(RangeFilter { min, max });
        self
    }

    /// Enable the height-difference band filter.
    #[must_use]
    pub const fn with_height_band(mut self, min: f64, max: f64) -> Self {
        self.height = Some(HeightFilter { min, max });
        self
    }

    /// Enable the minimum-volume tolerance filter.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set the cuboid selection policy.
    #[must_use]
    pub const fn with_selector(mut self, selector: CuboidSelector) -> Self {
        self.selector = selector;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = VolumeParams::default();
        assert!(params.range.is_none());
        assert!(params.height.is_none());
        assert!(params.tolerance.is_none());
        assert_eq!(params.selector, CuboidSelector::All);
    }

    #[test]
    fn test_builder_pattern() {
        let params = VolumeParams::new()
            .with_range(0.0, 50.0)
            .with_height_band(0.1, 10.0)
            .with_tolerance(1e-9)
            .with_selector(CuboidSelector::Mixed);

        let range = params.range.expect("range set");
        assert!((range.min - 0.0).abs() < f64::EPSILON);
        assert!((range.max - 50.0).abs() < f64::EPSILON);
        let height = params.height.expect("height set");
        assert!((height.min - 0.1).abs() < f64::EPSILON);
        assert!((params.tolerance.expect("tolerance set") - 1e-9).abs() < f64::EPSILON);
        assert_eq!(params.selector, CuboidSelector::Mixed);
    }
}
