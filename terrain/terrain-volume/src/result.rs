//! Result types for volume calculation.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Totals and counters from one volume calculation.
///
/// # Example
///
/// ```
/// use terrain_volume::VolumeSummary;
///
/// let summary = VolumeSummary::default();
/// assert!((summary.total()).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeSummary {
    /// Accumulated volume above the reference surface (fill).
    pub volume_above: f64,
    /// Accumulated volume below the reference surface (cut).
    pub volume_below: f64,
    /// Cells whose volume was computed.
    pub cells_evaluated: usize,
    /// Cells rejected by a filter.
    pub cells_rejected: usize,
    /// Ghost cells skipped at grid boundaries.
    pub cells_skipped: usize,
    /// Cells dropped because their decomposition failed; these contribute
    /// zero volume and are logged as warnings.
    pub anomalies: usize,
}

impl VolumeSummary {
    /// Total volume regardless of side.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.volume_above + self.volume_below
    }

    /// Merge another summary into this one.
    pub(crate) fn merge(&mut self, other: &Self) {
        self.volume_above += other.volume_above;
        self.volume_below += other.volume_below;
        self.cells_evaluated += other.cells_evaluated;
        self.cells_rejected += other.cells_rejected;
        self.cells_skipped += other.cells_skipped;
        self.anomalies += other.anomalies;
    }
}

impl std::fmt::Display for VolumeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Volume Summary:")?;
        writeln!(f, "  Above reference: {:.3}", self.volume_above)?;
        writeln!(f, "  Below reference: {:.3}", self.volume_below)?;
        writeln!(f, "  Total: {:.3}", self.total())?;
        writeln!(f, "  Cells evaluated: {}", self.cells_evaluated)?;
        writeln!(f, "  Cells rejected: {}", self.cells_rejected)?;
        writeln!(f, "  Ghost cells skipped: {}", self.cells_skipped)?;
        if self.anomalies > 0 {
            writeln!(f, "  Anomalies: {}", self.anomalies)?;
        }
        Ok(())
    }
}

/// One retained cell, for downstream mesh or visualisation construction.
///
/// Vertices are in world coordinates: the four base corners on the
/// reference surface followed by the four top corners on the actual
/// surface, in the canonical counter-clockwise footprint order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRecord {
    /// The 8 cell vertices: base `a, b, c, d`, then top `a, b, c, d`.
    pub vertices: [Point3<f64>; 8],
    /// Volume of this cell above the reference surface.
    pub volume_above: f64,
    /// Volume of this cell below the reference surface.
    pub volume_below: f64,
    /// Sum of the two components.
    pub volume_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let mut a = VolumeSummary {
            volume_above: 1.0,
            volume_below: 2.0,
            cells_evaluated: 3,
            cells_rejected: 1,
            cells_skipped: 2,
            anomalies: 0,
        };
        let b = VolumeSummary {
            volume_above: 0.5,
            volume_below: 0.25,
            cells_evaluated: 2,
            cells_rejected: 0,
            cells_skipped: 1,
            anomalies: 1,
        };
        a.merge(&b);
        assert!((a.volume_above - 1.5).abs() < f64::EPSILON);
        assert!((a.volume_below - 2.25).abs() < f64::EPSILON);
        assert_eq!(a.cells_evaluated, 5);
        assert_eq!(a.cells_rejected, 1);
        assert_eq!(a.cells_skipped, 3);
        assert_eq!(a.anomalies, 1);
    }

    #[test]
    fn test_display() {
        let summary = VolumeSummary {
            volume_above: 12.5,
            volume_below: 0.5,
            cells_evaluated: 10,
            cells_rejected: 2,
            cells_skipped: 5,
            anomalies: 1,
        };
        let output = format!("{summary}");
        assert!(output.contains("Above reference: 12.500"));
        assert!(output.contains("Total: 13.000"));
        assert!(output.contains("Anomalies: 1"));
    }
}
