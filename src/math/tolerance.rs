use crate::error::{OptionsError, Result};

/// Named numeric tolerances used across the slicing pipeline.
///
/// All lengths are in millimetres, areas in square millimetres.
///
/// The values are related: `quantize` must exceed accumulated floating error
/// on coordinates (several orders above `plane`) but stay far below any
/// printable feature size, and `distinct_sq` must be below `quantize²` so a
/// segment shorter than one hash cell can still be emitted and stitched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Tolerances {
    /// Cell size for endpoint hashing in the contour builder.
    pub quantize: f64,
    /// Slack on triangle Z extents and edge interpolation parameters.
    pub plane: f64,
    /// Minimum squared length of an emitted section segment.
    pub distinct_sq: f64,
    /// Relative cross-product threshold below which two edges are collinear.
    pub collinear: f64,
    /// Contours or sub-contours with smaller absolute area are dropped.
    pub area_collapse: f64,
    /// Denominator threshold for line-line intersection.
    pub parallel: f64,
    /// Distance below the nominal layer height at which the plane is cut.
    pub slice_nudge: f64,
    /// Step guard for a single contour walk.
    pub max_walk_steps: usize,
    /// Recursion guard for self-intersection splitting.
    pub max_split_depth: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            quantize: 1e-4,
            plane: 1e-9,
            distinct_sq: 1e-12,
            collinear: 1e-9,
            area_collapse: 1e-9,
            parallel: 1e-12,
            slice_nudge: 1e-4,
            max_walk_steps: 20_000,
            max_split_depth: 8,
        }
    }
}

impl Tolerances {
    /// Checks the tolerances against each other.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::InconsistentTolerances` if a value is not
    /// positive and finite, or if the ordering between related tolerances is
    /// violated.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("quantize", self.quantize),
            ("plane", self.plane),
            ("distinct_sq", self.distinct_sq),
            ("collinear", self.collinear),
            ("area_collapse", self.area_collapse),
            ("parallel", self.parallel),
            ("slice_nudge", self.slice_nudge),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(OptionsError::InconsistentTolerances(format!(
                    "{name} must be positive and finite, got {value}"
                ))
                .into());
            }
        }
        if self.plane >= self.quantize {
            return Err(OptionsError::InconsistentTolerances(format!(
                "plane ({}) must be below quantize ({})",
                self.plane, self.quantize
            ))
            .into());
        }
        if self.distinct_sq >= self.quantize * self.quantize {
            return Err(OptionsError::InconsistentTolerances(format!(
                "distinct_sq ({}) must be below quantize^2 ({})",
                self.distinct_sq,
                self.quantize * self.quantize
            ))
            .into());
        }
        if self.slice_nudge >= 0.01 {
            return Err(OptionsError::InconsistentTolerances(format!(
                "slice_nudge ({}) must stay below 0.01 mm",
                self.slice_nudge
            ))
            .into());
        }
        if self.max_walk_steps == 0 || self.max_split_depth == 0 {
            return Err(OptionsError::InconsistentTolerances(
                "iteration guards must be non-zero".to_owned(),
            )
            .into());
        }
        Ok(())
    }
}
