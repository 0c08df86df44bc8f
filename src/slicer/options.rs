//! Slicing options and presets.

use crate::error::{OptionsError, Result};
use crate::math::Tolerances;
use crate::operations::InfillPattern;
use crate::toolpath::PathGroup;

/// Process parameters for one slicing run.
///
/// Lengths are in millimetres, angles in degrees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SliceOptions {
    /// Layer height in mm.
    pub layer_height: f64,

    /// Extrusion line width in mm; also the wall inset step and the solid
    /// fill spacing.
    pub line_width: f64,

    /// Number of wall loops per boundary.
    pub perimeters: usize,

    /// Number of solid layers at the top.
    pub top_layers: usize,

    /// Number of solid layers at the bottom.
    pub bottom_layers: usize,

    /// Sparse infill density in percent (0-100).
    pub infill_percent: f64,

    /// Base angle of the infill lines.
    pub infill_angle_deg: f64,

    pub infill_pattern: InfillPattern,

    /// Reverse every other infill line.
    pub serpentine: bool,

    /// Shift the infill phase by half a spacing on odd layers.
    pub brick_layer_phase: bool,

    /// Force one wall loop when `perimeters` is zero.
    pub detect_thin_walls: bool,

    /// Cut infill lines at hole edges instead of only filtering by midpoint.
    pub clip_holes: bool,

    /// Layer budget.
    pub max_layers: usize,

    /// Point budget; output is truncated once it is reached.
    pub max_segs: usize,

    /// Order in which each layer's groups are emitted. Groups that are not
    /// listed are not emitted.
    pub role_order: Vec<PathGroup>,

    /// Compute layers on the rayon pool.
    pub parallel: bool,

    pub tolerances: Tolerances,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            line_width: 0.4,
            perimeters: 2,
            top_layers: 3,
            bottom_layers: 3,
            infill_percent: 20.0,
            infill_angle_deg: 45.0,
            infill_pattern: InfillPattern::Lines,
            serpentine: true,
            brick_layer_phase: false,
            detect_thin_walls: false,
            clip_holes: false,
            max_layers: 10_000,
            max_segs: 5_000_000,
            role_order: PathGroup::DEFAULT_ORDER.to_vec(),
            parallel: true,
            tolerances: Tolerances::default(),
        }
    }
}

impl SliceOptions {
    /// Coarse draft settings: 0.3 mm layers, 15% infill.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            layer_height: 0.3,
            infill_percent: 15.0,
            top_layers: 2,
            bottom_layers: 2,
            ..Default::default()
        }
    }

    /// Fine settings: 0.1 mm layers, 3 perimeters.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            layer_height: 0.1,
            perimeters: 3,
            top_layers: 5,
            bottom_layers: 4,
            ..Default::default()
        }
    }

    /// Set layer height.
    #[must_use]
    pub fn with_layer_height(mut self, height: f64) -> Self {
        self.layer_height = height;
        self
    }

    /// Set line width.
    #[must_use]
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Set number of perimeters.
    #[must_use]
    pub fn with_perimeters(mut self, count: usize) -> Self {
        self.perimeters = count;
        self
    }

    /// Set the number of solid top and bottom layers.
    #[must_use]
    pub fn with_solid_layers(mut self, top: usize, bottom: usize) -> Self {
        self.top_layers = top;
        self.bottom_layers = bottom;
        self
    }

    /// Set sparse infill density in percent.
    #[must_use]
    pub fn with_infill(mut self, percent: f64) -> Self {
        self.infill_percent = percent;
        self
    }

    /// Set infill pattern and base angle.
    #[must_use]
    pub fn with_pattern(mut self, pattern: InfillPattern, angle_deg: f64) -> Self {
        self.infill_pattern = pattern;
        self.infill_angle_deg = angle_deg;
        self
    }

    #[must_use]
    pub fn with_serpentine(mut self, serpentine: bool) -> Self {
        self.serpentine = serpentine;
        self
    }

    #[must_use]
    pub fn with_brick_layer_phase(mut self, enabled: bool) -> Self {
        self.brick_layer_phase = enabled;
        self
    }

    #[must_use]
    pub fn with_thin_walls(mut self, enabled: bool) -> Self {
        self.detect_thin_walls = enabled;
        self
    }

    #[must_use]
    pub fn with_clip_holes(mut self, enabled: bool) -> Self {
        self.clip_holes = enabled;
        self
    }

    /// Set the layer and point budgets.
    #[must_use]
    pub fn with_budgets(mut self, max_layers: usize, max_segs: usize) -> Self {
        self.max_layers = max_layers;
        self.max_segs = max_segs;
        self
    }

    #[must_use]
    pub fn with_role_order(mut self, order: Vec<PathGroup>) -> Self {
        self.role_order = order;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Parses a role order given as group names (`bottom`, `walls`,
    /// `infill`, `top`).
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::UnknownPathGroup` for an unrecognised name.
    pub fn parse_role_order<S: AsRef<str>>(names: &[S]) -> Result<Vec<PathGroup>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    /// Spacing of sparse infill lines, `None` when density is zero.
    #[must_use]
    pub fn sparse_spacing(&self) -> Option<f64> {
        (self.infill_percent > 0.0).then(|| self.line_width * 100.0 / self.infill_percent)
    }

    /// Role order with repeated groups removed, first occurrence kept.
    #[must_use]
    pub fn effective_role_order(&self) -> Vec<PathGroup> {
        let mut order = Vec::with_capacity(self.role_order.len());
        for group in &self.role_order {
            if !order.contains(group) {
                order.push(*group);
            }
        }
        order
    }

    /// Checks option values and tolerances.
    ///
    /// # Errors
    ///
    /// - `OptionsError::InvalidValue` for a non-positive layer height or line
    ///   width, an infill density outside 0-100, a non-finite angle, or a
    ///   zero budget
    /// - `OptionsError::InconsistentTolerances` from [`Tolerances::validate`]
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("layer_height", self.layer_height),
            ("line_width", self.line_width),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(OptionsError::InvalidValue {
                    name,
                    value,
                    reason: "must be positive and finite",
                }
                .into());
            }
        }
        if !(0.0..=100.0).contains(&self.infill_percent) {
            return Err(OptionsError::InvalidValue {
                name: "infill_percent",
                value: self.infill_percent,
                reason: "must be within 0-100",
            }
            .into());
        }
        if !self.infill_angle_deg.is_finite() {
            return Err(OptionsError::InvalidValue {
                name: "infill_angle_deg",
                value: self.infill_angle_deg,
                reason: "must be finite",
            }
            .into());
        }
        for (name, value) in [("max_layers", self.max_layers), ("max_segs", self.max_segs)] {
            if value == 0 {
                return Err(OptionsError::InvalidValue {
                    name,
                    value: value as f64,
                    reason: "budget must be at least 1",
                }
                .into());
            }
        }
        self.tolerances.validate()
    }
}
