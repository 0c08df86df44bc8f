//! Work done for a single layer.

use tracing::debug;

use super::options::SliceOptions;
use super::output::LayerStats;
use crate::geometry::{Mesh, Region, TriangleIndex};
use crate::operations::{
    BuildContours, GenerateInfill, GenerateShells, InfillPattern, InfillSettings, NestRegions,
    PlaneSection,
};
use crate::toolpath::{FeaturePath, PathGroup, Role};

/// Where and how one layer is cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlan {
    pub index: usize,
    /// Nominal height above the build plate; emitted as the point Z.
    pub z: f64,
    /// Absolute height of the cutting plane.
    pub cut_z: f64,
    /// `Bottom` or `Top` for solid layers.
    pub forced: Option<Role>,
}

impl LayerPlan {
    /// Plans layer `index` of a part resting at `min_z` with `total` layers
    /// before any budget is applied.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(index: usize, total: usize, min_z: f64, options: &SliceOptions) -> Self {
        let z = (index + 1) as f64 * options.layer_height;
        let forced = if index < options.bottom_layers {
            Some(Role::Bottom)
        } else if index + options.top_layers >= total {
            Some(Role::Top)
        } else {
            None
        };
        Self {
            index,
            z,
            cut_z: min_z + z - options.tolerances.slice_nudge,
            forced,
        }
    }
}

/// Role-grouped features of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerToolpath {
    pub index: usize,
    pub z: f64,
    pub layer_height: f64,
    pub forced: Option<Role>,
    pub regions: Vec<Region>,
    pub walls: Vec<FeaturePath>,
    pub infill: Vec<FeaturePath>,
    pub bottom: Vec<FeaturePath>,
    pub top: Vec<FeaturePath>,
    pub stats: LayerStats,
}

impl LayerToolpath {
    /// Features of one output group.
    #[must_use]
    pub fn group(&self, group: PathGroup) -> &[FeaturePath] {
        match group {
            PathGroup::Bottom => &self.bottom,
            PathGroup::Walls => &self.walls,
            PathGroup::Infill => &self.infill,
            PathGroup::Top => &self.top,
        }
    }

    /// Returns `true` if the layer produced no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        PathGroup::DEFAULT_ORDER
            .iter()
            .all(|&g| self.group(g).is_empty())
    }

    /// Cuts, stitches, nests and fills one layer.
    #[must_use]
    pub fn build(
        mesh: &Mesh,
        index: &TriangleIndex,
        plan: &LayerPlan,
        options: &SliceOptions,
    ) -> Self {
        let tol = &options.tolerances;
        let segments = PlaneSection::new(mesh, plan.cut_z)
            .with_tolerances(tol)
            .with_index(index)
            .execute();
        let segment_count = segments.len();

        let build = BuildContours::new(segments).with_tolerances(tol).execute();
        let contour_count = build.contours.len();
        let regions = NestRegions::new(build.contours)
            .with_tolerances(tol)
            .execute();

        let perimeters = if options.perimeters == 0 && options.detect_thin_walls {
            1
        } else {
            options.perimeters
        };

        let mut layer = Self {
            index: plan.index,
            z: plan.z,
            layer_height: options.layer_height,
            forced: plan.forced,
            regions: Vec::new(),
            walls: Vec::new(),
            infill: Vec::new(),
            bottom: Vec::new(),
            top: Vec::new(),
            stats: LayerStats {
                index: plan.index,
                z: plan.z,
                segments: segment_count,
                contours: contour_count,
                regions: regions.len(),
                holes: regions.iter().map(|r| r.holes.len()).sum(),
                dropped_contours: build.dropped,
                points: 0,
            },
        };

        let fill = fill_settings(plan, options);
        for region in &regions {
            if perimeters > 0 {
                layer.walls.extend(
                    GenerateShells::new(region, options.line_width, perimeters)
                        .with_tolerances(tol)
                        .execute(),
                );
            }
            if let Some(settings) = fill {
                let features = GenerateInfill::new(region, settings)
                    .with_tolerances(tol)
                    .execute();
                match settings.role {
                    Role::Bottom => layer.bottom.extend(features),
                    Role::Top => layer.top.extend(features),
                    _ => layer.infill.extend(features),
                }
            }
        }
        layer.regions = regions;

        debug!(
            layer = plan.index,
            z = plan.z,
            segments = segment_count,
            contours = contour_count,
            regions = layer.stats.regions,
            holes = layer.stats.holes,
            dropped = build.dropped,
            "Layer sliced"
        );
        layer
    }
}

/// Fill parameters for a layer, or `None` when it gets no fill.
fn fill_settings(plan: &LayerPlan, options: &SliceOptions) -> Option<InfillSettings> {
    let (spacing, pattern, angle_deg, role) = match plan.forced {
        Some(role) => {
            let pattern = if options.infill_pattern == InfillPattern::Concentric {
                InfillPattern::Concentric
            } else {
                InfillPattern::Lines
            };
            let turn = if plan.index % 2 == 0 { 0.0 } else { 90.0 };
            (
                options.line_width,
                pattern,
                options.infill_angle_deg + turn,
                role,
            )
        }
        None => (
            options.sparse_spacing()?,
            options.infill_pattern,
            options.infill_angle_deg,
            Role::Infill,
        ),
    };
    let phase = if options.brick_layer_phase && plan.index % 2 == 1 {
        spacing * 0.5
    } else {
        0.0
    };
    Some(InfillSettings {
        spacing,
        angle_deg,
        pattern,
        serpentine: options.serpentine,
        phase,
        layer_index: plan.index,
        z: plan.z,
        role,
        clip_holes: options.clip_holes,
    })
}
