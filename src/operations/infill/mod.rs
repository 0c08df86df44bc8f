//! Interior fill of one region.
//!
//! Every line-based pattern is built from the same primitive,
//! [`raster::line_family`]: a set of parallel lines clipped to the region's
//! outer boundary. Patterns differ in how many families they lay down, at
//! which angles and spacings, and in how the resulting strokes are
//! post-processed (chained, waved). Concentric fill instead insets the outer
//! boundary repeatedly.
//!
//! Infill is clipped to the outer boundary only. Strokes whose midpoint falls
//! inside a hole are removed afterwards; `clip_holes` additionally cuts lines
//! at hole edges before that filter runs.

mod concentric;
mod patterns;
pub mod raster;

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{OptionsError, SliceError};
use crate::geometry::{Contour, Region, Segment2};
use crate::math::intersect_2d::segment_crossing_2d;
use crate::math::polygon_2d::distance_to_boundary_2d;
use crate::math::{Point2, Tolerances};
use crate::toolpath::{FeaturePath, Role};

pub use raster::LineFamily;

/// Sparse and solid fill patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InfillPattern {
    /// Parallel lines at the infill angle.
    #[default]
    Lines,
    /// Serpentine lines joined into continuous polylines.
    Zigzag,
    /// Two families at 90°.
    Grid,
    /// Two families at ±45° from the infill angle.
    Cross,
    /// Three families at 60° steps.
    Triangles,
    /// Four families at 45° steps.
    Octagrid,
    /// Three staggered families approximating hexagonal cells.
    Honeycomb,
    /// One family per layer, rotating through three directions.
    Cubic,
    /// Lines perturbed by a sine wave.
    Waves,
    /// Waves alternating 0°/90° per layer with a phase that follows Z.
    Gyroid2d,
    /// Repeated insets of the outer boundary.
    Concentric,
}

impl InfillPattern {
    pub const ALL: [Self; 11] = [
        Self::Lines,
        Self::Zigzag,
        Self::Grid,
        Self::Cross,
        Self::Triangles,
        Self::Octagrid,
        Self::Honeycomb,
        Self::Cubic,
        Self::Waves,
        Self::Gyroid2d,
        Self::Concentric,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Zigzag => "zigzag",
            Self::Grid => "grid",
            Self::Cross => "cross",
            Self::Triangles => "triangles",
            Self::Octagrid => "octagrid",
            Self::Honeycomb => "honeycomb",
            Self::Cubic => "cubic",
            Self::Waves => "waves",
            Self::Gyroid2d => "gyroid2d",
            Self::Concentric => "concentric",
        }
    }
}

impl fmt::Display for InfillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfillPattern {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| OptionsError::UnknownPattern(name).into())
    }
}

/// Per-call fill parameters, resolved by the layer orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfillSettings {
    /// Distance between adjacent lines (or rings) in mm.
    pub spacing: f64,
    pub angle_deg: f64,
    pub pattern: InfillPattern,
    /// Reverse every other line.
    pub serpentine: bool,
    /// Offset of the first line along the family normal.
    pub phase: f64,
    pub layer_index: usize,
    /// Nominal layer height, drives the Z-dependent patterns.
    pub z: f64,
    /// Role given to every emitted feature.
    pub role: Role,
    /// Cut lines at hole edges before hole filtering.
    pub clip_holes: bool,
}

impl Default for InfillSettings {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            angle_deg: 45.0,
            pattern: InfillPattern::Lines,
            serpentine: true,
            phase: 0.0,
            layer_index: 0,
            z: 0.0,
            role: Role::Infill,
            clip_holes: false,
        }
    }
}

/// Fills one region with the configured pattern.
#[derive(Debug)]
pub struct GenerateInfill<'a> {
    region: &'a Region,
    settings: InfillSettings,
    tolerances: Tolerances,
}

impl<'a> GenerateInfill<'a> {
    /// Creates a new infill generation.
    #[must_use]
    pub fn new(region: &'a Region, settings: InfillSettings) -> Self {
        Self {
            region,
            settings,
            tolerances: Tolerances::default(),
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Executes the generation.
    ///
    /// A non-positive or non-finite spacing yields no features.
    #[must_use]
    pub fn execute(&self) -> Vec<FeaturePath> {
        let s = &self.settings;
        if !(s.spacing.is_finite() && s.spacing > 0.0) {
            trace!(spacing = s.spacing, "infill skipped: invalid spacing");
            return Vec::new();
        }

        if s.pattern == InfillPattern::Concentric {
            return concentric::rings(self.region, s.spacing, &self.tolerances)
                .into_iter()
                .filter(|ring| !self.region.in_hole(&ring.centroid()))
                .map(|ring| FeaturePath::new(s.role, ring.into_points()))
                .collect();
        }

        let serpentine = s.serpentine || s.pattern == InfillPattern::Zigzag;
        let clip: &[Contour] = if s.clip_holes { &self.region.holes } else { &[] };
        let strokes: Vec<Segment2> = patterns::families(s)
            .iter()
            .flat_map(|family| {
                raster::line_family(&self.region.outer, clip, family, serpentine, &self.tolerances)
            })
            .filter(|seg| !self.region.in_hole(&seg.midpoint()))
            .collect();

        match s.pattern {
            InfillPattern::Zigzag => self
                .chain_strokes(&strokes)
                .into_iter()
                .map(|points| FeaturePath::new(s.role, points))
                .collect(),
            InfillPattern::Waves | InfillPattern::Gyroid2d => {
                let wave_phase = patterns::wave_phase(s);
                strokes
                    .iter()
                    .map(|seg| {
                        let points =
                            patterns::wave(seg, s.spacing, wave_phase, |p| self.clearance(p));
                        FeaturePath::new(s.role, points)
                    })
                    .collect()
            }
            _ => strokes
                .into_iter()
                .map(|seg| FeaturePath::new(s.role, vec![seg.a, seg.b]))
                .collect(),
        }
    }

    /// Joins consecutive strokes into polylines when the connector between
    /// them is short and stays inside the region.
    fn chain_strokes(&self, strokes: &[Segment2]) -> Vec<Vec<Point2>> {
        let max_link = 2.0 * self.settings.spacing;
        let mut chains: Vec<Vec<Point2>> = Vec::new();
        let mut current: Vec<Point2> = Vec::new();
        for seg in strokes {
            let joins = current
                .last()
                .is_some_and(|end| (seg.a - *end).norm() <= max_link && self.link_inside(end, &seg.a));
            if !joins && !current.is_empty() {
                chains.push(std::mem::take(&mut current));
            }
            if current.last() != Some(&seg.a) {
                current.push(seg.a);
            }
            current.push(seg.b);
        }
        if !current.is_empty() {
            chains.push(current);
        }
        chains
    }

    /// Distance from `p` to the nearest outer or hole edge.
    fn clearance(&self, p: &Point2) -> f64 {
        std::iter::once(&self.region.outer)
            .chain(&self.region.holes)
            .map(|c| distance_to_boundary_2d(p, c.ring()))
            .fold(f64::INFINITY, f64::min)
    }

    fn link_inside(&self, from: &Point2, to: &Point2) -> bool {
        let mid = nalgebra::center(from, to);
        let outer = &self.region.outer;
        // Connectors between crossings of a convex stretch run along the
        // boundary, so a midpoint on the outer edge counts as inside.
        let inside_outer = outer.contains_point(&mid)
            || distance_to_boundary_2d(&mid, outer.ring()) <= self.tolerances.quantize;
        if !inside_outer || self.region.in_hole(&mid) {
            return false;
        }
        let eps = self.tolerances.collinear;
        std::iter::once(&self.region.outer)
            .chain(&self.region.holes)
            .all(|contour| {
                contour
                    .points()
                    .windows(2)
                    .all(|e| segment_crossing_2d(from, to, &e[0], &e[1], eps).is_none())
            })
    }
}
