//! Slicing results.

use crate::toolpath::PathPoint;

/// Per-layer counters, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LayerStats {
    pub index: usize,
    /// Nominal layer height above the build plate.
    pub z: f64,
    /// Section segments produced by the plane cut.
    pub segments: usize,
    /// Simple closed contours after cleanup.
    pub contours: usize,
    pub regions: usize,
    /// Hole count across all regions.
    pub holes: usize,
    /// Chains discarded as open, collapsed, or unsplittable.
    pub dropped_contours: usize,
    /// Path points emitted for this layer.
    pub points: usize,
}

/// The flat toolpath and its per-layer statistics.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SliceOutput {
    /// Points in layer order, then role order within each layer.
    pub path: Vec<PathPoint>,
    pub layers: Vec<LayerStats>,
    /// `true` if a layer or point budget cut the output short.
    pub truncated: bool,
}

impl SliceOutput {
    /// Returns `true` if no point was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of layers that contributed to the output.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Points of one layer.
    pub fn layer_points(&self, layer: usize) -> impl Iterator<Item = &PathPoint> + '_ {
        self.path.iter().filter(move |p| p.layer == layer)
    }
}
