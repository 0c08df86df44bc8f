//! Layer orchestration.
//!
//! Turns a mesh and [`SliceOptions`] into the flat role-tagged toolpath.
//! Layers are independent given the shared mesh and [`TriangleIndex`], so
//! they are computed on the rayon pool and assembled strictly in Z order;
//! the result is identical to a sequential run.

// Layer counts and indices stay far below 2^52
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod layer;
mod options;
mod output;

pub use layer::{LayerPlan, LayerToolpath};
pub use options::SliceOptions;
pub use output::{LayerStats, SliceOutput};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::geometry::{Mesh, TriangleIndex};
use crate::toolpath::PathPoint;

/// Slices a mesh into a role-ordered toolpath.
///
/// The mesh is treated as resting on Z = 0: layer `i` is cut just below
/// `min_z + (i + 1) * layer_height` and its points carry the nominal height
/// `(i + 1) * layer_height`.
#[derive(Debug)]
pub struct SliceMesh<'a> {
    mesh: &'a Mesh,
    options: &'a SliceOptions,
    index: Option<&'a TriangleIndex>,
}

impl<'a> SliceMesh<'a> {
    /// Creates a new slicing run.
    #[must_use]
    pub fn new(mesh: &'a Mesh, options: &'a SliceOptions) -> Self {
        Self {
            mesh,
            options,
            index: None,
        }
    }

    /// Reuses a caller-owned index instead of building one per run.
    #[must_use]
    pub fn with_index(mut self, index: &'a TriangleIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Executes the slicing run.
    ///
    /// Invalid options or a mesh without finite bounds produce an empty
    /// output; the reason is logged at `warn` level. Call
    /// [`SliceOptions::validate`] beforehand to get the error instead.
    #[must_use]
    pub fn execute(&self) -> SliceOutput {
        let Some((layers, capped)) = self.compute_layers() else {
            return SliceOutput::default();
        };
        let output = self.assemble(layers, capped);
        info!(
            layers = output.layers.len(),
            points = output.path.len(),
            truncated = output.truncated,
            "Slicing complete"
        );
        output
    }

    /// Computes every layer within the layer budget without flattening.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerToolpath> {
        self.compute_layers()
            .map(|(layers, _)| layers)
            .unwrap_or_default()
    }

    /// Layers in Z order, and whether the layer budget cut the part short.
    fn compute_layers(&self) -> Option<(Vec<LayerToolpath>, bool)> {
        let options = self.options;
        if let Err(err) = options.validate() {
            warn!(%err, "Invalid slice options, nothing sliced");
            return None;
        }
        let Some(bounds) = self.mesh.bounds() else {
            warn!(
                triangles = self.mesh.triangle_count(),
                "Mesh has no finite bounds, nothing sliced"
            );
            return None;
        };

        let total = (bounds.height() / options.layer_height + 1e-9).floor() as usize;
        let count = total.min(options.max_layers);
        info!(
            triangles = self.mesh.triangle_count(),
            height = bounds.height(),
            layers = count,
            "Starting mesh slicing"
        );

        let owned;
        let index = match self.index {
            Some(index) => index,
            None => {
                owned = TriangleIndex::build(self.mesh);
                &owned
            }
        };

        let plans: Vec<LayerPlan> = (0..count)
            .map(|i| LayerPlan::new(i, total, bounds.min.z, options))
            .collect();
        let build = |plan: &LayerPlan| LayerToolpath::build(self.mesh, index, plan, options);
        let layers: Vec<LayerToolpath> = if options.parallel {
            plans.par_iter().map(build).collect()
        } else {
            plans.iter().map(build).collect()
        };
        Some((layers, count < total))
    }

    /// Flattens layers into points: group order within a layer, a travel
    /// flag on the first point of each feature, and the point budget.
    fn assemble(&self, layers: Vec<LayerToolpath>, capped: bool) -> SliceOutput {
        let options = self.options;
        let order = options.effective_role_order();
        let mut output = SliceOutput {
            truncated: capped,
            ..SliceOutput::default()
        };
        if capped {
            warn!(max_layers = options.max_layers, "Layer budget reached");
        }

        'layers: for layer in layers {
            let emits = order
                .iter()
                .any(|&group| layer.group(group).iter().any(|f| !f.points.is_empty()));
            if emits && output.path.len() >= options.max_segs {
                output.truncated = true;
                warn!(
                    max_segs = options.max_segs,
                    layer = layer.index,
                    "Point budget reached"
                );
                break;
            }
            let mut stats = layer.stats;
            for &group in &order {
                for feature in layer.group(group) {
                    for (k, p) in feature.points.iter().enumerate() {
                        if output.path.len() >= options.max_segs {
                            output.truncated = true;
                            output.layers.push(stats);
                            warn!(
                                max_segs = options.max_segs,
                                layer = layer.index,
                                "Point budget reached"
                            );
                            break 'layers;
                        }
                        output.path.push(PathPoint {
                            x: p.x,
                            y: p.y,
                            z: layer.z,
                            travel: k == 0,
                            layer: layer.index,
                            role: feature.role,
                            layer_height: layer.layer_height,
                        });
                        stats.points += 1;
                    }
                }
            }
            output.layers.push(stats);
        }
        output
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::toolpath::{PathGroup, Role};

    /// Axis-aligned box with two triangles per face.
    fn cuboid(size: [f64; 3]) -> Mesh {
        let [sx, sy, sz] = size;
        let v = |x: f64, y: f64, z: f64| Point3::new(x * sx, y * sy, z * sz);
        let quads = [
            [v(0., 0., 0.), v(1., 0., 0.), v(1., 1., 0.), v(0., 1., 0.)],
            [v(0., 0., 1.), v(0., 1., 1.), v(1., 1., 1.), v(1., 0., 1.)],
            [v(0., 0., 0.), v(0., 0., 1.), v(1., 0., 1.), v(1., 0., 0.)],
            [v(1., 0., 0.), v(1., 0., 1.), v(1., 1., 1.), v(1., 1., 0.)],
            [v(1., 1., 0.), v(1., 1., 1.), v(0., 1., 1.), v(0., 1., 0.)],
            [v(0., 1., 0.), v(0., 1., 1.), v(0., 0., 1.), v(0., 0., 0.)],
        ];
        let tris: Vec<[Point3; 3]> = quads
            .iter()
            .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
            .collect();
        Mesh::from_triangles(&tris)
    }

    #[test]
    fn layer_count_from_height() {
        let mesh = cuboid([4.0, 4.0, 2.0]);
        let opts = SliceOptions::default().with_layer_height(0.5);
        let out = SliceMesh::new(&mesh, &opts).execute();
        assert_eq!(out.layers.len(), 4);
        assert!(!out.truncated);
        let zs: Vec<f64> = out.layers.iter().map(|l| l.z).collect();
        assert_eq!(zs, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn first_point_of_each_feature_is_travel() {
        let mesh = cuboid([4.0, 4.0, 1.0]);
        let opts = SliceOptions::default()
            .with_layer_height(0.5)
            .with_perimeters(1)
            .with_solid_layers(0, 0)
            .with_infill(0.0);
        let out = SliceMesh::new(&mesh, &opts).execute();
        // One closed wall loop per layer: 4 vertices plus closure.
        assert_eq!(out.path.len(), 10);
        for layer in 0..2 {
            let pts: Vec<_> = out.layer_points(layer).collect();
            assert!(pts[0].travel);
            assert!(pts[1..].iter().all(|p| !p.travel));
            assert!(pts.iter().all(|p| p.role == Role::WallOuter));
        }
    }

    #[test]
    fn role_order_is_respected() {
        let mesh = cuboid([6.0, 6.0, 1.0]);
        let opts = SliceOptions::default()
            .with_layer_height(1.0)
            .with_perimeters(1)
            .with_solid_layers(0, 1)
            .with_role_order(vec![PathGroup::Bottom, PathGroup::Walls]);
        let out = SliceMesh::new(&mesh, &opts).execute();
        let first_wall = out.path.iter().position(|p| p.role == Role::WallOuter).unwrap();
        assert!(first_wall > 0);
        assert!(out.path[..first_wall].iter().all(|p| p.role == Role::Bottom));
        assert!(out.path[first_wall..].iter().all(|p| p.role == Role::WallOuter));

        let walls_only = opts.clone().with_role_order(vec![PathGroup::Walls]);
        let out = SliceMesh::new(&mesh, &walls_only).execute();
        assert!(out.path.iter().all(|p| p.role == Role::WallOuter));
    }

    #[test]
    fn point_budget_truncates() {
        let mesh = cuboid([4.0, 4.0, 2.0]);
        let opts = SliceOptions::default()
            .with_layer_height(0.5)
            .with_budgets(10_000, 7);
        let out = SliceMesh::new(&mesh, &opts).execute();
        assert_eq!(out.path.len(), 7);
        assert!(out.truncated);
        assert_eq!(out.layers.len(), 1);
        assert_eq!(out.layers[0].points, 7);
    }

    #[test]
    fn budget_spent_at_layer_end_lists_no_extra_layer() {
        let mesh = cuboid([4.0, 4.0, 1.0]);
        let opts = SliceOptions::default()
            .with_layer_height(0.5)
            .with_perimeters(1)
            .with_solid_layers(0, 0)
            .with_infill(0.0)
            .with_budgets(10_000, 5);
        let out = SliceMesh::new(&mesh, &opts).execute();
        assert_eq!(out.path.len(), 5);
        assert!(out.truncated);
        assert_eq!(out.layers.len(), 1);
        assert_eq!(out.layers[0].points, 5);
    }

    #[test]
    fn layer_budget_truncates() {
        let mesh = cuboid([4.0, 4.0, 2.0]);
        let opts = SliceOptions::default()
            .with_layer_height(0.5)
            .with_solid_layers(1, 1)
            .with_budgets(2, 1_000_000);
        let out = SliceMesh::new(&mesh, &opts).execute();
        assert_eq!(out.layers.len(), 2);
        assert!(out.truncated);
        // Layer 1 is not a top layer: roles use the uncapped count.
        assert!(out.layer_points(1).all(|p| p.role != Role::Top));
    }

    #[test]
    fn invalid_input_yields_empty_output() {
        let mesh = cuboid([4.0, 4.0, 2.0]);
        let bad = SliceOptions::default().with_layer_height(0.0);
        assert_eq!(SliceMesh::new(&mesh, &bad).execute(), SliceOutput::default());

        let empty = Mesh::new(Vec::new());
        let opts = SliceOptions::default();
        assert!(SliceMesh::new(&empty, &opts).execute().is_empty());
    }

    #[test]
    fn caller_index_matches_internal_index() {
        let mesh = cuboid([3.0, 5.0, 1.0]);
        let opts = SliceOptions::default().with_layer_height(0.25);
        let index = TriangleIndex::build(&mesh);
        let with = SliceMesh::new(&mesh, &opts).with_index(&index).execute();
        let without = SliceMesh::new(&mesh, &opts).execute();
        assert_eq!(with, without);
    }
}
