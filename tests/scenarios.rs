//! End-to-end slicing scenarios.

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

mod common;

use lamina::operations::InfillPattern;
use lamina::slicer::{SliceMesh, SliceOptions, SliceOutput};
use lamina::toolpath::{PathGroup, PathPoint, Role};

use common::{block_with_hole, cube, features, figure_eight_prism, init_tracing};

const HOLE: (f64, f64, f64, f64) = (8.0, 8.0, 12.0, 12.0);

fn in_hole(x: f64, y: f64) -> bool {
    x > HOLE.0 && x < HOLE.2 && y > HOLE.1 && y < HOLE.3
}

fn layer_features(out: &SliceOutput, layer: usize) -> Vec<&[PathPoint]> {
    features(&out.path)
        .into_iter()
        .filter(|f| f[0].layer == layer)
        .collect()
}

fn is_fill(role: Role) -> bool {
    matches!(role, Role::Infill | Role::Top | Role::Bottom)
}

fn scenario_a_options() -> SliceOptions {
    SliceOptions::default()
        .with_layer_height(1.0)
        .with_perimeters(1)
        .with_infill(0.0)
        .with_solid_layers(1, 1)
}

#[test]
fn cube_slices_into_twenty_layers() {
    init_tracing();
    let mesh = cube(20.0);
    let out = SliceMesh::new(&mesh, &scenario_a_options()).execute();

    assert_eq!(out.layers.len(), 20);
    assert_eq!(out.layer_count(), 20);
    assert!(!out.truncated);

    let bottom: Vec<_> = out.layer_points(0).filter(|p| p.role == Role::Bottom).collect();
    let top: Vec<_> = out.layer_points(19).filter(|p| p.role == Role::Top).collect();
    assert!(bottom.len() > 40);
    assert!(top.len() > 40);
    for p in bottom.iter().chain(&top) {
        assert!(p.x > -1e-9 && p.x < 20.0 + 1e-9);
        assert!(p.y > -1e-9 && p.y < 20.0 + 1e-9);
    }

    for layer in 1..19 {
        let feats = layer_features(&out, layer);
        assert_eq!(feats.len(), 1, "layer {layer}");
        let wall = feats[0];
        assert!(wall.iter().all(|p| p.role == Role::WallOuter));
        // Four corners plus the closing point.
        assert_eq!(wall.len(), 5);
        assert_eq!(wall[0].x, wall[4].x);
        assert_eq!(wall[0].y, wall[4].y);
        assert!(out.layer_points(layer).all(|p| !is_fill(p.role)));
    }
}

#[test]
fn through_hole_becomes_one_hole_loop() {
    let mesh = block_with_hole(20.0, 10.0, HOLE);
    let opts = SliceOptions::default().with_layer_height(1.0);
    let slicer = SliceMesh::new(&mesh, &opts);

    for layer in slicer.layers() {
        assert_eq!(layer.regions.len(), 1);
        assert_eq!(layer.regions[0].holes.len(), 1);
        assert_eq!(layer.stats.holes, 1);
        assert!((layer.regions[0].holes[0].area() - 16.0).abs() < 1e-6);
    }

    let out = slicer.execute();
    let mut fills = 0;
    for feat in features(&out.path) {
        if is_fill(feat[0].role) {
            fills += 1;
            let a = feat[0];
            let b = feat[feat.len() - 1];
            assert!(!in_hole((a.x + b.x) * 0.5, (a.y + b.y) * 0.5));
        }
    }
    assert!(fills > 0);
}

#[test]
fn hole_gets_its_own_walls() {
    let mesh = block_with_hole(20.0, 4.0, HOLE);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_perimeters(2)
        .with_infill(0.0)
        .with_solid_layers(0, 0);
    let out = SliceMesh::new(&mesh, &opts).execute();
    let feats = layer_features(&out, 1);
    assert_eq!(feats.len(), 4);
    assert_eq!(feats.iter().filter(|f| f[0].role == Role::WallOuter).count(), 1);
    // The hole's second loop has grown away from the cutout.
    let grown = feats
        .iter()
        .filter(|f| f[0].role == Role::WallInner)
        .any(|f| f.iter().all(|p| (p.x - 7.6).abs() < 1e-9 || (p.x - 12.4).abs() < 1e-9));
    assert!(grown);
}

#[test]
fn clip_holes_keeps_fill_out_of_the_cutout() {
    let mesh = block_with_hole(20.0, 6.0, HOLE);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_infill(40.0)
        .with_clip_holes(true);
    let out = SliceMesh::new(&mesh, &opts).execute();
    for feat in features(&out.path) {
        if is_fill(feat[0].role) {
            for pair in feat.windows(2) {
                let mx = (pair[0].x + pair[1].x) * 0.5;
                let my = (pair[0].y + pair[1].y) * 0.5;
                assert!(!in_hole(mx, my));
            }
        }
    }
}

#[test]
fn zero_density_emits_no_infill() {
    let mesh = cube(10.0);
    for pattern in InfillPattern::ALL {
        let opts = SliceOptions::default()
            .with_layer_height(1.0)
            .with_infill(0.0)
            .with_pattern(pattern, 45.0);
        let out = SliceMesh::new(&mesh, &opts).execute();
        assert!(out.path.iter().all(|p| p.role != Role::Infill), "{pattern}");
        // Solid layers are still filled.
        assert!(out.path.iter().any(|p| p.role == Role::Bottom));
    }
}

#[test]
fn thin_wall_detection_keeps_one_perimeter() {
    let mesh = cube(6.0);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_perimeters(0)
        .with_infill(0.0)
        .with_solid_layers(0, 0);
    assert!(SliceMesh::new(&mesh, &opts).execute().is_empty());

    let out = SliceMesh::new(&mesh, &opts.with_thin_walls(true)).execute();
    assert_eq!(features(&out.path).len(), 6);
    assert!(out.path.iter().all(|p| p.role == Role::WallOuter));
}

#[test]
fn waves_stay_inside_a_plain_cube() {
    let mesh = cube(20.0);
    for pattern in [InfillPattern::Waves, InfillPattern::Gyroid2d] {
        let opts = SliceOptions::default()
            .with_solid_layers(0, 0)
            .with_pattern(pattern, 0.0);
        let out = SliceMesh::new(&mesh, &opts).execute();
        let infill: Vec<_> = out.path.iter().filter(|p| p.role == Role::Infill).collect();
        assert!(!infill.is_empty());
        for p in infill {
            assert!(p.x >= -1e-9 && p.x <= 20.0 + 1e-9, "{pattern}");
            assert!(p.y >= -1e-9 && p.y <= 20.0 + 1e-9, "{pattern}");
        }
    }
}

#[test]
fn solid_fill_never_runs_along_the_outer_wall() {
    let mesh = cube(10.0);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_pattern(InfillPattern::Lines, 0.0)
        .with_solid_layers(0, 10);
    let out = SliceMesh::new(&mesh, &opts).execute();
    for feat in features(&out.path) {
        if feat[0].role != Role::Bottom {
            continue;
        }
        let a = feat[0];
        let b = feat[feat.len() - 1];
        let along_x = (a.y - b.y).abs() < 1e-9 && (a.y.abs() < 1e-9 || (a.y - 10.0).abs() < 1e-9);
        let along_y = (a.x - b.x).abs() < 1e-9 && (a.x.abs() < 1e-9 || (a.x - 10.0).abs() < 1e-9);
        assert!(!along_x && !along_y);
    }
}

#[test]
fn figure_eight_splits_into_two_lobes() {
    let mesh = figure_eight_prism(10.0, 3.0);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_solid_layers(0, 0)
        .with_infill(0.0);
    for layer in SliceMesh::new(&mesh, &opts).layers() {
        assert_eq!(layer.stats.contours, 2);
        assert_eq!(layer.regions.len(), 2);
        let total: f64 = layer.regions.iter().map(|r| r.outer.area()).sum();
        assert!((total - 50.0).abs() < 1e-6);
        for region in &layer.regions {
            assert!((region.outer.area() - 25.0).abs() < 1e-6);
        }
    }
}

#[test]
fn walls_are_closed_and_regions_oriented() {
    let mesh = block_with_hole(20.0, 5.0, HOLE);
    let opts = SliceOptions::default().with_layer_height(0.5);
    let slicer = SliceMesh::new(&mesh, &opts);
    for layer in slicer.layers() {
        for wall in &layer.walls {
            assert!(wall.is_closed());
        }
        for region in &layer.regions {
            assert!(region.outer.signed_area() > 0.0);
            assert!(region.holes.iter().all(|h| h.signed_area() < 0.0));
            for hole in &region.holes {
                assert!(region.outer.contains_point(&hole.centroid()));
            }
        }
    }
}

#[test]
fn output_is_deterministic() {
    let mesh = block_with_hole(20.0, 4.0, HOLE);
    let opts = SliceOptions::default()
        .with_layer_height(0.4)
        .with_pattern(InfillPattern::Honeycomb, 30.0);
    let first = SliceMesh::new(&mesh, &opts).execute();
    let second = SliceMesh::new(&mesh, &opts).execute();
    assert_eq!(first, second);
}

#[test]
fn parallel_matches_sequential() {
    let mesh = block_with_hole(20.0, 6.0, HOLE);
    for pattern in [InfillPattern::Lines, InfillPattern::Cubic, InfillPattern::Gyroid2d] {
        let opts = SliceOptions::default()
            .with_layer_height(0.3)
            .with_pattern(pattern, 45.0)
            .with_brick_layer_phase(true);
        let parallel = SliceMesh::new(&mesh, &opts.clone().with_parallel(true)).execute();
        let sequential = SliceMesh::new(&mesh, &opts.with_parallel(false)).execute();
        assert_eq!(parallel, sequential, "{pattern}");
    }
}

#[test]
fn z_never_decreases() {
    let mesh = block_with_hole(20.0, 3.0, HOLE);
    let opts = SliceOptions::default().with_layer_height(0.25);
    let out = SliceMesh::new(&mesh, &opts).execute();
    assert!(!out.path.is_empty());
    for pair in out.path.windows(2) {
        assert!(pair[1].z >= pair[0].z);
        assert!(pair[1].layer >= pair[0].layer);
    }
    assert!(out.path.iter().all(|p| (p.layer_height - 0.25).abs() < 1e-12));
}

#[test]
fn role_order_controls_emission() {
    let mesh = cube(10.0);
    let opts = SliceOptions::default()
        .with_layer_height(1.0)
        .with_role_order(vec![PathGroup::Infill, PathGroup::Walls]);
    let out = SliceMesh::new(&mesh, &opts).execute();
    // Solid groups are not listed, so solid layers only carry walls.
    assert!(out
        .path
        .iter()
        .all(|p| !matches!(p.role, Role::Top | Role::Bottom)));
    let layer5: Vec<_> = out.layer_points(5).collect();
    let first_wall = layer5.iter().position(|p| p.role == Role::WallOuter).unwrap();
    assert!(first_wall > 0);
    assert!(layer5[..first_wall].iter().all(|p| p.role == Role::Infill));
}

#[test]
fn point_budget_keeps_a_valid_prefix() {
    let mesh = cube(10.0);
    let opts = SliceOptions::default().with_layer_height(1.0);
    let full = SliceMesh::new(&mesh, &opts).execute();
    let capped_opts = opts.clone().with_budgets(10_000, 300);
    let capped = SliceMesh::new(&mesh, &capped_opts).execute();
    assert!(capped.truncated);
    assert_eq!(capped.path.len(), 300);
    assert_eq!(capped.path[..], full.path[..300]);
    let counted: usize = capped.layers.iter().map(|l| l.points).sum();
    assert_eq!(counted, 300);
}

#[test]
fn every_pattern_stays_inside_the_part() {
    let mesh = block_with_hole(20.0, 2.0, HOLE);
    for pattern in InfillPattern::ALL {
        let opts = SliceOptions::default()
            .with_layer_height(0.5)
            .with_solid_layers(0, 0)
            .with_infill(25.0)
            .with_pattern(pattern, 15.0);
        let out = SliceMesh::new(&mesh, &opts).execute();
        for p in out.path.iter().filter(|p| p.role == Role::Infill) {
            assert!(p.x > -1e-9 && p.x < 20.0 + 1e-9, "{pattern}");
            assert!(p.y > -1e-9 && p.y < 20.0 + 1e-9, "{pattern}");
        }
    }
}

#[test]
fn degenerate_inputs_yield_empty_output() {
    let opts = SliceOptions::default();
    let empty = lamina::geometry::Mesh::new(Vec::new());
    assert!(SliceMesh::new(&empty, &opts).execute().is_empty());

    let flat = lamina::geometry::Mesh::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let out = SliceMesh::new(&flat, &opts).execute();
    assert!(out.is_empty());
    assert!(out.layers.is_empty());

    let bad = SliceOptions::default().with_line_width(0.0);
    assert!(SliceMesh::new(&cube(5.0), &bad).execute().is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn options_and_points_round_trip_through_json() {
    let opts: SliceOptions = serde_json::from_str(
        r#"{"layerHeight":0.3,"infillPattern":"gyroid2d","roleOrder":["walls","top"]}"#,
    )
    .unwrap();
    assert!((opts.layer_height - 0.3).abs() < 1e-12);
    assert_eq!(opts.infill_pattern, InfillPattern::Gyroid2d);
    assert_eq!(opts.role_order, vec![PathGroup::Walls, PathGroup::Top]);
    assert_eq!(opts.perimeters, SliceOptions::default().perimeters);

    let out = SliceMesh::new(&cube(2.0), &opts).execute();
    let json = serde_json::to_string(&out.path[0]).unwrap();
    assert!(json.contains("\"layerHeight\""));
    assert!(json.contains("\"wall_outer\""));
}
