//! Mesh builders shared by the integration tests.

#![allow(dead_code)]

use lamina::geometry::Mesh;
use lamina::math::Point3;
use lamina::toolpath::PathPoint;

/// Installs a `tracing` subscriber honouring `RUST_LOG`; repeated calls are
/// ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Vertical walls along the closed `outline`, two triangles per edge.
pub fn walls(outline: &[(f64, f64)], height: f64) -> Vec<[Point3; 3]> {
    let n = outline.len();
    let mut tris = Vec::with_capacity(2 * n);
    for i in 0..n {
        let (x0, y0) = outline[i];
        let (x1, y1) = outline[(i + 1) % n];
        let a0 = Point3::new(x0, y0, 0.0);
        let a1 = Point3::new(x1, y1, 0.0);
        let b0 = Point3::new(x0, y0, height);
        let b1 = Point3::new(x1, y1, height);
        tris.push([a0, b0, b1]);
        tris.push([a0, b1, a1]);
    }
    tris
}

/// Flat rectangle at height `z` as two triangles.
pub fn rect_cap(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> [[Point3; 3]; 2] {
    let p = |x: f64, y: f64| Point3::new(x, y, z);
    [
        [p(x0, y0), p(x1, y0), p(x1, y1)],
        [p(x0, y0), p(x1, y1), p(x0, y1)],
    ]
}

fn rect_outline(x0: f64, y0: f64, x1: f64, y1: f64) -> [(f64, f64); 4] {
    [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
}

/// Closed axis-aligned box from the origin.
pub fn cuboid(sx: f64, sy: f64, sz: f64) -> Mesh {
    let mut tris = walls(&rect_outline(0.0, 0.0, sx, sy), sz);
    for z in [0.0, sz] {
        tris.extend(rect_cap(0.0, 0.0, sx, sy, z));
    }
    Mesh::from_triangles(&tris)
}

/// Closed cube of edge `size`.
pub fn cube(size: f64) -> Mesh {
    cuboid(size, size, size)
}

/// Square block of edge `size` with a vertical rectangular through-hole
/// spanning `hole` = `(x0, y0, x1, y1)`.
pub fn block_with_hole(size: f64, height: f64, hole: (f64, f64, f64, f64)) -> Mesh {
    let (hx0, hy0, hx1, hy1) = hole;
    let mut tris = walls(&rect_outline(0.0, 0.0, size, size), height);
    tris.extend(walls(&rect_outline(hx0, hy0, hx1, hy1), height));
    for z in [0.0, height] {
        tris.extend(rect_cap(0.0, 0.0, size, hy0, z));
        tris.extend(rect_cap(0.0, hy1, size, size, z));
        tris.extend(rect_cap(0.0, hy0, hx0, hy1, z));
        tris.extend(rect_cap(hx1, hy0, size, hy1, z));
    }
    Mesh::from_triangles(&tris)
}

/// Extruded bow-tie: every section is a self-crossing quadrilateral whose
/// two lobes are right triangles of area `size² / 4`.
pub fn figure_eight_prism(size: f64, height: f64) -> Mesh {
    let outline = [(0.0, 0.0), (size, size), (size, 0.0), (0.0, size)];
    Mesh::from_triangles(&walls(&outline, height))
}

/// Splits a flat path into features at travel points.
pub fn features(path: &[PathPoint]) -> Vec<&[PathPoint]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, p) in path.iter().enumerate() {
        if p.travel && i > start {
            out.push(&path[start..i]);
            start = i;
        }
    }
    if start < path.len() {
        out.push(&path[start..]);
    }
    out
}
