//! Line-family rasterization.

use tracing::warn;

use crate::geometry::{Contour, Segment2};
use crate::math::{Point2, Tolerances, Vector2};

/// Upper bound on lines per family; a tiny spacing on a huge region would
/// otherwise allocate without limit.
const MAX_LINES_PER_FAMILY: usize = 200_000;

/// One family of parallel lines.
///
/// Lines run along `(cos a, sin a)` and sit at offsets
/// `phase + k * spacing` along the normal `(-sin a, cos a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFamily {
    pub angle_deg: f64,
    pub spacing: f64,
    pub phase: f64,
}

impl LineFamily {
    #[must_use]
    pub fn new(angle_deg: f64, spacing: f64, phase: f64) -> Self {
        Self {
            angle_deg,
            spacing,
            phase,
        }
    }

    /// Unit direction along the lines.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        let a = self.angle_deg.to_radians();
        Vector2::new(a.cos(), a.sin())
    }

    /// Unit normal across the lines.
    #[must_use]
    pub fn normal(&self) -> Vector2 {
        let a = self.angle_deg.to_radians();
        Vector2::new(-a.sin(), a.cos())
    }
}

/// Clips a family of lines to `outer`, returning one segment per filled
/// stretch in line order.
///
/// Crossings are collected from the edges of `outer` and of every contour in
/// `clip` (even-odd), so passing holes here cuts lines at hole edges. An edge
/// counts as crossed when exactly one endpoint lies on or below the line,
/// which keeps the crossing count even at shared vertices. Lines within
/// `tol.quantize` of the outline's extreme offsets are skipped. With
/// `serpentine`, every other line runs backwards.
#[must_use]
pub fn line_family(
    outer: &Contour,
    clip: &[Contour],
    family: &LineFamily,
    serpentine: bool,
    tol: &Tolerances,
) -> Vec<Segment2> {
    if !(family.spacing.is_finite() && family.spacing > 0.0) {
        return Vec::new();
    }
    let dir = family.direction();
    let normal = family.normal();

    let (s_min, s_max) = outer
        .ring()
        .iter()
        .map(|p| normal.dot(&p.coords))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
    // Lines strictly inside the extent: one lying on an extreme edge would
    // run along the wall.
    let k_first = ((s_min + tol.quantize - family.phase) / family.spacing).floor() + 1.0;
    let k_last = ((s_max - tol.quantize - family.phase) / family.spacing).ceil() - 1.0;
    if !(k_first.is_finite() && k_last.is_finite()) || k_last < k_first {
        return Vec::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (k_last - k_first) as usize + 1;
    if count > MAX_LINES_PER_FAMILY {
        warn!(count, spacing = family.spacing, "line family too dense, skipped");
        return Vec::new();
    }

    // Edges projected once: (s at start, s at end, start, end).
    let edges: Vec<(f64, f64, Point2, Point2)> = std::iter::once(outer)
        .chain(clip)
        .flat_map(|c| c.points().windows(2))
        .map(|e| (normal.dot(&e[0].coords), normal.dot(&e[1].coords), e[0], e[1]))
        .collect();

    let mut segments = Vec::new();
    let mut crossings: Vec<(f64, Point2)> = Vec::new();
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let s = family.phase + (k_first + i as f64) * family.spacing;
        crossings.clear();
        for &(s0, s1, p0, p1) in &edges {
            if (s0 <= s) != (s1 <= s) {
                let t = (s - s0) / (s1 - s0);
                let p = p0 + (p1 - p0) * t;
                crossings.push((dir.dot(&p.coords), p));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut line: Vec<Segment2> = crossings
            .chunks_exact(2)
            .map(|pair| Segment2::new(pair[0].1, pair[1].1))
            .filter(|seg| seg.length_sq() > tol.distinct_sq)
            .collect();
        if serpentine && i % 2 == 1 {
            line.reverse();
            for seg in &mut line {
                std::mem::swap(&mut seg.a, &mut seg.b);
            }
        }
        segments.extend(line);
    }
    segments
}
