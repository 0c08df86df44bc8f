use super::Point2;

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated
/// closing point contributes nothing, so open and closed rings agree.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area centroid of a polygon, falling back to the vertex average when the
/// area is degenerate.
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Option<Point2> {
    let n = points.len();
    if n == 0 {
        return None;
    }
    let area = signed_area_2d(points);
    if area.abs() < 1e-12 {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Some(Point2::new(sx * inv, sy * inv));
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    let k = 1.0 / (6.0 * area);
    Some(Point2::new(cx * k, cy * k))
}

/// Even-odd ray-casting point-in-polygon test.
///
/// Points exactly on the boundary may land on either side.
#[must_use]
pub fn point_in_polygon_2d(pt: &Point2, points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > pt.y) != (b.y > pt.y) {
            let x_cross = (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x;
            if pt.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shortest distance from `pt` to the closed polyline through `points`.
#[must_use]
pub fn distance_to_boundary_2d(pt: &Point2, points: &[Point2]) -> f64 {
    let n = points.len();
    let mut best = f64::INFINITY;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let ab = b - a;
        let len_sq = ab.norm_squared();
        let t = if len_sq > 0.0 {
            ((pt - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        best = best.min((pt - (a + ab * t)).norm());
    }
    best
}

/// Axis-aligned bounds of a 2D point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds2 {
    /// Bounds of the given points, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
