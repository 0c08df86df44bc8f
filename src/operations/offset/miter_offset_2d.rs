use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Contour;
use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{left_normal, Point2, Tolerances, Vector2};
use crate::operations::contour::{first_crossing, strip_collinear};

/// Maximum miter distance as a multiple of `|distance|`. Longer miters are
/// clamped along their own direction.
const MITER_LIMIT: f64 = 4.0;

/// Offsets a closed polygon with miter joins.
///
/// Every vertex is replaced by the intersection of its two adjacent edges
/// shifted by `distance`. Edges shorter than the offset consumes (small
/// chamfers, finely tessellated fillets) are dropped and their neighbours
/// joined directly, so the vertex count can only shrink.
///
/// # Sign Convention
///
/// - Positive distance: left offset (relative to walking direction)
/// - Negative distance: right offset
///
/// With outers counter-clockwise and holes clockwise, a positive distance
/// always moves toward the material: an outer shrinks and a hole grows.
#[derive(Debug)]
pub struct MiterOffset2D {
    points: Vec<Point2>,
    distance: f64,
    tolerances: Tolerances,
}

impl MiterOffset2D {
    /// Creates a new offset of `ring` (points without closing repetition).
    #[must_use]
    pub fn new(ring: &[Point2], distance: f64) -> Self {
        Self {
            points: ring.to_vec(),
            distance,
            tolerances: Tolerances::default(),
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if fewer than 3 points are provided
    /// - `GeometryError::ZeroVector` if the input has a zero-length edge
    /// - `OperationError::Failed` if the result collapses, flips orientation,
    ///   moves the wrong way, or crosses itself
    pub fn execute(&self) -> Result<Contour> {
        let n = self.points.len();
        if n < 3 {
            return Err(OperationError::InvalidInput(
                "at least 3 points are required for polygon offset".to_owned(),
            )
            .into());
        }
        let tol = &self.tolerances;
        let d = self.distance;

        let mut dirs: Vec<Vector2> = Vec::with_capacity(n);
        for i in 0..n {
            let edge = self.points[(i + 1) % n] - self.points[i];
            let len = edge.norm();
            if len * len <= tol.distinct_sq {
                return Err(GeometryError::ZeroVector.into());
            }
            dirs.push(edge / len);
        }

        // An edge whose offset reverses has been consumed by its neighbours.
        // It is dropped and the neighbours are joined directly, one edge at a
        // time, most reversed first.
        let mut active: Vec<usize> = (0..n).collect();
        let raw = loop {
            let m = active.len();
            if m < 3 {
                return Err(OperationError::Failed(
                    "offset consumed all but two edges".to_owned(),
                )
                .into());
            }
            let corners: Vec<Point2> = (0..m)
                .map(|k| {
                    let prev = active[(k + m - 1) % m];
                    let next = active[k];
                    miter_corner(
                        &self.points[prev],
                        &dirs[prev],
                        &self.points[next],
                        &dirs[next],
                        d,
                        tol,
                    )
                })
                .collect();
            let consumed = (0..m)
                .map(|k| (k, (corners[(k + 1) % m] - corners[k]).dot(&dirs[active[k]])))
                .filter(|&(_, along)| along <= 0.0)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match consumed {
                Some((k, _)) => {
                    active.remove(k);
                }
                None => break corners,
            }
        };

        let ring = strip_collinear(&raw, tol);
        if ring.len() < 3 {
            return Err(OperationError::Failed(
                "offset collapsed to fewer than 3 points".to_owned(),
            )
            .into());
        }

        let original_area = signed_area_2d(&self.points);
        let result_area = signed_area_2d(&ring);
        if result_area.abs() < tol.area_collapse || result_area.signum() != original_area.signum() {
            return Err(OperationError::Failed(
                "offset collapsed (orientation flipped)".to_owned(),
            )
            .into());
        }
        // A left offset always lowers the signed area: outers shrink, holes grow.
        let moved_left = result_area < original_area;
        if moved_left != (d > 0.0) {
            return Err(OperationError::Failed(
                "offset passed through itself".to_owned(),
            )
            .into());
        }
        if first_crossing(&ring, tol).is_some() {
            return Err(OperationError::Failed("offset self-intersects".to_owned()).into());
        }

        Contour::from_ring(ring)
    }
}

/// Join of the edge through `origin` and the edge starting at `corner`, both
/// shifted left by `d`. The edges are adjacent unless edges between them were
/// consumed.
fn miter_corner(
    origin: &Point2,
    dir_prev: &Vector2,
    corner: &Point2,
    dir_next: &Vector2,
    d: f64,
    tol: &Tolerances,
) -> Point2 {
    let n_prev = left_normal(dir_prev);
    let n_next = left_normal(dir_next);
    let a = origin + n_prev * d;
    let b = corner + n_next * d;

    let miter = match line_line_intersect_2d(&a, dir_prev, &b, dir_next, tol.parallel) {
        Some((t, _)) => point_at(&a, dir_prev, t),
        None => {
            // Parallel edges: shift along the averaged normal.
            let avg = n_prev + n_next;
            let norm = avg.norm();
            if norm > tol.collinear {
                corner + avg / norm * d
            } else {
                corner + n_prev * d
            }
        }
    };

    let shift = miter - corner;
    let limit = MITER_LIMIT * d.abs();
    if shift.norm_squared() > limit * limit {
        corner + shift.normalize() * limit
    } else {
        miter
    }
}
