use crate::error::{ContourError, Result};
use crate::geometry::Contour;
use crate::math::intersect_2d::segment_crossing_2d;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Tolerances};

use super::clean::strip_collinear;

/// Splits a ring at its self-intersections into simple contours.
///
/// The first proper crossing between two non-adjacent edges cuts the ring
/// into two sub-rings at the crossing point; each is split again until it is
/// simple. Sub-rings whose area falls below `tol.area_collapse` are dropped.
///
/// # Errors
///
/// Returns `ContourError::SplitDepthExceeded` when a ring still crosses
/// itself after `max_depth` nested splits. No partial result is returned.
pub fn split_self_intersections(
    ring: &[Point2],
    tol: &Tolerances,
    max_depth: usize,
) -> Result<Vec<Contour>> {
    let mut out = Vec::new();
    split_recursive(ring.to_vec(), tol, 0, max_depth, &mut out)?;
    Ok(out)
}

fn split_recursive(
    ring: Vec<Point2>,
    tol: &Tolerances,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<Contour>,
) -> Result<()> {
    if ring.len() < 3 {
        return Ok(());
    }
    // Lobes of a crossing ring cancel in the signed area, so collapse is
    // only judged once the ring is simple.
    let Some((i, j, x)) = first_crossing(&ring, tol) else {
        if signed_area_2d(&ring).abs() >= tol.area_collapse {
            out.push(Contour::from_ring(ring)?);
        }
        return Ok(());
    };
    if depth >= max_depth {
        return Err(ContourError::SplitDepthExceeded { depth: max_depth }.into());
    }

    let n = ring.len();
    let mut first = Vec::with_capacity(j - i + 1);
    first.push(x);
    first.extend_from_slice(&ring[i + 1..=j]);

    let mut second = Vec::with_capacity(n - (j - i) + 1);
    second.push(x);
    second.extend_from_slice(&ring[j + 1..]);
    second.extend_from_slice(&ring[..=i]);

    for sub in [first, second] {
        let sub = strip_collinear(&sub, tol);
        split_recursive(sub, tol, depth + 1, max_depth, out)?;
    }
    Ok(())
}

/// Finds a proper crossing between two non-adjacent edges of a ring.
///
/// Edges are swept by ascending minimum x so only edges with overlapping
/// x-ranges are tested. Returns `(i, j, point)` with `i < j`, where edge `k`
/// runs from `ring[k]` to `ring[(k + 1) % n]`.
#[must_use]
pub fn first_crossing(ring: &[Point2], tol: &Tolerances) -> Option<(usize, usize, Point2)> {
    let n = ring.len();
    if n < 4 {
        return None;
    }
    let edge = |k: usize| (ring[k], ring[(k + 1) % n]);
    let mut order: Vec<(f64, f64, usize)> = (0..n)
        .map(|k| {
            let (a, b) = edge(k);
            (a.x.min(b.x), a.x.max(b.x), k)
        })
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)));

    let mut best: Option<(usize, usize, Point2)> = None;
    for (pos, &(_, max_x, k)) in order.iter().enumerate() {
        let (a0, a1) = edge(k);
        for &(min_x2, _, m) in &order[pos + 1..] {
            if min_x2 > max_x {
                break;
            }
            let (i, j) = if k < m { (k, m) } else { (m, k) };
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (b0, b1) = edge(m);
            if a0.y.max(a1.y) < b0.y.min(b1.y) || b0.y.max(b1.y) < a0.y.min(a1.y) {
                continue;
            }
            if let Some((x, _, _)) = segment_crossing_2d(&a0, &a1, &b0, &b1, tol.collinear) {
                // Keep the lowest (i, j) pair so the result does not depend
                // on the sweep order.
                if best.is_none_or(|(bi, bj, _)| (i, j) < (bi, bj)) {
                    best = Some((i, j, x));
                }
            }
        }
    }
    best
}
