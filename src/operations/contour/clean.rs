use crate::error::{ContourError, Result};
use crate::math::{cross_2d, Point2, Tolerances};

/// Normalizes the closure of a walked chain and removes repeated points.
///
/// The chain's last point is snapped onto the first if it lies within the
/// quantization epsilon. Returns the ring without the closing repetition.
///
/// # Errors
///
/// `ContourError::NotClosed` if the ends are apart, `ContourError::Collapsed`
/// if fewer than three distinct points remain.
pub fn normalize_closure(chain: &[Point2], tol: &Tolerances) -> Result<Vec<Point2>> {
    let (Some(first), Some(last)) = (chain.first(), chain.last()) else {
        return Err(ContourError::Collapsed("empty chain".to_owned()).into());
    };
    if (last - first).norm() > tol.quantize {
        return Err(ContourError::NotClosed.into());
    }

    let dup_sq = tol.distinct_sq;
    let mut ring: Vec<Point2> = Vec::with_capacity(chain.len());
    for pt in &chain[..chain.len() - 1] {
        if ring.last().is_some_and(|q| (pt - q).norm_squared() <= dup_sq) {
            continue;
        }
        ring.push(*pt);
    }
    while ring.len() > 1 && (ring[ring.len() - 1] - ring[0]).norm_squared() <= dup_sq {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(ContourError::Collapsed(format!(
            "{} distinct points after closure",
            ring.len()
        ))
        .into());
    }
    Ok(ring)
}

/// Removes vertices whose incident edges are parallel and keep going the
/// same way. Hairpin vertices (edges reversing) are kept for the splitter.
#[must_use]
pub fn strip_collinear(ring: &[Point2], tol: &Tolerances) -> Vec<Point2> {
    let mut pts = ring.to_vec();
    loop {
        let n = pts.len();
        if n < 3 {
            return pts;
        }
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let cur = pts[i];
            let next = pts[(i + 1) % n];
            let e1 = cur - prev;
            let e2 = next - cur;
            let scale = e1.norm() * e2.norm();
            let degenerate = scale <= tol.distinct_sq;
            let straight = cross_2d(&e1, &e2).abs() <= tol.collinear * scale && e1.dot(&e2) >= 0.0;
            if !(degenerate || straight) {
                kept.push(cur);
            }
        }
        if kept.len() == n {
            return kept;
        }
        pts = kept;
    }
}
