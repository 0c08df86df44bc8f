use super::Contour;
use crate::math::Point2;

/// One outer boundary plus the holes directly nested in it.
///
/// The outer contour is counter-clockwise and every hole is clockwise, so
/// the material always lies to the left of the walking direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl Region {
    /// Creates a region, enforcing the orientation convention.
    #[must_use]
    pub fn new(outer: Contour, holes: Vec<Contour>) -> Self {
        Self {
            outer: outer.oriented(true),
            holes: holes.into_iter().map(|h| h.oriented(false)).collect(),
        }
    }

    /// Returns `true` if `pt` lies inside any hole.
    #[must_use]
    pub fn in_hole(&self, pt: &Point2) -> bool {
        self.holes.iter().any(|h| h.contains_point(pt))
    }

    /// Returns `true` if `pt` lies inside the outer boundary and outside
    /// every hole.
    #[must_use]
    pub fn contains_point(&self, pt: &Point2) -> bool {
        self.outer.contains_point(pt) && !self.in_hole(pt)
    }

    /// Outer area minus hole areas.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Contour::area).sum::<f64>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        Contour::from_ring(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn new_enforces_orientation() {
        let region = Region::new(rect(0.0, 0.0, 10.0, 10.0).reversed(), vec![rect(4.0, 4.0, 6.0, 6.0)]);
        assert!(region.outer.signed_area() > 0.0);
        assert!(region.holes[0].signed_area() < 0.0);
        assert!((region.net_area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn hole_points_are_not_material() {
        let region = Region::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(4.0, 4.0, 6.0, 6.0)]);
        assert!(region.in_hole(&Point2::new(5.0, 5.0)));
        assert!(!region.contains_point(&Point2::new(5.0, 5.0)));
        assert!(region.contains_point(&Point2::new(1.0, 5.0)));
    }
}
