use crate::error::{ContourError, Result};
use crate::math::polygon_2d::{centroid_2d, point_in_polygon_2d, signed_area_2d, Bounds2};
use crate::math::Point2;

/// A closed planar loop.
///
/// The first point is repeated bit-identically as the last one, so a contour
/// always holds at least four points.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    /// Closes `ring` (points without repetition) into a contour.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Collapsed` if fewer than three points are given.
    pub fn from_ring(mut ring: Vec<Point2>) -> Result<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(ContourError::Collapsed(format!(
                "{} distinct points, need at least 3",
                ring.len()
            ))
            .into());
        }
        ring.push(ring[0]);
        Ok(Self { points: ring })
    }

    /// All points including the closing repetition.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Points without the closing repetition.
    #[must_use]
    pub fn ring(&self) -> &[Point2] {
        &self.points[..self.points.len() - 1]
    }

    /// Number of distinct vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Signed area; positive for counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(self.ring())
    }

    /// Unsigned area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Area centroid.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        centroid_2d(self.ring()).unwrap_or(self.points[0])
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds2 {
        let first = self.points[0];
        Bounds2::from_points(&self.points).unwrap_or(Bounds2 {
            min: first,
            max: first,
        })
    }

    /// Even-odd containment test.
    #[must_use]
    pub fn contains_point(&self, pt: &Point2) -> bool {
        point_in_polygon_2d(pt, self.ring())
    }

    /// Same loop walked the other way; the start point is kept.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Returns this contour oriented counter-clockwise (`ccw = true`) or
    /// clockwise.
    #[must_use]
    pub fn oriented(self, ccw: bool) -> Self {
        if self.is_ccw() == ccw {
            self
        } else {
            self.reversed()
        }
    }

    /// Consumes the contour, returning all points including closure.
    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }
}
