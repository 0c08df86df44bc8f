mod contour;
mod mesh;
mod region;
mod triangle_index;

pub use contour::Contour;
pub use mesh::{Aabb, Mesh};
pub use region::Region;
pub use triangle_index::TriangleIndex;

use crate::math::Point2;

/// A section segment: one triangle cut by one horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub a: Point2,
    pub b: Point2,
}

impl Segment2 {
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.a, &self.b)
    }

    #[must_use]
    pub fn length_sq(&self) -> f64 {
        (self.b - self.a).norm_squared()
    }
}
