use crate::geometry::{Mesh, Segment2, TriangleIndex};
use crate::math::{Point2, Point3, Tolerances};

/// Intersects a mesh with the horizontal plane `z = height`.
///
/// Produces an unordered bag of segments, one per triangle that crosses the
/// plane with two distinct intersection points. Triangles whose edges are
/// degenerate or only touch the plane contribute nothing.
#[derive(Debug)]
pub struct PlaneSection<'a> {
    mesh: &'a Mesh,
    height: f64,
    tolerances: Tolerances,
    index: Option<&'a TriangleIndex>,
}

impl<'a> PlaneSection<'a> {
    /// Creates a new section operation with default tolerances.
    #[must_use]
    pub fn new(mesh: &'a Mesh, height: f64) -> Self {
        Self {
            mesh,
            height,
            tolerances: Tolerances::default(),
            index: None,
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Restricts the scan to triangles the index reports for this height.
    #[must_use]
    pub fn with_index(mut self, index: &'a TriangleIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Executes the section.
    #[must_use]
    pub fn execute(&self) -> Vec<Segment2> {
        let eps = self.tolerances.plane;
        match self.index {
            Some(index) => index
                .candidates(self.height, eps)
                .into_iter()
                .filter_map(|i| self.intersect(&self.mesh.triangle(i)))
                .collect(),
            None => self
                .mesh
                .triangles()
                .filter_map(|tri| self.intersect(&tri))
                .collect(),
        }
    }

    fn intersect(&self, tri: &[Point3; 3]) -> Option<Segment2> {
        intersect_triangle(tri, self.height, &self.tolerances)
    }
}

/// Cuts one triangle with the plane `z = height`.
#[must_use]
pub fn intersect_triangle(tri: &[Point3; 3], height: f64, tol: &Tolerances) -> Option<Segment2> {
    let eps = tol.plane;
    let lo = tri[0].z.min(tri[1].z).min(tri[2].z);
    let hi = tri[0].z.max(tri[1].z).max(tri[2].z);
    if lo > height + eps || hi < height - eps {
        return None;
    }

    let mut hits: [Point2; 3] = [Point2::origin(); 3];
    let mut count = 0;
    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        let p = tri[i];
        let q = tri[j];
        let dz = q.z - p.z;
        if dz.abs() <= eps {
            continue;
        }
        let t = (height - p.z) / dz;
        if t < -eps || t > 1.0 + eps {
            continue;
        }
        hits[count] = Point2::new(p.x + t * (q.x - p.x), p.y + t * (q.y - p.y));
        count += 1;
    }

    let (a, b) = match count {
        2 => (hits[0], hits[1]),
        3 => farthest_pair(&hits),
        _ => return None,
    };
    let seg = Segment2::new(a, b);
    (seg.length_sq() > tol.distinct_sq).then_some(seg)
}

fn farthest_pair(pts: &[Point2; 3]) -> (Point2, Point2) {
    let mut best = (pts[0], pts[1]);
    let mut best_d = (pts[1] - pts[0]).norm_squared();
    for (i, j) in [(1, 2), (2, 0)] {
        let d = (pts[j] - pts[i]).norm_squared();
        if d > best_d {
            best_d = d;
            best = (pts[i], pts[j]);
        }
    }
    best
}
