use crate::math::Point3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Returns `true` if every coordinate is finite and `min <= max`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        finite && self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Extent along Z.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }
}

/// Immutable triangle soup.
///
/// Triangles are stored flat, nine `f32` values per triangle (three vertices,
/// `x y z` each). The bounding box is computed once at construction.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<f32>,
    bounds: Option<Aabb>,
}

impl Mesh {
    /// Builds a mesh from flat triangle data. A trailing partial triangle is
    /// ignored.
    #[must_use]
    pub fn new(mut triangles: Vec<f32>) -> Self {
        triangles.truncate(triangles.len() - triangles.len() % 9);
        let bounds = compute_bounds(&triangles);
        Self { triangles, bounds }
    }

    /// Builds a mesh from explicit triangle vertices.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_triangles(triangles: &[[Point3; 3]]) -> Self {
        let mut flat = Vec::with_capacity(triangles.len() * 9);
        for tri in triangles {
            for v in tri {
                flat.extend([v.x as f32, v.y as f32, v.z as f32]);
            }
        }
        Self::new(flat)
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 9
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertices of triangle `index`, widened to `f64`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> [Point3; 3] {
        let t = &self.triangles[index * 9..index * 9 + 9];
        let v = |k: usize| {
            Point3::new(
                f64::from(t[k * 3]),
                f64::from(t[k * 3 + 1]),
                f64::from(t[k * 3 + 2]),
            )
        };
        [v(0), v(1), v(2)]
    }

    /// Iterates over all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }

    /// Cached bounding box; `None` when the mesh is empty or contains
    /// non-finite coordinates.
    #[must_use]
    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    /// The raw flat triangle buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f32] {
        &self.triangles
    }
}

fn compute_bounds(flat: &[f32]) -> Option<Aabb> {
    if flat.is_empty() {
        return None;
    }
    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for v in flat.chunks_exact(3) {
        for k in 0..3 {
            let c = f64::from(v[k]);
            min[k] = min[k].min(c);
            max[k] = max[k].max(c);
        }
    }
    let aabb = Aabb { min, max };
    if flat.iter().all(|v| v.is_finite()) && aabb.is_valid() {
        Some(aabb)
    } else {
        None
    }
}
