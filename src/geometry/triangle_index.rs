use super::Mesh;

/// Z-span index over a mesh's triangles.
///
/// Built once per mesh and owned by the caller; slicing operations borrow it
/// to skip triangles that cannot reach a given plane. The index never changes
/// which segments a plane produces, only how many triangles are visited.
#[derive(Debug, Clone)]
pub struct TriangleIndex {
    /// Triangle ids sorted by ascending minimum Z.
    order: Vec<u32>,
    /// Minimum Z of each entry in `order`.
    min_z: Vec<f64>,
    /// Maximum Z of each triangle, indexed by triangle id.
    max_z: Vec<f64>,
    /// Largest Z extent of any triangle.
    max_span: f64,
}

impl TriangleIndex {
    /// Builds the index for `mesh`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(mesh: &Mesh) -> Self {
        let count = mesh.triangle_count();
        let mut spans = Vec::with_capacity(count);
        let mut max_z = Vec::with_capacity(count);
        let mut max_span: f64 = 0.0;
        for (i, tri) in mesh.triangles().enumerate() {
            let lo = tri[0].z.min(tri[1].z).min(tri[2].z);
            let hi = tri[0].z.max(tri[1].z).max(tri[2].z);
            spans.push((lo, i as u32));
            max_z.push(hi);
            max_span = max_span.max(hi - lo);
        }
        spans.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Self {
            order: spans.iter().map(|s| s.1).collect(),
            min_z: spans.iter().map(|s| s.0).collect(),
            max_z,
            max_span,
        }
    }

    /// Number of indexed triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Triangle ids whose Z extent, widened by `slack`, contains `z`,
    /// in ascending id order.
    #[must_use]
    pub fn candidates(&self, z: f64, slack: f64) -> Vec<usize> {
        // Any triangle reaching z has min_z in [z - max_span - slack, z + slack].
        let lo = self
            .min_z
            .partition_point(|&m| m < z - self.max_span - slack);
        let hi = self.min_z.partition_point(|&m| m <= z + slack);
        let mut ids: Vec<usize> = self.order[lo..hi]
            .iter()
            .map(|&id| id as usize)
            .filter(|&id| self.max_z[id] >= z - slack)
            .collect();
        ids.sort_unstable();
        ids
    }
}
