use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::geometry::{Contour, Region};
use crate::math::polygon_2d::Bounds2;
use crate::math::Tolerances;

new_key_type! {
    /// Handle of a contour inside one nesting pass.
    pub struct ContourId;
}

#[derive(Debug)]
struct NestNode {
    contour: Contour,
    area: f64,
    bounds: Bounds2,
    parent: Option<ContourId>,
    depth: usize,
}

/// Groups the closed contours of one layer into regions with holes.
///
/// Each contour's parent is the smallest strictly larger contour that
/// contains its first vertex. Contours at even nesting depth become region
/// outers (counter-clockwise); odd-depth contours become holes of their
/// parent (clockwise).
#[derive(Debug)]
pub struct NestRegions {
    contours: Vec<Contour>,
    tolerances: Tolerances,
}

impl NestRegions {
    /// Creates a new nesting operation.
    #[must_use]
    pub fn new(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            tolerances: Tolerances::default(),
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Executes the nesting, returning regions ordered by descending outer
    /// area.
    #[must_use]
    pub fn execute(self) -> Vec<Region> {
        let min_area = self.tolerances.area_collapse;
        let mut store: SlotMap<ContourId, NestNode> = SlotMap::with_key();
        let mut ids: Vec<ContourId> = self
            .contours
            .into_iter()
            .filter(|c| c.area() >= min_area)
            .map(|contour| {
                store.insert(NestNode {
                    area: contour.area(),
                    bounds: contour.bounds(),
                    contour,
                    parent: None,
                    depth: 0,
                })
            })
            .collect();

        // Stable: equal areas keep discovery order.
        ids.sort_by(|&a, &b| store[b].area.total_cmp(&store[a].area));

        // Candidates for ids[i] are ids[..i]; scanning backwards finds the
        // smallest enclosing contour first.
        for i in 0..ids.len() {
            let child = ids[i];
            let probe = store[child].contour.points()[0];
            let child_area = store[child].area;
            let parent = ids[..i].iter().rev().copied().find(|&cand| {
                let node = &store[cand];
                node.area > child_area
                    && node.bounds.contains(&probe)
                    && node.contour.contains_point(&probe)
            });
            if let Some(parent) = parent {
                let depth = store[parent].depth + 1;
                let node = &mut store[child];
                node.parent = Some(parent);
                node.depth = depth;
            }
        }

        let mut outer_order: Vec<ContourId> = Vec::new();
        let mut holes: HashMap<ContourId, Vec<ContourId>> = HashMap::new();
        for &id in &ids {
            let node = &store[id];
            if node.depth % 2 == 0 {
                outer_order.push(id);
            } else if let Some(owner) = even_ancestor(&store, id) {
                holes.entry(owner).or_default().push(id);
            }
        }

        outer_order
            .into_iter()
            .map(|id| {
                let hole_contours = holes
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|h| store[h].contour.clone())
                    .collect();
                Region::new(store[id].contour.clone(), hole_contours)
            })
            .collect()
    }
}

/// Nearest ancestor at even depth.
fn even_ancestor(store: &SlotMap<ContourId, NestNode>, id: ContourId) -> Option<ContourId> {
    let mut cur = store[id].parent;
    while let Some(p) = cur {
        if store[p].depth % 2 == 0 {
            return Some(p);
        }
        cur = store[p].parent;
    }
    None
}
