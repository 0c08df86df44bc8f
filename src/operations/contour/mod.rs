//! Reconstruction of closed contours from an unordered bag of section
//! segments.
//!
//! The pipeline for one layer:
//!
//! 1. hash segment endpoints on a grid of `quantize` cells,
//! 2. walk unused segments end to end until the chain returns to its start,
//! 3. clean each closed chain ([`clean`]): closure, duplicates, collinear
//!    vertices,
//! 4. split self-intersecting chains into simple loops ([`split`]).
//!
//! Chains that never close, collapse, or cannot be split within the depth
//! guard are dropped and counted; the rest of the layer is unaffected.

mod clean;
mod split;

pub use clean::{normalize_closure, strip_collinear};
pub use split::{first_crossing, split_self_intersections};

use std::collections::HashMap;

use tracing::trace;

use crate::error::Result;
use crate::geometry::{Contour, Segment2};
use crate::math::{Point2, Tolerances};

type CellKey = (i64, i64);

/// Output of [`BuildContours`].
#[derive(Debug, Clone, Default)]
pub struct ContourBuild {
    /// Simple closed contours, in discovery order.
    pub contours: Vec<Contour>,
    /// Chains discarded as open, collapsed, or unsplittable.
    pub dropped: usize,
}

/// Stitches section segments into simple closed contours.
#[derive(Debug)]
pub struct BuildContours {
    segments: Vec<Segment2>,
    tolerances: Tolerances,
}

impl BuildContours {
    /// Creates a new contour build with default tolerances.
    #[must_use]
    pub fn new(segments: Vec<Segment2>) -> Self {
        Self {
            segments,
            tolerances: Tolerances::default(),
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Executes the walk and cleanup.
    #[must_use]
    pub fn execute(&self) -> ContourBuild {
        let mut build = ContourBuild::default();
        for chain in self.walk_chains(&mut build.dropped) {
            match self.clean_chain(&chain) {
                Ok(contours) if !contours.is_empty() => build.contours.extend(contours),
                Ok(_) => {
                    trace!(points = chain.len(), "contour collapsed during cleanup");
                    build.dropped += 1;
                }
                Err(err) => {
                    trace!(points = chain.len(), %err, "contour dropped");
                    build.dropped += 1;
                }
            }
        }
        build
    }

    /// Greedy endpoint walk. Returns closed chains; the last point of each
    /// chain lies within `quantize` of the first.
    fn walk_chains(&self, dropped: &mut usize) -> Vec<Vec<Point2>> {
        let q = self.tolerances.quantize;
        let mut adjacency: HashMap<CellKey, Vec<(usize, bool)>> = HashMap::new();
        for (i, seg) in self.segments.iter().enumerate() {
            adjacency.entry(cell_key(&seg.a, q)).or_default().push((i, false));
            adjacency.entry(cell_key(&seg.b, q)).or_default().push((i, true));
        }

        let mut used = vec![false; self.segments.len()];
        let mut chains = Vec::new();

        for start in 0..self.segments.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let seg = self.segments[start];
            let start_key = cell_key(&seg.a, q);
            let mut chain = vec![seg.a, seg.b];
            let mut closed = false;

            for _ in 0..self.tolerances.max_walk_steps {
                let cur = chain[chain.len() - 1];
                if chain.len() > 2
                    && (cell_key(&cur, q) == start_key || (cur - chain[0]).norm() <= q)
                {
                    closed = true;
                    break;
                }
                let Some((idx, at_b)) = next_incident(&adjacency, &self.segments, &used, &cur, q)
                else {
                    break;
                };
                used[idx] = true;
                let next = &self.segments[idx];
                chain.push(if at_b { next.a } else { next.b });
            }

            if closed && chain.len() >= 4 {
                chains.push(chain);
            } else {
                trace!(points = chain.len(), closed, "open chain discarded");
                *dropped += 1;
            }
        }
        chains
    }

    fn clean_chain(&self, chain: &[Point2]) -> Result<Vec<Contour>> {
        let tol = &self.tolerances;
        let ring = normalize_closure(chain, tol)?;
        let ring = strip_collinear(&ring, tol);
        split_self_intersections(&ring, tol, tol.max_split_depth)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_key(p: &Point2, q: f64) -> CellKey {
    ((p.x / q).round() as i64, (p.y / q).round() as i64)
}

/// First unused segment with an endpoint at `cur`: the point's own cell is
/// searched first, then the eight neighbours (for points that straddle a cell
/// border), where the endpoint must lie within `q`.
fn next_incident(
    adjacency: &HashMap<CellKey, Vec<(usize, bool)>>,
    segments: &[Segment2],
    used: &[bool],
    cur: &Point2,
    q: f64,
) -> Option<(usize, bool)> {
    let (kx, ky) = cell_key(cur, q);
    if let Some(hit) = adjacency
        .get(&(kx, ky))
        .and_then(|list| list.iter().copied().find(|&(i, _)| !used[i]))
    {
        return Some(hit);
    }
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let Some(list) = adjacency.get(&(kx + dx, ky + dy)) else {
                continue;
            };
            let hit = list.iter().copied().find(|&(i, at_b)| {
                let end = if at_b { segments[i].b } else { segments[i].a };
                !used[i] && (end - cur).norm() <= q
            });
            if hit.is_some() {
                return hit;
            }
        }
    }
    None
}
