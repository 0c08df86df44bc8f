use tracing::trace;

use crate::geometry::{Contour, Region};
use crate::math::Tolerances;
use crate::operations::offset::MiterOffset2D;
use crate::toolpath::{FeaturePath, Role};

/// Generates perimeter walls for one region.
///
/// The outer boundary and each hole are inset independently `perimeters`
/// times by `line_width`. The very first loop of the outer boundary is the
/// outer wall; every other loop, including all hole loops, is an inner wall.
#[derive(Debug)]
pub struct GenerateShells<'a> {
    region: &'a Region,
    line_width: f64,
    perimeters: usize,
    tolerances: Tolerances,
}

impl<'a> GenerateShells<'a> {
    /// Creates a new shell generation.
    #[must_use]
    pub fn new(region: &'a Region, line_width: f64, perimeters: usize) -> Self {
        Self {
            region,
            line_width,
            perimeters,
            tolerances: Tolerances::default(),
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: &Tolerances) -> Self {
        self.tolerances = *tolerances;
        self
    }

    /// Executes the generation, returning closed wall loops: outer boundary
    /// shells first, then each hole's shells.
    #[must_use]
    pub fn execute(&self) -> Vec<FeaturePath> {
        let mut walls = Vec::new();
        self.push_shells(&self.region.outer, true, &mut walls);
        for hole in &self.region.holes {
            self.push_shells(hole, false, &mut walls);
        }
        walls
    }

    /// Loops of one boundary, innermost last. The last inset is only
    /// computed when another wall still needs it.
    #[must_use]
    pub fn insets(&self, boundary: &Contour) -> Vec<Contour> {
        let mut loops = Vec::with_capacity(self.perimeters);
        let mut current = boundary.clone();
        for k in 0..self.perimeters {
            if k + 1 == self.perimeters {
                loops.push(current);
                break;
            }
            let next = MiterOffset2D::new(current.ring(), self.line_width)
                .with_tolerances(&self.tolerances)
                .execute();
            loops.push(current);
            match next {
                Ok(inset) => current = inset,
                Err(err) => {
                    trace!(perimeter = k + 1, %err, "shell inset stopped");
                    break;
                }
            }
        }
        loops
    }

    fn push_shells(&self, boundary: &Contour, is_outer: bool, walls: &mut Vec<FeaturePath>) {
        for (k, ring) in self.insets(boundary).into_iter().enumerate() {
            let role = if is_outer && k == 0 {
                Role::WallOuter
            } else {
                Role::WallInner
            };
            walls.push(FeaturePath::new(role, ring.into_points()));
        }
    }
}
