use tracing::trace;

use crate::geometry::{Contour, Region};
use crate::math::Tolerances;
use crate::operations::offset::MiterOffset2D;

/// Guard against pathological inputs that never collapse.
const MAX_RINGS: usize = 10_000;

/// Successive insets of the region's outer boundary at `spacing`, outermost
/// first, until the offset collapses.
pub(super) fn rings(region: &Region, spacing: f64, tol: &Tolerances) -> Vec<Contour> {
    let mut rings = Vec::new();
    let mut current = region.outer.clone();
    while rings.len() < MAX_RINGS {
        match MiterOffset2D::new(current.ring(), spacing)
            .with_tolerances(tol)
            .execute()
        {
            Ok(inset) => {
                rings.push(inset.clone());
                current = inset;
            }
            Err(err) => {
                trace!(rings = rings.len(), %err, "concentric fill stopped");
                break;
            }
        }
    }
    rings
}
