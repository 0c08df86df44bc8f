//! Composite patterns built from line families.

use std::f64::consts::TAU;

use super::raster::LineFamily;
use super::{InfillPattern, InfillSettings};
use crate::geometry::Segment2;
use crate::math::{left_normal, Point2};

/// Wave amplitude as a fraction of the line spacing.
const WAVE_AMPLITUDE: f64 = 0.25;
/// Wavelength as a multiple of the line spacing.
const WAVE_LENGTH: f64 = 2.0;
/// Samples per wavelength.
const WAVE_SAMPLES: f64 = 8.0;

/// Line families laid down for a line-based pattern.
pub(super) fn families(s: &InfillSettings) -> Vec<LineFamily> {
    let a = s.angle_deg;
    let sp = s.spacing;
    let fam = |offset: f64, mult: f64| LineFamily::new(a + offset, sp * mult, s.phase);
    match s.pattern {
        InfillPattern::Lines | InfillPattern::Zigzag | InfillPattern::Waves => vec![fam(0.0, 1.0)],
        InfillPattern::Grid => vec![fam(0.0, 2.0), fam(90.0, 2.0)],
        InfillPattern::Cross => vec![fam(45.0, 2.0), fam(-45.0, 2.0)],
        InfillPattern::Triangles => vec![fam(0.0, 3.0), fam(60.0, 3.0), fam(120.0, 3.0)],
        InfillPattern::Octagrid => vec![
            fam(0.0, 4.0),
            fam(45.0, 4.0),
            fam(90.0, 4.0),
            fam(135.0, 4.0),
        ],
        InfillPattern::Honeycomb => (0..3)
            .map(|k| {
                let k = f64::from(k);
                LineFamily::new(a + 60.0 * k, sp * 3.0, s.phase + k * sp * 1.5)
            })
            .collect(),
        InfillPattern::Cubic => {
            let turn = f64::from(u8::try_from(s.layer_index % 3).unwrap_or(0));
            vec![LineFamily::new(
                a + 120.0 * turn,
                sp,
                s.phase + s.z.rem_euclid(sp),
            )]
        }
        InfillPattern::Gyroid2d => {
            let turn = if s.layer_index % 2 == 0 { 0.0 } else { 90.0 };
            vec![fam(turn, 1.0)]
        }
        InfillPattern::Concentric => Vec::new(),
    }
}

/// Phase of the sine perturbation: fixed for waves, tracking Z for gyroid.
pub(super) fn wave_phase(s: &InfillSettings) -> f64 {
    if s.pattern == InfillPattern::Gyroid2d {
        TAU * s.z / (WAVE_LENGTH * s.spacing)
    } else {
        0.0
    }
}

/// Resamples `seg` and displaces each sample sideways by a sine wave.
///
/// The wave is keyed to the absolute position along the line direction so
/// neighbouring lines stay in step. Amplitude tapers to zero over the first
/// and last quarter wavelength, so the endpoints are kept. Each sample moves
/// no further than `clearance` reports for its base point, which keeps the
/// wave off the region boundary.
pub(super) fn wave<F>(seg: &Segment2, spacing: f64, phase: f64, clearance: F) -> Vec<Point2>
where
    F: Fn(&Point2) -> f64,
{
    let delta = seg.b - seg.a;
    let len = delta.norm();
    let wavelength = WAVE_LENGTH * spacing;
    if len <= f64::EPSILON || wavelength <= 0.0 {
        return vec![seg.a, seg.b];
    }
    let dir = delta / len;
    // Orientation-independent frame so serpentine lines wave in step.
    let (axis, side) = if dir.x > 0.0 || (dir.x == 0.0 && dir.y > 0.0) {
        (dir, left_normal(&dir))
    } else {
        (-dir, left_normal(&-dir))
    };
    let amplitude = WAVE_AMPLITUDE * spacing;
    let taper_len = 0.25 * wavelength;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((len / wavelength * WAVE_SAMPLES).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let t = len * i as f64 / steps as f64;
        let base = seg.a + dir * t;
        let along = axis.dot(&base.coords);
        let taper = (t.min(len - t) / taper_len).clamp(0.0, 1.0);
        let room = clearance(&base).max(0.0);
        let wobble = amplitude * taper * (TAU * along / wavelength + phase).sin();
        let offset = wobble.clamp(-room, room);
        points.push(base + side * offset);
    }
    points
}
