//! Digging: excavate the channel, harder the deeper it goes, and
//! discard what was removed.

use glam::Vec2;

use super::{CarveEngine, CarveParams, CarveReport};
use crate::constants::{DIGGING_MAX_HEIGHT, DIRTY_PAD, FLAT_HEIGHT, MIN_HEIGHT};
use crate::digging::dig_depth;
use crate::dirty::DirtyRegionTracker;
use crate::grid::GridState;

/// Resistance multiplier: 1 at the digging surface, 4 at the floor
#[inline]
pub(crate) fn hardness(height: f32) -> f32 {
    1.0 + 3.0 * dig_depth(height)
}

pub(super) fn carve(
    engine: &mut CarveEngine,
    grid: &mut GridState,
    dirty: &mut DirtyRegionTracker,
    params: &CarveParams,
    center: Vec2,
    radius: f32,
) -> CarveReport {
    let mut report = CarveReport::default();

    let profile = engine.profiles.resolve(radius, params.depth, params.rim);
    if profile.is_empty() {
        return report;
    }
    let r = profile.radius();
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;

    for dy in -r..=r {
        for dx in -r..=r {
            let Some(target) = profile.sample(dx, dy) else {
                continue;
            };
            // Digging never builds rims
            if target >= FLAT_HEIGHT {
                continue;
            }
            let Some(index) = grid.cell_index(cx + dx, cy + dy) else {
                continue;
            };

            let current = grid.heights()[index];
            let remove = (FLAT_HEIGHT - target) * params.blend / hardness(current);
            let dug = (current - remove).clamp(MIN_HEIGHT, DIGGING_MAX_HEIGHT);
            if dug >= current {
                continue;
            }

            grid.heights_mut()[index] = dug;
            grid.set_color(index, params.palette.color_for_height(dug));
            report.removed += (current - dug) as f64;
            report.cells_carved += 1;
        }
    }
    dirty.mark_around(cx, cy, r + DIRTY_PAD);

    report
}
