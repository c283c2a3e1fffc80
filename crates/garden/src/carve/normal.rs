//! Normal raking: pull cells toward the profile, then push the removed
//! sand forward and to both sides.

use glam::Vec2;

use super::{deposit, CarveEngine, CarveParams, CarveReport, Displacement};
use crate::constants::{DIRTY_PAD, FORWARD_SHARE, MIN_HEIGHT, SIDE_SHARE};
use crate::dirty::DirtyRegionTracker;
use crate::grid::GridState;
use crate::types::CarveMode;

pub(super) fn carve(
    engine: &mut CarveEngine,
    grid: &mut GridState,
    dirty: &mut DirtyRegionTracker,
    params: &CarveParams,
    center: Vec2,
    radius: f32,
    direction: Vec2,
) -> CarveReport {
    let CarveEngine {
        profiles,
        kernels,
        displaced,
    } = engine;
    let mut report = CarveReport::default();

    let profile = profiles.resolve(radius, params.depth, params.rim);
    if profile.is_empty() {
        return report;
    }
    let r = profile.radius();
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    let blend = params.blend;

    // Pass 1: lower cells toward the profile and remember what left them
    displaced.clear();
    for dy in -r..=r {
        for dx in -r..=r {
            let Some(target) = profile.sample(dx, dy) else {
                continue;
            };
            let (x, y) = (cx + dx, cy + dy);
            let Some(index) = grid.cell_index(x, y) else {
                continue;
            };

            let current = grid.heights()[index];
            let blended = current * (1.0 - blend) + target * blend;
            if current <= blended {
                continue;
            }
            let lowered = blended.max(MIN_HEIGHT);
            let amount = current - lowered;
            if amount <= 0.0 {
                continue;
            }

            grid.heights_mut()[index] = lowered;
            displaced.push(Displacement {
                x,
                y,
                amount,
                color: grid.color(index),
            });
            report.removed += amount as f64;
            report.cells_carved += 1;
        }
    }
    dirty.mark_around(cx, cy, r + DIRTY_PAD);

    if displaced.is_empty() {
        return report;
    }

    // Pass 2: redistribute, 70% ahead of the tine and 15% to each side
    let kernel = kernels.resolve(params.spread_radius);
    let max_height = CarveMode::Normal.max_height();
    let perpendicular = Vec2::new(-direction.y, direction.x);
    let reach = r as f32;
    let forward = direction * reach * params.forward_distance;
    let side = perpendicular * reach * params.side_distance;

    for d in displaced.iter() {
        let source = Vec2::new(d.x as f32, d.y as f32);
        let targets = [
            (source + forward, FORWARD_SHARE),
            (source + side, SIDE_SHARE),
            (source - side, SIDE_SHARE),
        ];
        for (target, share) in targets {
            let kx = target.x.round() as i32;
            let ky = target.y.round() as i32;
            match deposit(grid, kernel, kx, ky, d.amount * share, d.color, max_height) {
                Some(added) => report.deposited += added,
                None => report.deposits_skipped += 1,
            }
            dirty.mark_around(kx, ky, kernel.radius() + DIRTY_PAD);
        }
    }

    report
}
