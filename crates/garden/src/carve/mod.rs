//! Tine carving
//!
//! One call to [`CarveEngine::carve_tine`] is a complete, synchronous
//! unit: the mode is picked once, then either the normal strategy
//! (remove, then redeposit) or the digging strategy (remove only) runs
//! to completion.

mod digging;
mod normal;

use garden_config::RakeSettings;
use glam::Vec2;
use tracing::trace;

use crate::constants::{DEFAULT_AXIS, MIN_KERNEL_TOTAL};
use crate::digging::LayerPalette;
use crate::dirty::DirtyRegionTracker;
use crate::grid::GridState;
use crate::kernel::{DepositKernel, KernelCache};
use crate::profile::ProfileCache;
use crate::types::CarveMode;

/// Parameters shared by every tine of a carve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveParams {
    /// Channel depth below 1.0
    pub depth: f32,
    /// Lip height above 1.0
    pub rim: f32,
    /// Convergence toward the profile per carve, in (0, 1]
    pub blend: f32,
    /// Deposit kernel radius
    pub spread_radius: i32,
    /// Forward deposit offset as a multiple of tine radius
    pub forward_distance: f32,
    /// Side deposit offset as a multiple of tine radius
    pub side_distance: f32,
    /// Colors exposed while digging
    pub palette: LayerPalette,
}

impl CarveParams {
    pub fn from_settings(rake: &RakeSettings, palette: LayerPalette) -> Self {
        Self {
            depth: rake.depth,
            rim: rake.rim,
            blend: rake.effective_blend(),
            spread_radius: rake.spread_radius as i32,
            forward_distance: rake.forward_distance,
            side_distance: rake.side_distance,
            palette,
        }
    }
}

impl Default for CarveParams {
    fn default() -> Self {
        Self::from_settings(&RakeSettings::default(), LayerPalette::default())
    }
}

/// Totals for one carve, mainly for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarveReport {
    /// Height taken out of carved cells
    pub removed: f64,
    /// Height added to receiving cells
    pub deposited: f64,
    /// Number of cells that lost height
    pub cells_carved: usize,
    /// Deposits dropped because their kernel fell off the grid
    pub deposits_skipped: usize,
}

/// Height removed from one cell in pass 1, waiting to be redeposited
#[derive(Debug, Clone, Copy)]
pub(crate) struct Displacement {
    pub x: i32,
    pub y: i32,
    pub amount: f32,
    pub color: [f32; 3],
}

/// Applies tine profiles to the grid
#[derive(Debug, Default)]
pub struct CarveEngine {
    pub(crate) profiles: ProfileCache,
    pub(crate) kernels: KernelCache,
    pub(crate) displaced: Vec<Displacement>,
}

impl CarveEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carve one tine at `center` moving along `direction`.
    ///
    /// A degenerate direction falls back to the default axis; a radius
    /// below one or a non-finite center is a no-op.
    pub fn carve_tine(
        &mut self,
        grid: &mut GridState,
        dirty: &mut DirtyRegionTracker,
        mode: CarveMode,
        params: &CarveParams,
        center: Vec2,
        radius: f32,
        direction: Vec2,
    ) -> CarveReport {
        if !center.is_finite() || !radius.is_finite() || radius < 1.0 {
            return CarveReport::default();
        }
        let direction = stroke_axis(direction);

        let report = match mode {
            CarveMode::Normal => normal::carve(self, grid, dirty, params, center, radius, direction),
            CarveMode::Digging => digging::carve(self, grid, dirty, params, center, radius),
        };

        trace!(
            "carve_tine {:?} at ({:.1}, {:.1}) r={:.1}: removed={:.4} deposited={:.4} cells={}",
            mode, center.x, center.y, radius, report.removed, report.deposited, report.cells_carved
        );
        report
    }

    /// Drop cached profile and kernel
    pub fn invalidate_caches(&mut self) {
        self.profiles.invalidate();
        self.kernels.invalidate();
    }
}

/// Normalize a stroke direction, falling back to the default axis
pub fn stroke_axis(direction: Vec2) -> Vec2 {
    direction
        .try_normalize()
        .unwrap_or(Vec2::from_array(DEFAULT_AXIS))
}

/// Spread `amount` of sand of `color` around `(kx, ky)`.
///
/// Kernel weights are renormalized over the in-bounds entries when the
/// footprint crosses the grid edge. Returns the height actually added,
/// or None if the in-bounds weight is negligible and the deposit was
/// skipped.
pub(crate) fn deposit(
    grid: &mut GridState,
    kernel: &DepositKernel,
    kx: i32,
    ky: i32,
    amount: f32,
    color: [f32; 3],
    max_height: f32,
) -> Option<f64> {
    let r = kernel.radius();
    let fully_inside = kx - r >= 0
        && ky - r >= 0
        && kx + r < grid.width as i32
        && ky + r < grid.height as i32;

    let scale = if fully_inside {
        1.0
    } else {
        let total: f32 = kernel
            .entries()
            .filter(|&(dx, dy, _)| grid.cell_index(kx + dx, ky + dy).is_some())
            .map(|(_, _, w)| w)
            .sum();
        if total < MIN_KERNEL_TOTAL {
            return None;
        }
        1.0 / total
    };

    let mut added_total = 0.0f64;
    for (dx, dy, weight) in kernel.entries() {
        let Some(index) = grid.cell_index(kx + dx, ky + dy) else {
            continue;
        };
        let old_height = grid.heights()[index];
        let added = (weight * scale * amount).min(max_height - old_height);
        if added <= 0.0 {
            continue;
        }
        let new_height = old_height + added;
        grid.heights_mut()[index] = new_height;

        if new_height > 1e-6 {
            let old = grid.color(index);
            let mix = |o: f32, s: f32| (o * old_height + s * added) / new_height;
            grid.set_color(
                index,
                [mix(old[0], color[0]), mix(old[1], color[1]), mix(old[2], color[2])],
            );
        }
        added_total += added as f64;
    }
    Some(added_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DIGGING_MAX_HEIGHT, MIN_HEIGHT, NORMAL_MAX_HEIGHT, SAND_COLOR};

    fn scenario_params() -> CarveParams {
        CarveParams {
            depth: 0.3,
            rim: 0.1,
            blend: 1.0,
            spread_radius: 3,
            forward_distance: 1.2,
            side_distance: 1.0,
            palette: LayerPalette::Detailed,
        }
    }

    fn carve_at(
        engine: &mut CarveEngine,
        grid: &mut GridState,
        mode: CarveMode,
        params: &CarveParams,
        x: f32,
        y: f32,
        radius: f32,
        dir: Vec2,
    ) -> CarveReport {
        let mut dirty = DirtyRegionTracker::new();
        engine.carve_tine(grid, &mut dirty, mode, params, Vec2::new(x, y), radius, dir)
    }

    #[test]
    fn test_flat_grid_scenario() {
        let mut grid = GridState::new(100, 100);
        let mut engine = CarveEngine::new();
        let before = grid.total_mass();

        let report = carve_at(
            &mut engine,
            &mut grid,
            CarveMode::Normal,
            &scenario_params(),
            50.0,
            50.0,
            10.0,
            Vec2::ZERO,
        );

        let center = grid.height_at(50, 50).unwrap();
        assert!((center - 0.7).abs() < 1e-3, "center height {}", center);

        let mut rim_found = false;
        for y in 0..100 {
            for x in 0..100 {
                let d = (((x - 50) * (x - 50) + (y - 50) * (y - 50)) as f32).sqrt();
                if d > 8.5 && grid.height_at(x, y).unwrap() > 1.0 {
                    rim_found = true;
                }
            }
        }
        assert!(rim_found);

        let after = grid.total_mass();
        assert!((after - before).abs() < 1e-2, "mass drifted {} -> {}", before, after);
        assert!(report.removed > 0.0);
        assert_eq!(report.deposits_skipped, 0);
    }

    #[test]
    fn test_mass_bound_everywhere() {
        let mut grid = GridState::new(40, 30);
        let mut engine = CarveEngine::new();
        let params = CarveParams { blend: 0.6, ..scenario_params() };

        // Near edges and corners, so clipping and renormalization kick in
        let spots = [(2.0, 2.0), (38.0, 15.0), (20.0, 29.0), (20.0, 15.0), (0.0, 0.0)];
        for (i, &(x, y)) in spots.iter().enumerate() {
            let dir = Vec2::new(i as f32 - 2.0, 1.0);
            let heights_before = grid.heights().to_vec();
            carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, x, y, 6.0, dir);

            let mut gained = 0.0f64;
            let mut lost = 0.0f64;
            for (a, b) in heights_before.iter().zip(grid.heights()) {
                let delta = (*b - *a) as f64;
                if delta > 0.0 {
                    gained += delta;
                } else {
                    lost -= delta;
                }
            }
            assert!(gained <= lost + 1e-4, "gained {} lost {}", gained, lost);
            assert!(grid.heights().iter().all(|&h| (MIN_HEIGHT..=NORMAL_MAX_HEIGHT).contains(&h)));
        }
    }

    #[test]
    fn test_repeated_carves_respect_ceiling() {
        let mut grid = GridState::new(60, 60);
        let mut engine = CarveEngine::new();
        let params = CarveParams { depth: 0.9, ..scenario_params() };

        for _ in 0..40 {
            carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, 30.0, 30.0, 8.0, Vec2::X);
        }
        assert!(grid.heights().iter().all(|&h| (MIN_HEIGHT..=NORMAL_MAX_HEIGHT).contains(&h)));
    }

    #[test]
    fn test_partial_blend_converges() {
        let mut grid = GridState::new(60, 60);
        let mut engine = CarveEngine::new();
        let params = CarveParams { blend: 0.5, ..scenario_params() };

        carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, 30.0, 30.0, 10.0, Vec2::Y);
        let first = grid.height_at(30, 30).unwrap();
        assert!((first - 0.85).abs() < 1e-3);

        carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, 30.0, 30.0, 10.0, Vec2::Y);
        let second = grid.height_at(30, 30).unwrap();
        assert!(second < first && second > 0.7);
    }

    #[test]
    fn test_deposit_mixes_color_by_height() {
        let mut grid = GridState::new(20, 20);
        let kernel = DepositKernel::build(0);
        let added = deposit(&mut grid, &kernel, 5, 5, 0.5, [0.0, 0.0, 0.0], NORMAL_MAX_HEIGHT);

        assert!((added.unwrap() - 0.5).abs() < 1e-6);
        let color = grid.color_at(5, 5).unwrap();
        // 1.0 of sand mixed with 0.5 of black
        assert!((color[0] - SAND_COLOR[0] / 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_deposit_off_grid_is_skipped() {
        let mut grid = GridState::new(20, 20);
        let kernel = DepositKernel::build(2);
        let before = grid.heights().to_vec();

        assert_eq!(deposit(&mut grid, &kernel, -10, 5, 0.5, SAND_COLOR, NORMAL_MAX_HEIGHT), None);
        assert_eq!(grid.heights(), &before[..]);
    }

    #[test]
    fn test_deposit_at_edge_renormalizes() {
        let mut grid = GridState::new(20, 20);
        let kernel = DepositKernel::build(3);
        let added = deposit(&mut grid, &kernel, 0, 0, 0.2, SAND_COLOR, NORMAL_MAX_HEIGHT).unwrap();
        assert!((added - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_inputs_are_noops() {
        let mut grid = GridState::new(20, 20);
        let mut engine = CarveEngine::new();
        let params = scenario_params();
        let before = grid.heights().to_vec();

        let nan = carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, f32::NAN, 5.0, 5.0, Vec2::X);
        let tiny = carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, 5.0, 5.0, 0.5, Vec2::X);
        let off = carve_at(&mut engine, &mut grid, CarveMode::Normal, &params, 500.0, 500.0, 5.0, Vec2::X);

        assert_eq!(nan, CarveReport::default());
        assert_eq!(tiny, CarveReport::default());
        assert_eq!(off.cells_carved, 0);
        assert_eq!(grid.heights(), &before[..]);
    }

    #[test]
    fn test_carve_marks_dirty_footprint() {
        let mut grid = GridState::new(100, 100);
        let mut engine = CarveEngine::new();
        let mut dirty = DirtyRegionTracker::new();
        let before = grid.heights().to_vec();

        engine.carve_tine(
            &mut grid,
            &mut dirty,
            CarveMode::Normal,
            &scenario_params(),
            Vec2::new(50.0, 50.0),
            10.0,
            Vec2::new(1.0, 1.0),
        );

        let rect = dirty.peek().unwrap();
        for y in 0..100 {
            for x in 0..100 {
                let i = grid.cell_index(x, y).unwrap();
                if grid.heights()[i] != before[i] {
                    assert!(rect.contains(x, y), "({}, {}) changed outside dirty rect", x, y);
                }
            }
        }
    }

    #[test]
    fn test_digging_scenario() {
        let mut grid = GridState::new(60, 60);
        grid.fill(DIGGING_MAX_HEIGHT, SAND_COLOR);
        let mut engine = CarveEngine::new();
        let before = grid.heights().to_vec();

        let report = carve_at(
            &mut engine,
            &mut grid,
            CarveMode::Digging,
            &scenario_params(),
            30.0,
            30.0,
            10.0,
            Vec2::X,
        );

        // hardness is 1 at the surface, so the center loses exactly 1 - 0.7
        let center = grid.height_at(30, 30).unwrap();
        assert!((center - 1.7).abs() < 1e-4, "center {}", center);

        // nothing rose anywhere
        assert!(grid.heights().iter().zip(&before).all(|(a, b)| a <= b));
        assert_eq!(report.deposited, 0.0);
        assert!(report.removed > 0.0);
    }

    #[test]
    fn test_digging_skips_rim_and_hardens() {
        let mut grid = GridState::new(60, 60);
        grid.fill(DIGGING_MAX_HEIGHT, SAND_COLOR);
        let mut engine = CarveEngine::new();
        let params = scenario_params();

        carve_at(&mut engine, &mut grid, CarveMode::Digging, &params, 30.0, 30.0, 10.0, Vec2::X);
        // t = 0.9 sits on the falling rim
        assert_eq!(grid.height_at(39, 30), Some(DIGGING_MAX_HEIGHT));

        let first_drop = DIGGING_MAX_HEIGHT - grid.height_at(30, 30).unwrap();
        let before = grid.height_at(30, 30).unwrap();
        carve_at(&mut engine, &mut grid, CarveMode::Digging, &params, 30.0, 30.0, 10.0, Vec2::X);
        let second_drop = before - grid.height_at(30, 30).unwrap();
        assert!(second_drop < first_drop);

        // color follows depth
        let expected = params.palette.color_for_height(grid.height_at(30, 30).unwrap());
        assert_eq!(grid.color_at(30, 30), Some(expected));
    }

    #[test]
    fn test_digging_floor_holds() {
        let mut grid = GridState::new(40, 40);
        grid.fill(DIGGING_MAX_HEIGHT, SAND_COLOR);
        let mut engine = CarveEngine::new();
        let params = CarveParams { depth: 0.9, ..scenario_params() };

        for _ in 0..200 {
            carve_at(&mut engine, &mut grid, CarveMode::Digging, &params, 20.0, 20.0, 6.0, Vec2::X);
        }
        assert!(grid.heights().iter().all(|&h| (MIN_HEIGHT..=DIGGING_MAX_HEIGHT).contains(&h)));
        assert!((grid.height_at(20, 20).unwrap() - MIN_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn test_stroke_axis_fallback() {
        assert_eq!(stroke_axis(Vec2::ZERO), Vec2::new(0.0, 1.0));
        assert_eq!(stroke_axis(Vec2::new(f32::NAN, 1.0)), Vec2::new(0.0, 1.0));
        assert!((stroke_axis(Vec2::new(3.0, 4.0)) - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }
}
