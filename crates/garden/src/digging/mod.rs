//! Digging mode
//!
//! Entering digging mode saves the garden, raises the whole surface to
//! the digging level and buries the day's message under it. Exiting
//! puts the saved garden back exactly as it was.
//!
//! - [`DiggingController`] - the Normal/Digging state machine
//! - [`RevealMask`] - cells that belong to the hidden message
//! - [`LayerPalette`] - depth to color mapping for excavated cells
//! - [`TextRasterizer`] - capability used to draw the message

mod layers;
mod quotes;
mod reveal;
mod text;

pub use layers::{dig_depth, LayerPalette};
pub use quotes::{quote_for_day, QUOTES};
pub use reveal::RevealMask;
pub use text::{
    fit_text, wrap_words, BlockRasterizer, FontRasterizer, TextLayout, TextRasterizer,
};

use rand::Rng;
use tracing::{debug, warn};

use crate::constants::{DIGGING_MAX_HEIGHT, SAND_COLOR};
use crate::error::GardenError;
use crate::grid::{GridState, Snapshot};
use crate::types::CarveMode;

/// State held only while digging
#[derive(Debug)]
struct DigSession {
    /// Garden as it was on entry
    snapshot: Snapshot,
    reveal: RevealMask,
    quote: &'static str,
}

/// Switches the garden between raking and digging
#[derive(Debug, Default)]
pub struct DiggingController {
    session: Option<DigSession>,
}

impl DiggingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carve mode implied by the current state
    #[inline]
    pub fn mode(&self) -> CarveMode {
        if self.session.is_some() {
            CarveMode::Digging
        } else {
            CarveMode::Normal
        }
    }

    #[inline]
    pub fn is_digging(&self) -> bool {
        self.session.is_some()
    }

    /// Reveal mask of the active session
    pub fn reveal_mask(&self) -> Option<&RevealMask> {
        self.session.as_ref().map(|s| &s.reveal)
    }

    /// Message buried in the active session
    pub fn quote(&self) -> Option<&'static str> {
        self.session.as_ref().map(|s| s.quote)
    }

    /// Normal -> Digging.
    ///
    /// Returns Ok(false) if already digging. On error the grid is left
    /// untouched and the mode stays Normal.
    pub fn enter(
        &mut self,
        grid: &mut GridState,
        day_of_year: u32,
        rasterizer: &dyn TextRasterizer,
        rng: &mut impl Rng,
    ) -> Result<bool, GardenError> {
        if self.session.is_some() {
            debug!("DiggingController::enter: already digging, ignoring");
            return Ok(false);
        }

        let quote = quote_for_day(day_of_year);
        let reveal = RevealMask::build(quote, grid.width, grid.height, rasterizer)?;
        let snapshot = grid.snapshot();

        grid.fill(DIGGING_MAX_HEIGHT, SAND_COLOR);
        grid.regenerate_noise(rng);

        debug!(
            "Entered digging mode: day {}, {} cells hidden",
            day_of_year,
            reveal.marked_count()
        );
        self.session = Some(DigSession {
            snapshot,
            reveal,
            quote,
        });
        Ok(true)
    }

    /// Digging -> Normal, restoring the garden saved on entry.
    ///
    /// Returns false if not digging.
    pub fn exit(&mut self, grid: &mut GridState) -> bool {
        let Some(session) = self.session.take() else {
            debug!("DiggingController::exit: not digging, ignoring");
            return false;
        };
        if !grid.restore(&session.snapshot) {
            warn!(
                "Digging snapshot is {}x{} but grid is {}x{}; discarding it",
                session.snapshot.width(),
                session.snapshot.height(),
                grid.width,
                grid.height
            );
        }
        debug!("Exited digging mode");
        true
    }

    /// Drop the session without restoring (the grid was replaced)
    pub fn abandon(&mut self) {
        if self.session.take().is_some() {
            debug!("Digging session abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::carve::{CarveEngine, CarveParams};
    use crate::dirty::DirtyRegionTracker;

    struct BrokenRasterizer;

    impl TextRasterizer for BrokenRasterizer {
        fn measure(&self, text: &str, font_px: f32) -> f32 {
            text.len() as f32 * font_px * 0.5
        }

        fn rasterize(&self, _layout: &TextLayout, _width: u32, _height: u32) -> Vec<u8> {
            vec![255; 3]
        }
    }

    #[test]
    fn test_enter_raises_surface() {
        let mut grid = GridState::new(120, 80);
        let mut controller = DiggingController::new();
        let mut rng = StdRng::seed_from_u64(3);

        let entered = controller
            .enter(&mut grid, 10, &BlockRasterizer::default(), &mut rng)
            .unwrap();

        assert!(entered);
        assert_eq!(controller.mode(), CarveMode::Digging);
        assert!(grid.heights().iter().all(|&h| h == DIGGING_MAX_HEIGHT));
        assert_eq!(controller.quote(), Some(quote_for_day(10)));
        assert!(controller.reveal_mask().unwrap().marked_count() > 0);
    }

    #[test]
    fn test_double_enter_and_exit_are_noops() {
        let mut grid = GridState::new(60, 40);
        let mut controller = DiggingController::new();
        let mut rng = StdRng::seed_from_u64(3);
        let raster = BlockRasterizer::default();

        assert!(!controller.exit(&mut grid));
        assert!(controller.enter(&mut grid, 0, &raster, &mut rng).unwrap());
        assert!(!controller.enter(&mut grid, 0, &raster, &mut rng).unwrap());
        assert!(controller.exit(&mut grid));
        assert!(!controller.exit(&mut grid));
        assert_eq!(controller.mode(), CarveMode::Normal);
    }

    #[test]
    fn test_dig_then_exit_restores_exactly() {
        let mut grid = GridState::new(80, 80);
        let mut engine = CarveEngine::new();
        let mut dirty = DirtyRegionTracker::new();
        let params = CarveParams::default();
        let mut rng = StdRng::seed_from_u64(11);

        // some normal raking first so the saved state is not trivial
        engine.carve_tine(&mut grid, &mut dirty, CarveMode::Normal, &params, Vec2::new(40.0, 40.0), 6.0, Vec2::X);
        let saved = grid.snapshot();

        let mut controller = DiggingController::new();
        controller.enter(&mut grid, 42, &BlockRasterizer::default(), &mut rng).unwrap();
        for i in 0..10 {
            let center = Vec2::new(10.0 + i as f32 * 6.0, 30.0);
            engine.carve_tine(&mut grid, &mut dirty, controller.mode(), &params, center, 5.0, Vec2::Y);
        }
        assert!(!saved.matches(&grid));

        controller.exit(&mut grid);
        assert!(saved.matches(&grid));
    }

    #[test]
    fn test_failed_enter_leaves_grid() {
        let mut grid = GridState::new(30, 30);
        let saved = grid.snapshot();
        let mut controller = DiggingController::new();

        let result = controller.enter(&mut grid, 1, &BrokenRasterizer, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(GardenError::MaskSize { .. })));
        assert_eq!(controller.mode(), CarveMode::Normal);
        assert!(saved.matches(&grid));
    }
}
