//! Surface operations for the garden pipeline

use tracing::{debug, info};

use crate::digging::TextRasterizer;
use crate::dirty::DirtyRect;
use crate::error::GardenError;
use crate::grid::GridState;
use crate::types::{CarveMode, GardenRecord};

use super::GardenPipeline;

/// Result of one render flush
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate<'a> {
    /// Region that was redrawn, clipped to the grid
    pub rect: DirtyRect,
    /// Whole RGBA buffer, row-major
    pub pixels: &'a [u8],
    /// Bytes per row of `pixels`
    pub stride: usize,
}

impl FrameUpdate<'_> {
    /// Tightly packed RGBA bytes of `rect` only
    pub fn region(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity((self.rect.width() * self.rect.height() * 4) as usize);
        for y in self.rect.min_y..=self.rect.max_y {
            let start = y as usize * self.stride + self.rect.min_x as usize * 4;
            let end = start + self.rect.width() as usize * 4;
            data.extend_from_slice(&self.pixels[start..end]);
        }
        data
    }
}

impl GardenPipeline {
    /// Flush everything carved since the last frame
    ///
    /// Returns None when nothing is dirty.
    pub fn render_frame(&mut self) -> Option<FrameUpdate<'_>> {
        let rect = self.renderer.render(
            &self.grid,
            &self.settings.lighting,
            self.digging.reveal_mask(),
            &mut self.dirty,
        )?;
        Some(FrameUpdate {
            rect,
            pixels: self.renderer.as_bytes(),
            stride: self.renderer.width() as usize * 4,
        })
    }

    /// Check if anything is waiting to be rendered
    pub fn has_dirty_region(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get raw pixel data as bytes (for full texture upload)
    pub fn pixels_as_bytes(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    /// Reset to flat sand with fresh noise
    ///
    /// Leaves digging mode without restoring and clears history.
    pub fn reset_flat(&mut self) {
        self.interrupt();
        self.digging.abandon();
        self.history.clear();
        self.grid.reset_flat(&mut self.rng);
        self.dirty.mark_all(self.grid.width, self.grid.height);
        debug!("Garden reset to flat");
    }

    /// Replace the garden with a saved record
    ///
    /// The record may have a different size than the current grid; the
    /// renderer is reallocated to match. On error nothing changes.
    pub fn load_record(&mut self, record: &GardenRecord) -> Result<(), GardenError> {
        let grid = GridState::from_record(record, &mut self.rng)?;
        self.interrupt();
        self.digging.abandon();
        self.history.clear();
        self.install_grid(grid);
        info!("Loaded garden {}x{}", record.width, record.height);
        Ok(())
    }

    /// Export the current heights and colors
    pub fn export_record(&self) -> GardenRecord {
        self.grid.to_record()
    }

    /// Reallocate for a new canvas size, starting from flat sand
    pub fn resize(&mut self, width: u32, height: u32) {
        self.interrupt();
        self.digging.abandon();
        self.history.clear();
        let mut grid = GridState::new(width, height);
        grid.reset_flat(&mut self.rng);
        self.install_grid(grid);
        debug!("Garden resized to {}x{}", width, height);
    }

    /// Normal -> Digging. Returns Ok(false) if already digging.
    pub fn enter_digging(
        &mut self,
        day_of_year: u32,
        rasterizer: &dyn TextRasterizer,
    ) -> Result<bool, GardenError> {
        if self.digging.is_digging() {
            return Ok(false);
        }
        self.interrupt();
        let entered = self
            .digging
            .enter(&mut self.grid, day_of_year, rasterizer, &mut self.rng)?;
        if entered {
            self.history.clear();
            self.dirty.mark_all(self.grid.width, self.grid.height);
        }
        Ok(entered)
    }

    /// Digging -> Normal. Returns false if not digging.
    pub fn exit_digging(&mut self) -> bool {
        if !self.digging.is_digging() {
            return false;
        }
        self.interrupt();
        let exited = self.digging.exit(&mut self.grid);
        self.history.clear();
        self.dirty.mark_all(self.grid.width, self.grid.height);
        exited
    }

    /// Flip between raking and digging, returning the new mode
    pub fn toggle_digging(
        &mut self,
        day_of_year: u32,
        rasterizer: &dyn TextRasterizer,
    ) -> Result<CarveMode, GardenError> {
        match self.mode() {
            CarveMode::Normal => {
                self.enter_digging(day_of_year, rasterizer)?;
            }
            CarveMode::Digging => {
                self.exit_digging();
            }
        }
        Ok(self.mode())
    }

    /// End any user or scripted stroke without touching the grid
    fn interrupt(&mut self) {
        self.script = None;
        if self.is_stroking() {
            self.finish_stroke();
        }
    }

    fn install_grid(&mut self, grid: GridState) {
        if grid.width != self.renderer.width() || grid.height != self.renderer.height() {
            self.renderer.resize(grid.width, grid.height);
        }
        self.grid = grid;
        self.particles.clear();
        self.dirty.reset();
        self.dirty.mark_all(self.grid.width, self.grid.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FLAT_HEIGHT, MIN_HEIGHT, NORMAL_MAX_HEIGHT};
    use crate::digging::BlockRasterizer;

    #[test]
    fn test_render_frame_coalesces() {
        let mut pipeline = GardenPipeline::with_default_settings(64, 64);
        let first = pipeline.render_frame().unwrap();
        assert_eq!(first.rect, DirtyRect::full(64, 64));
        assert!(!pipeline.has_dirty_region());
        assert!(pipeline.render_frame().is_none());

        pipeline.begin_stroke(10.0, 10.0);
        pipeline.stroke_to(20.0, 10.0);
        pipeline.stroke_to(30.0, 12.0);
        pipeline.end_stroke();
        assert!(pipeline.has_dirty_region());

        let frame = pipeline.render_frame().unwrap();
        assert!(frame.rect.contains(20, 10));
        assert!(frame.rect.contains(30, 12));
        assert_eq!(frame.region().len(), (frame.rect.width() * frame.rect.height() * 4) as usize);
        assert!(pipeline.render_frame().is_none());
    }

    #[test]
    fn test_export_then_load() {
        let mut pipeline = GardenPipeline::with_default_settings(50, 40);
        pipeline.begin_stroke(5.0, 20.0);
        pipeline.stroke_to(45.0, 20.0);
        pipeline.end_stroke();
        let record = pipeline.export_record();

        let mut other = GardenPipeline::with_default_settings(10, 10);
        other.load_record(&record).unwrap();
        assert_eq!(other.width(), 50);
        assert_eq!(other.grid().heights(), pipeline.grid().heights());
        assert_eq!(other.pixels_as_bytes().len(), 50 * 40 * 4);
        assert!(!other.can_undo());
        assert_eq!(other.render_frame().unwrap().rect, DirtyRect::full(50, 40));
    }

    #[test]
    fn test_digging_export_loads_within_normal_range() {
        let mut digger = GardenPipeline::with_default_settings(60, 40);
        digger.enter_digging(7, &BlockRasterizer::default()).unwrap();
        let record = digger.export_record();

        let mut pipeline = GardenPipeline::with_default_settings(60, 40);
        pipeline.load_record(&record).unwrap();
        assert_eq!(pipeline.mode(), CarveMode::Normal);
        assert!(pipeline
            .grid()
            .heights()
            .iter()
            .all(|&h| (MIN_HEIGHT..=NORMAL_MAX_HEIGHT).contains(&h)));
    }

    #[test]
    fn test_bad_record_leaves_garden() {
        let mut pipeline = GardenPipeline::with_default_settings(20, 20);
        let mut record = pipeline.export_record();
        record.color_g_array.pop();

        let result = pipeline.load_record(&record);
        assert!(matches!(result, Err(GardenError::RecordSize { array: "colorG", .. })));
        assert_eq!(pipeline.width(), 20);
    }

    #[test]
    fn test_reset_leaves_digging() {
        let mut pipeline = GardenPipeline::with_default_settings(80, 60);
        pipeline.enter_digging(3, &BlockRasterizer::default()).unwrap();
        assert_eq!(pipeline.mode(), CarveMode::Digging);

        pipeline.reset_flat();
        assert_eq!(pipeline.mode(), CarveMode::Normal);
        assert!(pipeline.grid().heights().iter().all(|&h| h == FLAT_HEIGHT));
    }

    #[test]
    fn test_repeated_transitions_are_noops() {
        let mut pipeline = GardenPipeline::with_default_settings(80, 60);
        let raster = BlockRasterizer::default();
        assert!(!pipeline.exit_digging());
        assert!(pipeline.enter_digging(0, &raster).unwrap());
        assert!(!pipeline.enter_digging(0, &raster).unwrap());
        assert!(pipeline.exit_digging());
        assert_eq!(pipeline.mode(), CarveMode::Normal);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut pipeline = GardenPipeline::with_default_settings(20, 20);
        pipeline.resize(30, 10);
        assert_eq!(pipeline.grid().cell_count(), 300);
        assert_eq!(pipeline.render_frame().unwrap().stride, 120);
    }
}
