//! Shaded RGBA rendering of the height field
//!
//! Lighting comes from a central-difference gradient sampled
//! `normal_sample_distance` cells away, so a changed cell affects the
//! shading of its neighbours. Each flush therefore recomputes the dirty
//! rectangle grown by `normal_sample_distance + 1` on every side.

use garden_config::LightingSettings;
use tracing::trace;

use crate::constants::{REVEAL_ACCENT, REVEAL_THRESHOLD};
use crate::digging::{dig_depth, RevealMask};
use crate::dirty::{DirtyRect, DirtyRegionTracker};
use crate::grid::GridState;

/// Largest neighbour distance the lighting gradient will sample
pub const MAX_NORMAL_SAMPLE_DISTANCE: u32 = 64;

/// Gradient sample distance in cells, clamped to `1..=MAX_NORMAL_SAMPLE_DISTANCE`
#[inline]
pub fn sample_distance(lighting: &LightingSettings) -> i32 {
    lighting
        .normal_sample_distance
        .clamp(1, MAX_NORMAL_SAMPLE_DISTANCE) as i32
}

/// Brightness multiplier for a given height
#[inline]
pub fn height_brightness(height: f32) -> f32 {
    0.82 + 0.18 * height.clamp(0.0, 2.0)
}

/// CPU pixel buffer for the garden
pub struct Renderer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Renderer {
    /// Create a renderer with an opaque black buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width as usize) * (height as usize)],
        }
    }

    /// Reallocate for a new grid size
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Recompute everything dirty since the last flush and reset the tracker.
    ///
    /// Returns the rectangle that was redrawn, or None if nothing was dirty.
    pub fn render(
        &mut self,
        grid: &GridState,
        lighting: &LightingSettings,
        reveal: Option<&RevealMask>,
        dirty: &mut DirtyRegionTracker,
    ) -> Option<DirtyRect> {
        let rect = dirty.take()?;
        let pad = sample_distance(lighting) + 1;
        let rect = rect.expand(pad).clip(self.width, self.height)?;
        self.render_rect(grid, lighting, reveal, rect);
        trace!(
            "render: ({}, {}) {}x{}",
            rect.min_x,
            rect.min_y,
            rect.width(),
            rect.height()
        );
        Some(rect)
    }

    /// Recompute the pixels inside `rect` (already clipped to the grid)
    pub fn render_rect(
        &mut self,
        grid: &GridState,
        lighting: &LightingSettings,
        reveal: Option<&RevealMask>,
        rect: DirtyRect,
    ) {
        if grid.width != self.width || grid.height != self.height {
            return;
        }
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let Some(index) = grid.cell_index(x, y) else {
                    continue;
                };
                self.pixels[index] = shade_cell(grid, lighting, reveal, x, y, index);
            }
        }
    }

    /// Whole buffer, row-major RGBA
    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Whole buffer as bytes, for blitting
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy one rectangle out as tightly packed RGBA bytes
    pub fn region_bytes(&self, rect: DirtyRect) -> Vec<u8> {
        let Some(rect) = rect.clip(self.width, self.height) else {
            return Vec::new();
        };
        let mut data = Vec::with_capacity((rect.width() * rect.height() * 4) as usize);
        for y in rect.min_y..=rect.max_y {
            let start = (y as usize) * (self.width as usize) + rect.min_x as usize;
            let end = start + rect.width() as usize;
            data.extend_from_slice(bytemuck::cast_slice(&self.pixels[start..end]));
        }
        data
    }
}

/// Lighting factor at `(x, y)`; flat (1.0) near the edges
fn lighting_factor(grid: &GridState, lighting: &LightingSettings, x: i32, y: i32) -> f32 {
    let n = sample_distance(lighting);
    let samples = (
        grid.height_at(x + n, y),
        grid.height_at(x - n, y),
        grid.height_at(x, y + n),
        grid.height_at(x, y - n),
    );
    let (Some(right), Some(left), Some(down), Some(up)) = samples else {
        return 1.0;
    };
    let span = 2.0 * n as f32;
    let dhdx = (right - left) / span;
    let dhdy = (down - up) / span;
    1.0 + (-(dhdx * lighting.light_x + dhdy * lighting.light_y)) * lighting.light_mul
}

fn shade_cell(
    grid: &GridState,
    lighting: &LightingSettings,
    reveal: Option<&RevealMask>,
    x: i32,
    y: i32,
    index: usize,
) -> [u8; 4] {
    let height = grid.heights()[index];
    let mut base = grid.color(index);

    if let Some(mask) = reveal {
        let depth = dig_depth(height);
        if depth > REVEAL_THRESHOLD && mask.is_marked(index) {
            let t = ((depth - REVEAL_THRESHOLD) / (1.0 - REVEAL_THRESHOLD)).clamp(0.0, 1.0);
            for c in 0..3 {
                base[c] += (REVEAL_ACCENT[c] - base[c]) * t;
            }
        }
    }

    let shade = lighting_factor(grid, lighting, x, y) * height_brightness(height);
    let noise = grid.noise()[index];
    let channel = |c: f32| (c * shade + noise).round().clamp(0.0, 255.0) as u8;
    [channel(base[0]), channel(base[1]), channel(base[2]), 255]
}
