//! Per-cell garden state: height, color and static noise
//!
//! All arrays are dense and row-major. A cell `(x, y)` lives at
//! `index = y * width + x`; every 2D lookup goes through
//! [`GridState::cell_index`], which rejects out-of-bounds coordinates
//! instead of wrapping or clamping them.

use rand::Rng;

use crate::constants::{FLAT_HEIGHT, NOISE_AMPLITUDE, SAND_COLOR};
use crate::error::GardenError;
use crate::types::{CarveMode, GardenRecord};

/// The garden height field and its colors
#[derive(Debug, Clone)]
pub struct GridState {
    /// Grid dimensions in cells
    pub width: u32,
    pub height: u32,
    heights: Vec<f32>,
    color_r: Vec<f32>,
    color_g: Vec<f32>,
    color_b: Vec<f32>,
    noise: Vec<f32>,
}

impl GridState {
    /// Create a flat, sand-colored grid with zero noise
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            heights: vec![FLAT_HEIGHT; count],
            color_r: vec![SAND_COLOR[0]; count],
            color_g: vec![SAND_COLOR[1]; count],
            color_b: vec![SAND_COLOR[2]; count],
            noise: vec![0.0; count],
        }
    }

    /// Build a grid from a saved record. Noise is regenerated from `rng`.
    ///
    /// A loaded garden is always raked in Normal mode, so heights are
    /// clamped to that range. Non-finite heights and colors fall back to
    /// flat sand.
    pub fn from_record(record: &GardenRecord, rng: &mut impl Rng) -> Result<Self, GardenError> {
        record.validate()?;
        let (min, max) = CarveMode::Normal.height_range();
        let heights = record
            .height_array
            .iter()
            .map(|&h| if h.is_finite() { h.clamp(min, max) } else { FLAT_HEIGHT })
            .collect();
        let channel = |values: &[f32], fallback: f32| -> Vec<f32> {
            values
                .iter()
                .map(|&c| if c.is_finite() { c } else { fallback })
                .collect()
        };

        let mut grid = Self {
            width: record.width,
            height: record.height,
            heights,
            color_r: channel(&record.color_r_array, SAND_COLOR[0]),
            color_g: channel(&record.color_g_array, SAND_COLOR[1]),
            color_b: channel(&record.color_b_array, SAND_COLOR[2]),
            noise: Vec::new(),
        };
        grid.regenerate_noise(rng);
        Ok(grid)
    }

    /// Export heights and colors as a plain record
    pub fn to_record(&self) -> GardenRecord {
        GardenRecord {
            width: self.width,
            height: self.height,
            height_array: self.heights.clone(),
            color_r_array: self.color_r.clone(),
            color_g_array: self.color_g.clone(),
            color_b_array: self.color_b.clone(),
        }
    }

    /// Number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    /// Flatten `(x, y)` to an array index, or None if outside the grid
    #[inline]
    pub fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Height at `(x, y)`, or None if outside the grid
    #[inline]
    pub fn height_at(&self, x: i32, y: i32) -> Option<f32> {
        self.cell_index(x, y).map(|i| self.heights[i])
    }

    /// Color at `(x, y)`, or None if outside the grid
    #[inline]
    pub fn color_at(&self, x: i32, y: i32) -> Option<[f32; 3]> {
        self.cell_index(x, y).map(|i| self.color(i))
    }

    #[inline]
    pub fn color(&self, index: usize) -> [f32; 3] {
        [self.color_r[index], self.color_g[index], self.color_b[index]]
    }

    #[inline]
    pub fn set_color(&mut self, index: usize, color: [f32; 3]) {
        self.color_r[index] = color[0];
        self.color_g[index] = color[1];
        self.color_b[index] = color[2];
    }

    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    #[inline]
    pub fn noise(&self) -> &[f32] {
        &self.noise
    }

    /// Sum of all heights, accumulated in f64
    pub fn total_mass(&self) -> f64 {
        self.heights.iter().map(|&h| h as f64).sum()
    }

    /// Overwrite every cell with one height and one color
    pub fn fill(&mut self, height: f32, color: [f32; 3]) {
        self.heights.fill(height);
        self.color_r.fill(color[0]);
        self.color_g.fill(color[1]);
        self.color_b.fill(color[2]);
    }

    /// Reset to a flat sand garden with fresh noise
    pub fn reset_flat(&mut self, rng: &mut impl Rng) {
        self.fill(FLAT_HEIGHT, SAND_COLOR);
        self.regenerate_noise(rng);
    }

    /// Replace the static noise field
    pub fn regenerate_noise(&mut self, rng: &mut impl Rng) {
        let count = self.cell_count();
        self.noise.clear();
        self.noise
            .extend((0..count).map(|_| rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE)));
    }

    /// Take an independent copy of heights and colors
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            heights: self.heights.clone(),
            color_r: self.color_r.clone(),
            color_g: self.color_g.clone(),
            color_b: self.color_b.clone(),
        }
    }

    /// Overwrite heights and colors from a snapshot of the same size.
    /// Returns false (and changes nothing) on a size mismatch.
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        if snapshot.width != self.width || snapshot.height != self.height {
            return false;
        }
        self.heights.copy_from_slice(&snapshot.heights);
        self.color_r.copy_from_slice(&snapshot.color_r);
        self.color_g.copy_from_slice(&snapshot.color_g);
        self.color_b.copy_from_slice(&snapshot.color_b);
        true
    }
}

/// Immutable copy of heights and colors at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    heights: Vec<f32>,
    color_r: Vec<f32>,
    color_g: Vec<f32>,
    color_b: Vec<f32>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// True if the grid's heights and colors match this snapshot exactly
    pub fn matches(&self, grid: &GridState) -> bool {
        self.width == grid.width
            && self.height == grid.height
            && self.heights == grid.heights
            && self.color_r == grid.color_r
            && self.color_g == grid.color_g
            && self.color_b == grid.color_b
    }
}
