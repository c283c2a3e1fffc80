//! Dirty rectangle tracking for incremental rendering
//!
//! Every mutated cell must lie inside the tracked rectangle; marking
//! more than was touched is fine, marking less is a bug.

use tracing::trace;

/// Inclusive cell rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl DirtyRect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Square of half-size `pad` around a cell
    pub fn around(x: i32, y: i32, pad: i32) -> Self {
        Self::new(x - pad, y - pad, x + pad, y + pad)
    }

    /// Whole grid
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32 - 1, height as i32 - 1)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x + 1).max(0) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1).max(0) as u32
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn union(&self, other: &DirtyRect) -> DirtyRect {
        DirtyRect::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow by `pad` cells on every side
    pub fn expand(&self, pad: i32) -> DirtyRect {
        DirtyRect::new(
            self.min_x - pad,
            self.min_y - pad,
            self.max_x + pad,
            self.max_y + pad,
        )
    }

    /// Intersect with the grid, or None if nothing is left
    pub fn clip(&self, width: u32, height: u32) -> Option<DirtyRect> {
        let clipped = DirtyRect::new(
            self.min_x.max(0),
            self.min_y.max(0),
            self.max_x.min(width as i32 - 1),
            self.max_y.min(height as i32 - 1),
        );
        (clipped.min_x <= clipped.max_x && clipped.min_y <= clipped.max_y).then_some(clipped)
    }
}

/// Union of all regions touched since the last reset
#[derive(Debug, Clone, Default)]
pub struct DirtyRegionTracker {
    rect: Option<DirtyRect>,
}

impl DirtyRegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a rectangle into the dirty region
    pub fn mark(&mut self, rect: DirtyRect) {
        let merged = match self.rect {
            Some(current) => current.union(&rect),
            None => rect,
        };
        trace!(
            "mark dirty: ({}, {})..({}, {})",
            merged.min_x, merged.min_y, merged.max_x, merged.max_y
        );
        self.rect = Some(merged);
    }

    /// Mark a square of half-size `pad` around a cell
    #[inline]
    pub fn mark_around(&mut self, x: i32, y: i32, pad: i32) {
        self.mark(DirtyRect::around(x, y, pad));
    }

    /// Mark the whole grid
    pub fn mark_all(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.mark(DirtyRect::full(width, height));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    /// Current region without resetting
    #[inline]
    pub fn peek(&self) -> Option<DirtyRect> {
        self.rect
    }

    /// Take the region and reset to empty
    pub fn take(&mut self) -> Option<DirtyRect> {
        self.rect.take()
    }

    pub fn reset(&mut self) {
        self.rect = None;
    }
}
