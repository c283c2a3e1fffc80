//! Per-cell mask of the hidden message

use crate::constants::MASK_ALPHA_THRESHOLD;
use crate::error::GardenError;

use super::text::{fit_text, TextRasterizer};

/// Which cells belong to the hidden text
#[derive(Debug, Clone, PartialEq)]
pub struct RevealMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl RevealMask {
    /// Threshold a canvas-sized alpha buffer
    pub fn from_alpha(alpha: &[u8], width: u32, height: u32) -> Result<Self, GardenError> {
        let expected = (width as usize) * (height as usize);
        if alpha.len() != expected {
            return Err(GardenError::MaskSize {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells: alpha.iter().map(|&a| a >= MASK_ALPHA_THRESHOLD).collect(),
        })
    }

    /// Lay out `text` to fit the canvas, rasterize it and threshold the result
    pub fn build(
        text: &str,
        width: u32,
        height: u32,
        rasterizer: &dyn TextRasterizer,
    ) -> Result<Self, GardenError> {
        let layout = fit_text(text, width, height, rasterizer);
        let alpha = rasterizer.rasterize(&layout, width, height);
        Self::from_alpha(&alpha, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at `index` is part of the message
    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    /// Number of marked cells
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
