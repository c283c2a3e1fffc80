//! Errors raised at the garden's boundaries.
//!
//! The carve/render core never fails; only loading records and building
//! the reveal mask can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GardenError {
    #[error("Record has zero-sized grid: {width}x{height}")]
    EmptyRecord { width: u32, height: u32 },
    #[error("Record array {array} has {actual} cells, expected {expected}")]
    RecordSize {
        array: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Rasterized mask has {actual} cells, expected {expected}")]
    MaskSize { expected: usize, actual: usize },
    #[error("Invalid font data: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}
