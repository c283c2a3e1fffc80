//! Text layout for the hidden message
//!
//! Glyph shaping is delegated to a [`TextRasterizer`]; this module only
//! decides the wrap and the font size. The font starts at a fraction of
//! the canvas height and shrinks until the wrapped block fits.

use ab_glyph::{point, Font, FontArc, ScaleFont};

use crate::error::GardenError;

/// Block height limit as a fraction of canvas height
pub const TARGET_HEIGHT_FRACTION: f32 = 0.6;

/// Line width limit as a fraction of canvas width
pub const MAX_WIDTH_FRACTION: f32 = 0.85;

/// Starting font size as a fraction of canvas height
pub const START_FONT_FRACTION: f32 = 0.12;

/// Font size multiplier per shrink step
pub const SHRINK_FACTOR: f32 = 0.9;

/// Smallest font size tried
pub const MIN_FONT_PX: f32 = 8.0;

/// Line height as a multiple of font size
pub const LINE_SPACING: f32 = 1.25;

/// Wrapped lines at one font size, centered on the canvas when drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub font_px: f32,
    pub line_height: f32,
}

impl TextLayout {
    /// Total height of the text block
    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Top edge of the block when centered vertically in `canvas_height`
    pub fn top(&self, canvas_height: u32) -> f32 {
        (canvas_height as f32 - self.block_height()) / 2.0
    }
}

/// Capability to measure and draw text into a canvas-sized alpha mask
pub trait TextRasterizer {
    /// Advance width of `text` at `font_px`
    fn measure(&self, text: &str, font_px: f32) -> f32;

    /// Draw `layout` centered into a `width * height` alpha buffer
    fn rasterize(&self, layout: &TextLayout, width: u32, height: u32) -> Vec<u8>;
}

/// Greedy word wrap to `max_width`. A single word wider than the limit
/// gets a line of its own.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    font_px: f32,
    rasterizer: &dyn TextRasterizer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", line, word);
        if rasterizer.measure(&candidate, font_px) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap and shrink `text` until it fits the canvas
pub fn fit_text(text: &str, width: u32, height: u32, rasterizer: &dyn TextRasterizer) -> TextLayout {
    let max_width = width as f32 * MAX_WIDTH_FRACTION;
    let max_height = height as f32 * TARGET_HEIGHT_FRACTION;
    let mut font_px = (height as f32 * START_FONT_FRACTION).max(MIN_FONT_PX);

    loop {
        let lines = wrap_words(text, max_width, font_px, rasterizer);
        let line_height = font_px * LINE_SPACING;
        let fits = lines.len() as f32 * line_height <= max_height
            && lines
                .iter()
                .all(|l| rasterizer.measure(l, font_px) <= max_width);

        if fits || font_px <= MIN_FONT_PX {
            return TextLayout {
                lines,
                font_px,
                line_height,
            };
        }
        font_px = (font_px * SHRINK_FACTOR).max(MIN_FONT_PX);
    }
}

/// Fixed-advance rasterizer drawing each visible character as a solid
/// box. Needs no font data, so it works headless.
#[derive(Debug, Clone, Copy)]
pub struct BlockRasterizer {
    /// Character advance as a fraction of font size
    pub advance: f32,
}

impl Default for BlockRasterizer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextRasterizer for BlockRasterizer {
    fn measure(&self, text: &str, font_px: f32) -> f32 {
        text.chars().count() as f32 * self.advance * font_px
    }

    fn rasterize(&self, layout: &TextLayout, width: u32, height: u32) -> Vec<u8> {
        let mut alpha = vec![0u8; (width as usize) * (height as usize)];
        let advance = self.advance * layout.font_px;
        let top = layout.top(height);

        for (row, line) in layout.lines.iter().enumerate() {
            let left = (width as f32 - self.measure(line, layout.font_px)) / 2.0;
            let y0 = top + row as f32 * layout.line_height + layout.font_px * 0.15;
            let y1 = y0 + layout.font_px * 0.8;

            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x0 = left + col as f32 * advance + advance * 0.1;
                let x1 = x0 + advance * 0.8;
                fill_box(&mut alpha, width, height, x0, y0, x1, y1);
            }
        }
        alpha
    }
}

fn fill_box(alpha: &mut [u8], width: u32, height: u32, x0: f32, y0: f32, x1: f32, y1: f32) {
    let xs = x0.max(0.0).round() as u32..x1.min(width as f32).round().max(0.0) as u32;
    let ys = y0.max(0.0).round() as u32..y1.min(height as f32).round().max(0.0) as u32;
    for y in ys {
        for x in xs.clone() {
            alpha[(y as usize) * (width as usize) + x as usize] = 255;
        }
    }
}

/// Rasterizer backed by an outline font
#[derive(Clone)]
pub struct FontRasterizer {
    font: FontArc,
}

impl FontRasterizer {
    /// Parse TrueType/OpenType bytes supplied by the host
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, GardenError> {
        Ok(Self {
            font: FontArc::try_from_vec(data)?,
        })
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font }
    }
}

impl TextRasterizer for FontRasterizer {
    fn measure(&self, text: &str, font_px: f32) -> f32 {
        let scaled = self.font.as_scaled(font_px);
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn rasterize(&self, layout: &TextLayout, width: u32, height: u32) -> Vec<u8> {
        let mut alpha = vec![0u8; (width as usize) * (height as usize)];
        let scaled = self.font.as_scaled(layout.font_px);
        let top = layout.top(height);

        for (row, line) in layout.lines.iter().enumerate() {
            let baseline = top + row as f32 * layout.line_height + scaled.ascent();
            let mut cursor = (width as f32 - self.measure(line, layout.font_px)) / 2.0;
            let mut prev = None;

            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev) = prev {
                    cursor += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(layout.font_px, point(cursor, baseline));
                cursor += scaled.h_advance(id);
                prev = Some(id);

                let Some(outlined) = self.font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i32 + gx as i32;
                    let y = bounds.min.y as i32 + gy as i32;
                    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                        return;
                    }
                    let index = (y as usize) * (width as usize) + x as usize;
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    alpha[index] = alpha[index].max(value);
                });
            }
        }
        alpha
    }
}
