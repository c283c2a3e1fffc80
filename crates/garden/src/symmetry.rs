//! Mirror expansion of a single carve request
//!
//! Each active axis reflects every candidate collected so far, so three
//! axes give up to eight strokes. The diagonal axis swaps x and y in
//! normalized canvas space, which is not an orthogonal reflection on a
//! non-square canvas; its direction vectors are aspect-corrected and
//! rescaled to their original length.

use garden_config::SymmetrySettings;
use glam::Vec2;

use crate::carve::stroke_axis;

/// Candidates closer than this (squared, in cells) to a kept stroke are dropped
pub const DEDUP_DISTANCE_SQ: f32 = 1.0;

/// Position plus the stroke's direction and rake axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeFrame {
    pub position: Vec2,
    /// Direction of travel (unit length)
    pub direction: Vec2,
    /// Axis the tines are laid along (unit length)
    pub perpendicular: Vec2,
}

impl StrokeFrame {
    /// Frame moving along `direction`, rake laid across it
    pub fn new(position: Vec2, direction: Vec2) -> Self {
        let direction = stroke_axis(direction);
        Self {
            position,
            direction,
            perpendicular: Vec2::new(-direction.y, direction.x),
        }
    }
}

/// Active mirror axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymmetryTransform {
    pub mirror_v: bool,
    pub mirror_h: bool,
    pub mirror_d: bool,
    pub align_center: bool,
}

impl From<&SymmetrySettings> for SymmetryTransform {
    fn from(settings: &SymmetrySettings) -> Self {
        Self {
            mirror_v: settings.mirror_v,
            mirror_h: settings.mirror_h,
            mirror_d: settings.mirror_d,
            align_center: settings.align_center,
        }
    }
}

impl SymmetryTransform {
    /// Expand `base` into all mirrored strokes on a `width x height` grid
    pub fn expand(&self, base: StrokeFrame, width: u32, height: u32) -> Vec<StrokeFrame> {
        let w = width as f32;
        let h = height as f32;

        let mut frame = base;
        if self.align_center {
            let center = Vec2::new(w / 2.0, h / 2.0);
            if let Some(radial) = (frame.position - center).try_normalize() {
                frame.perpendicular = radial;
            }
        }

        let mut candidates = Vec::with_capacity(8);
        candidates.push(frame);
        if self.mirror_v {
            mirror_all(&mut candidates, |f| reflect_vertical(f, w));
        }
        if self.mirror_h {
            mirror_all(&mut candidates, |f| reflect_horizontal(f, h));
        }
        if self.mirror_d {
            mirror_all(&mut candidates, |f| swap_diagonal(f, w, h));
        }

        let mut kept: Vec<StrokeFrame> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let duplicate = kept.iter().any(|k| {
                k.position.distance_squared(candidate.position) < DEDUP_DISTANCE_SQ
            });
            if !duplicate {
                kept.push(candidate);
            }
        }
        kept
    }
}

fn mirror_all(candidates: &mut Vec<StrokeFrame>, reflect: impl Fn(&StrokeFrame) -> StrokeFrame) {
    let mirrored: Vec<StrokeFrame> = candidates.iter().map(reflect).collect();
    candidates.extend(mirrored);
}

fn reflect_vertical(frame: &StrokeFrame, width: f32) -> StrokeFrame {
    StrokeFrame {
        position: Vec2::new(width - 1.0 - frame.position.x, frame.position.y),
        direction: Vec2::new(-frame.direction.x, frame.direction.y),
        perpendicular: Vec2::new(-frame.perpendicular.x, frame.perpendicular.y),
    }
}

fn reflect_horizontal(frame: &StrokeFrame, height: f32) -> StrokeFrame {
    StrokeFrame {
        position: Vec2::new(frame.position.x, height - 1.0 - frame.position.y),
        direction: Vec2::new(frame.direction.x, -frame.direction.y),
        perpendicular: Vec2::new(frame.perpendicular.x, -frame.perpendicular.y),
    }
}

fn swap_diagonal(frame: &StrokeFrame, width: f32, height: f32) -> StrokeFrame {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let nx = (frame.position.x - half_w) / half_w;
    let ny = (frame.position.y - half_h) / half_h;

    StrokeFrame {
        position: Vec2::new(ny * half_w + half_w, nx * half_h + half_h),
        direction: swap_vector(frame.direction, width, height),
        perpendicular: swap_vector(frame.perpendicular, width, height),
    }
}

/// Aspect-corrected axis swap that keeps the vector's length
fn swap_vector(v: Vec2, width: f32, height: f32) -> Vec2 {
    let length = v.length();
    let swapped = Vec2::new(v.y * width / height, v.x * height / width);
    swapped.try_normalize().map(|n| n * length).unwrap_or(v)
}
