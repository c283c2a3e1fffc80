//! Rake geometry and stroke interpolation
//!
//! The interpolator walks from the previous pointer sample to the new one
//! at a fixed step, so fast pointer motion still carves a continuous
//! groove. Leftover distance carries over between calls.

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::symmetry::StrokeFrame;

/// Pin the stroke to the row or column it started on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLock {
    #[default]
    None,
    /// Keep y fixed
    Horizontal,
    /// Keep x fixed
    Vertical,
}

impl AxisLock {
    fn apply(self, start: Vec2, point: Vec2) -> Vec2 {
        match self {
            AxisLock::None => point,
            AxisLock::Horizontal => Vec2::new(point.x, start.y),
            AxisLock::Vertical => Vec2::new(start.x, point.y),
        }
    }
}

/// Offsets of `count` tines along the rake axis, centered on zero
pub fn tine_offsets(count: u32, spacing: f32) -> impl Iterator<Item = f32> {
    let count = count.max(1);
    let mid = (count - 1) as f32 / 2.0;
    (0..count).map(move |i| (i as f32 - mid) * spacing)
}

/// Tine centers for one stroke frame
pub fn tine_centers(frame: &StrokeFrame, count: u32, spacing: f32) -> impl Iterator<Item = Vec2> + '_ {
    tine_offsets(count, spacing).map(move |offset| frame.position + frame.perpendicular * offset)
}

/// Parameter range `[lo, hi]` along `origin + direction * t`, `t` in
/// `0..=length`, that lies inside the box, or None if it misses
fn clip_segment(origin: DVec2, direction: DVec2, length: f64, min: DVec2, max: DVec2) -> Option<(f64, f64)> {
    let mut lo = 0.0f64;
    let mut hi = length;
    let axes = [
        (origin.x, direction.x, min.x, max.x),
        (origin.y, direction.y, min.y, max.y),
    ];
    for (o, d, a, b) in axes {
        if d.abs() < f64::EPSILON {
            if o < a || o > b {
                return None;
            }
            continue;
        }
        let t0 = (a - o) / d;
        let t1 = (b - o) / d;
        lo = lo.max(t0.min(t1));
        hi = hi.min(t0.max(t1));
    }
    (lo <= hi).then_some((lo, hi))
}

/// One interpolated carve position and its travel direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSample {
    pub position: Vec2,
    pub direction: Vec2,
}

/// Turns raw pointer samples into evenly spaced carve samples
#[derive(Debug, Clone, Default)]
pub struct StrokeInterpolator {
    start: Option<Vec2>,
    last_pos: Option<Vec2>,
    lock: AxisLock,
    /// The press point is carved once the first movement gives it a direction
    start_pending: bool,
    /// Distance travelled since the last emitted sample
    distance_accumulator: f32,
    /// Samples outside this box are skipped without being walked
    bounds: Option<(Vec2, Vec2)>,
}

impl StrokeInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke at `(x, y)`
    pub fn begin(&mut self, x: f32, y: f32, lock: AxisLock) {
        let start = Vec2::new(x, y);
        self.start = Some(start);
        self.last_pos = Some(start);
        self.lock = lock;
        self.start_pending = true;
        self.distance_accumulator = 0.0;
    }

    /// Only emit samples inside `min..=max`. Spacing along the path is
    /// unaffected; skipped samples still advance the stroke.
    pub fn set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.bounds = Some((min, max));
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Advance to `(x, y)`, emitting samples every `step` cells
    pub fn stroke_to(&mut self, x: f32, y: f32, step: f32) -> Vec<StrokeSample> {
        let mut samples = Vec::new();
        let (Some(start), Some(last)) = (self.start, self.last_pos) else {
            debug!("StrokeInterpolator::stroke_to: no active stroke, ignoring");
            return samples;
        };
        let target = self.lock.apply(start, Vec2::new(x, y));
        if !target.is_finite() {
            return samples;
        }

        // f64 so far off-canvas pointers do not cost whole cells of precision
        let origin = last.as_dvec2();
        let delta = target.as_dvec2() - origin;
        let distance = delta.length();
        if distance < 0.001 {
            return samples;
        }
        let direction = delta / distance;
        let sample_direction = direction.as_vec2();
        let window = match self.bounds {
            Some((min, max)) => clip_segment(origin, direction, distance, min.as_dvec2(), max.as_dvec2()),
            None => Some((0.0, distance)),
        };

        if self.start_pending {
            if window.is_some_and(|(lo, _)| lo <= 0.0) {
                samples.push(StrokeSample {
                    position: last,
                    direction: sample_direction,
                });
            }
            self.start_pending = false;
        }

        // Samples sit at `first + k * step` along the segment
        let step = f64::from(step.max(0.01));
        let first = step - f64::from(self.distance_accumulator);
        if first > distance {
            self.distance_accumulator += distance as f32;
            self.last_pos = Some(target);
            return samples;
        }
        let last_k = ((distance - first) / step).floor();

        if let Some((lo, hi)) = window {
            let start_k = ((lo - first) / step).ceil().max(0.0);
            let end_k = ((hi - first) / step).floor().min(last_k);
            let mut k = start_k;
            while k <= end_k {
                samples.push(StrokeSample {
                    position: (origin + direction * (first + k * step)).as_vec2(),
                    direction: sample_direction,
                });
                k += 1.0;
            }
        }

        self.distance_accumulator = (distance - (first + last_k * step)).clamp(0.0, step) as f32;
        self.last_pos = Some(target);
        samples
    }

    /// Finish the stroke
    pub fn end(&mut self) {
        self.start = None;
        self.last_pos = None;
        self.start_pending = false;
        self.distance_accumulator = 0.0;
    }
}
