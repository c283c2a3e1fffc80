//! Stroke handling for the garden pipeline

use glam::Vec2;
use tracing::debug;

use crate::rake::{tine_centers, StrokeSample};
use crate::symmetry::StrokeFrame;

use super::{GardenPipeline, StrokeOwner};

/// Grains sprayed per mirrored stroke sample
const PARTICLES_PER_SAMPLE: usize = 3;

impl GardenPipeline {
    /// Begin a user stroke at `(x, y)` in grid coordinates
    ///
    /// A running script is aborted (its edits stay) and a fresh undo
    /// snapshot is taken before anything is carved.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        if self.script.take().is_some() {
            debug!("begin_stroke: aborting scripted stroke");
        }
        self.start_stroke(x, y, StrokeOwner::User);
    }

    /// Continue the user stroke
    pub fn stroke_to(&mut self, x: f32, y: f32) {
        if self.stroke_owner != Some(StrokeOwner::User) {
            debug!("stroke_to: no active stroke, ignoring");
            return;
        }
        self.advance_stroke(x, y);
    }

    /// Finish the user stroke
    pub fn end_stroke(&mut self) {
        if self.stroke_owner != Some(StrokeOwner::User) {
            return;
        }
        self.finish_stroke();
    }

    /// Abandon the user stroke and put back the grid as it was at its start
    pub fn cancel_stroke(&mut self) {
        if self.stroke_owner != Some(StrokeOwner::User) {
            return;
        }
        let origin = self.stroke_origin.take();
        let recorded = self.stroke_recorded;
        self.finish_stroke();

        let Some(origin) = origin else {
            return;
        };
        if recorded {
            self.history.discard_newest();
        }
        if self.grid.restore(&origin) {
            self.dirty.mark_all(self.grid.width, self.grid.height);
        }
        debug!("Stroke cancelled");
    }

    /// Whether any stroke (user or scripted) is in progress
    pub fn is_stroking(&self) -> bool {
        self.stroke_owner.is_some()
    }

    pub(crate) fn start_stroke(&mut self, x: f32, y: f32, owner: StrokeOwner) {
        if self.stroke_owner.is_some() {
            self.finish_stroke();
        }
        let origin = self.grid.snapshot();
        self.stroke_recorded = self.history.push(origin.clone());
        self.stroke_origin = Some(origin);
        self.interpolator.begin(x, y, self.axis_lock);
        self.stroke_owner = Some(owner);
        debug!("Stroke started at ({:.1}, {:.1}) by {:?}", x, y, owner);
    }

    pub(crate) fn advance_stroke(&mut self, x: f32, y: f32) {
        let step = self.settings.rake.step_distance();
        let (min, max) = self.stroke_bounds();
        self.interpolator.set_bounds(min, max);
        let samples = self.interpolator.stroke_to(x, y, step);
        for sample in samples {
            self.apply_sample(sample);
        }
    }

    pub(crate) fn finish_stroke(&mut self) {
        self.interpolator.end();
        self.stroke_owner = None;
        self.stroke_origin = None;
        self.stroke_recorded = false;
    }

    /// Box outside which a sample cannot touch any cell, in any mirror
    fn stroke_bounds(&self) -> (Vec2, Vec2) {
        let rake = &self.settings.rake;
        let w = self.grid.width as f32;
        let h = self.grid.height as f32;
        let half_rake = (rake.effective_tine_count() - 1) as f32 / 2.0 * rake.tine_spacing.abs();
        let mut pad = half_rake + rake.tine_radius.max(0.0) + 2.0;
        // the diagonal mirror rescales distances by the aspect ratio
        if self.settings.symmetry.mirror_d && w > 0.0 && h > 0.0 {
            pad *= (w / h).max(h / w);
        }
        (Vec2::splat(-pad), Vec2::new(w - 1.0 + pad, h - 1.0 + pad))
    }

    /// Carve every tine of every mirrored copy of one sample
    fn apply_sample(&mut self, sample: StrokeSample) {
        let mode = self.mode();
        let params = self.carve_params();
        let rake = &self.settings.rake;
        let tine_count = rake.effective_tine_count();
        let spacing = rake.tine_spacing;
        let radius = rake.tine_radius;

        let base = StrokeFrame::new(sample.position, sample.direction);
        let frames = self.symmetry().expand(base, self.grid.width, self.grid.height);

        for frame in &frames {
            for center in tine_centers(frame, tine_count, spacing) {
                self.engine.carve_tine(
                    &mut self.grid,
                    &mut self.dirty,
                    mode,
                    &params,
                    center,
                    radius,
                    frame.direction,
                );
            }

            if self.settings.particles {
                let cx = frame.position.x.round() as i32;
                let cy = frame.position.y.round() as i32;
                if let Some(color) = self.grid.color_at(cx, cy) {
                    self.particles.emit(
                        frame.position,
                        frame.direction,
                        color,
                        PARTICLES_PER_SAMPLE,
                        &mut self.rng,
                    );
                }
            }
        }
    }
}
