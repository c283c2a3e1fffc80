//! Scripted strokes (intro demo playback)
//!
//! A script is a queue of points fed into the normal stroke path a few at
//! a time, once per tick. A user pointer-down aborts it.

use std::collections::VecDeque;

use glam::Vec2;
use tracing::debug;

use super::{GardenPipeline, StrokeOwner};

/// Queued points of a scripted stroke
#[derive(Debug, Clone, Default)]
pub struct ScriptedStroke {
    points: VecDeque<Vec2>,
}

impl ScriptedStroke {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Points not yet played
    pub fn remaining(&self) -> usize {
        self.points.len()
    }

    fn next_point(&mut self) -> Option<Vec2> {
        self.points.pop_front()
    }
}

impl GardenPipeline {
    /// Start playing a scripted stroke. The first point is the press.
    ///
    /// Returns false (and does nothing) if the script is empty or a user
    /// stroke is in progress.
    pub fn start_script(&mut self, points: impl IntoIterator<Item = Vec2>) -> bool {
        if self.stroke_owner == Some(StrokeOwner::User) {
            debug!("start_script: user stroke in progress, ignoring");
            return false;
        }
        let mut script = ScriptedStroke::new(points);
        let Some(start) = script.next_point() else {
            return false;
        };
        self.start_stroke(start.x, start.y, StrokeOwner::Script);
        debug!("Script started with {} points", script.remaining() + 1);
        self.script = Some(script);
        true
    }

    /// Play up to `points_per_tick` queued points
    ///
    /// Returns true while the script still has points left.
    pub fn tick_script(&mut self, points_per_tick: usize) -> bool {
        let Some(mut script) = self.script.take() else {
            return false;
        };
        for _ in 0..points_per_tick.max(1) {
            let Some(point) = script.next_point() else {
                break;
            };
            self.advance_stroke(point.x, point.y);
        }

        if script.remaining() == 0 {
            self.finish_stroke();
            debug!("Script finished");
            return false;
        }
        self.script = Some(script);
        true
    }

    /// Whether a scripted stroke is playing
    pub fn is_scripting(&self) -> bool {
        self.script.is_some()
    }
}
