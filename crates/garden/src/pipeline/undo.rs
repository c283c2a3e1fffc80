//! Undo functionality for the garden pipeline

use std::collections::VecDeque;
use tracing::debug;

use crate::grid::Snapshot;

use super::GardenPipeline;

/// Bounded undo/redo stacks of whole-grid snapshots
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(max_depth),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before a new edit. Clears redo.
    ///
    /// Returns false if the depth is zero and nothing was kept.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        self.redo.clear();
        self.push_undo(snapshot)
    }

    /// Drop the newest undo entry without applying it
    pub fn discard_newest(&mut self) -> Option<Snapshot> {
        self.undo.pop_back()
    }

    fn push_undo(&mut self, snapshot: Snapshot) -> bool {
        if self.max_depth == 0 {
            return false;
        }
        while self.undo.len() >= self.max_depth {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
        true
    }

    /// Change the depth, evicting the oldest entries if needed
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        while self.undo.len() > max_depth {
            self.undo.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

impl GardenPipeline {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.history.undo_len()
    }

    /// Undo the last stroke
    ///
    /// Returns true if an undo was performed, false if no undo available
    pub fn undo(&mut self) -> bool {
        if self.is_stroking() {
            debug!("Undo: stroke in progress, ignoring");
            return false;
        }
        let Some(entry) = self.history.undo.pop_back() else {
            debug!("Undo: no entries available");
            return false;
        };

        self.history.redo.push(self.grid.snapshot());
        self.apply_snapshot(&entry);
        debug!(
            "Undo applied ({} undo, {} redo left)",
            self.history.undo_len(),
            self.history.redo_len()
        );
        true
    }

    /// Redo the last undone stroke
    ///
    /// Returns true if a redo was performed
    pub fn redo(&mut self) -> bool {
        if self.is_stroking() {
            debug!("Redo: stroke in progress, ignoring");
            return false;
        }
        let Some(entry) = self.history.redo.pop() else {
            debug!("Redo: no entries available");
            return false;
        };

        // bypass push so redo stays intact
        self.history.push_undo(self.grid.snapshot());
        self.apply_snapshot(&entry);
        debug!("Redo applied ({} redo left)", self.history.redo_len());
        true
    }

    fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        if self.grid.restore(snapshot) {
            self.dirty.mark_all(self.grid.width, self.grid.height);
        }
    }
}
