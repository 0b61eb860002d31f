//! Bounded undo/redo history.
//!
//! Stores whole snapshots rather than inverse commands: the reducer pushes
//! the pre-edit state before every mutation, and undo/redo swap snapshots
//! between the two stacks. Snapshots are expected to be cheap to clone
//! (the editor stores `Arc`s).

use std::collections::VecDeque;

use scenecut_core::editor_limits::CLIP_UNDO_STATES;

/// Undo/redo history stack.
#[derive(Debug, Clone, PartialEq)]
pub struct History<S> {
    /// Prior states (most recent last).
    undo: VecDeque<S>,
    /// States that have been undone (most recent last).
    redo: Vec<S>,
    /// Maximum undo depth.
    capacity: usize,
}

impl<S: Clone> History<S> {
    /// Create an empty history keeping at most `capacity` undo states.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity.min(64)),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Record the state that existed before an edit.
    /// Clears the redo stack (a new edit invalidates redo history).
    pub fn record(&mut self, previous: S) {
        self.redo.clear();
        self.push_undo(previous);
    }

    fn push_undo(&mut self, state: S) {
        self.undo.push_back(state);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    /// Step back: `current` moves to the redo stack and the most recent
    /// prior state is returned.
    pub fn undo(&mut self, current: &S) -> Option<S> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Step forward: `current` moves back onto the undo stack and the most
    /// recently undone state is returned.
    pub fn redo(&mut self, current: &S) -> Option<S> {
        let next = self.redo.pop()?;
        self.push_undo(current.clone());
        Some(next)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<S: Clone> Default for History<S> {
    fn default() -> Self {
        Self::new(CLIP_UNDO_STATES)
    }
}
