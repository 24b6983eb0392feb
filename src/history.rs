//! Linear undo/redo log.
//!
//! The log always holds at least one entry: the state before any edit. The
//! cursor points at the entry that matches the live state. Recording a new
//! entry after an undo drops everything past the cursor first, so the log
//! never branches.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::doc::{Line, Point};

/// Immutable copy of the undoable part of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub points: Vec<Point>,
    pub lines: Vec<Line>,
}

/// Ordered snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct History<S> {
    entries: Vec<S>,
    index: usize,
}

impl<S: Clone> History<S> {
    /// Start a log whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self { entries: vec![initial], index: 0 }
    }

    /// Append `state` after the cursor, discarding any redo tail.
    pub fn record(&mut self, state: S) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry and return it, or `None` at the start of the log.
    pub fn undo(&mut self) -> Option<&S> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry and return it, or `None` at the end of the log.
    pub fn redo(&mut self) -> Option<&S> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: S) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<S: Clone + Default> Default for History<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
