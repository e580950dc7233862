//! Snapshot-based undo/redo.

use std::collections::VecDeque;

/// Maximum number of states kept, including the current one.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A bounded stack of full-state snapshots with a cursor.
///
/// Pushing a new state discards everything after the cursor. When the stack
/// is full the oldest snapshot is dropped.
#[derive(Debug, Clone)]
pub struct History<T> {
    states: VecDeque<T>,
    index: usize,
    limit: usize,
}

impl<T: Clone> History<T> {
    /// Start a history at `initial`. A `limit` of zero is treated as one.
    pub fn new(initial: T, limit: usize) -> Self {
        let mut states = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT));
        states.push_back(initial);
        Self {
            states,
            index: 0,
            limit: limit.max(1),
        }
    }

    /// The state under the cursor.
    pub fn current(&self) -> &T {
        &self.states[self.index]
    }

    /// Record a new state and move the cursor onto it.
    pub fn push(&mut self, state: T) {
        self.states.truncate(self.index + 1);
        self.states.push_back(state);
        while self.states.len() > self.limit {
            self.states.pop_front();
        }
        self.index = self.states.len() - 1;
    }

    /// Step back. Returns false if already at the oldest state.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward. Returns false if already at the newest state.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.states.len()
    }

    /// Drop all history and start again from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.states.clear();
        self.states.push_back(initial);
        self.index = 0;
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false; a history holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Configured capacity.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_the_stack() {
        let mut h = History::new(0, DEFAULT_HISTORY_LIMIT);
        assert!(!h.can_undo());
        h.push(1);
        h.push(2);
        assert_eq!(*h.current(), 2);
        assert!(h.undo());
        assert_eq!(*h.current(), 1);
        assert!(h.undo());
        assert_eq!(*h.current(), 0);
        assert!(!h.undo());
        assert!(h.redo());
        assert!(h.redo());
        assert_eq!(*h.current(), 2);
        assert!(!h.redo());
    }

    #[test]
    fn push_discards_redo_branch() {
        let mut h = History::new("a", 10);
        h.push("b");
        h.push("c");
        h.undo();
        h.undo();
        h.push("d");
        assert_eq!(*h.current(), "d");
        assert!(!h.can_redo());
        assert_eq!(h.len(), 2);
        h.undo();
        assert_eq!(*h.current(), "a");
    }

    #[test]
    fn capped_at_limit() {
        let mut h = History::new(0, DEFAULT_HISTORY_LIMIT);
        for i in 1..=120 {
            h.push(i);
        }
        assert_eq!(h.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(*h.current(), 120);
        assert!(!h.can_redo());

        let mut steps = 0;
        while h.undo() {
            steps += 1;
        }
        assert_eq!(steps, DEFAULT_HISTORY_LIMIT - 1);
        assert_eq!(*h.current(), 71);
    }

    #[test]
    fn reset_clears_everything() {
        let mut h = History::new(1, 5);
        h.push(2);
        h.reset(9);
        assert_eq!(*h.current(), 9);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn zero_limit_keeps_current_state() {
        let mut h = History::new(1, 0);
        h.push(2);
        assert_eq!(h.limit(), 1);
        assert_eq!(*h.current(), 2);
        assert!(!h.can_undo());
    }
}
