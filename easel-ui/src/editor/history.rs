// Undo/redo history module for the editor.
//
// A capped list of states plus a cursor. Recording while the cursor is behind
// the tail prunes the redo branch; recording past the cap evicts the oldest.

use tracing::{debug, trace};

pub const DEFAULT_MAX_STATES: usize = 50;

#[derive(Debug, Clone)]
pub struct History<T> {
    states: Vec<T>,
    current_index: usize,
    max_states: usize,
}

impl<T> History<T> {
    pub fn new(initial_state: T, max_states: usize) -> Self {
        let mut history = Self::empty(max_states);
        history.record(initial_state);
        history
    }

    pub fn empty(max_states: usize) -> Self {
        Self {
            states: Vec::new(),
            current_index: 0,
            max_states: max_states.max(1),
        }
    }

    /// Append a state, discarding anything after the cursor first.
    pub fn record(&mut self, state: T) {
        if !self.states.is_empty() && self.current_index + 1 < self.states.len() {
            let dropped = self.states.len() - self.current_index - 1;
            self.states.truncate(self.current_index + 1);
            debug!(dropped, "discarded redo branch");
        }

        self.states.push(state);
        if self.states.len() > self.max_states {
            self.states.remove(0);
            debug!(max_states = self.max_states, "history full, evicted oldest state");
        }

        self.current_index = self.states.len() - 1;
        trace!(cursor = self.current_index, len = self.states.len(), "recorded state");
    }

    /// Step back one state and return it, or None at the floor.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        debug!(cursor = self.current_index, len = self.states.len(), "undo");
        self.states.get(self.current_index)
    }

    /// Step forward one state and return it, or None at the tail.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        debug!(cursor = self.current_index, len = self.states.len(), "redo");
        self.states.get(self.current_index)
    }

    pub fn can_undo(&self) -> bool {
        !self.states.is_empty() && self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.states.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.states.get(self.current_index)
    }

    /// Drop everything and start over from a single state.
    pub fn reset(&mut self, initial_state: T) {
        self.states.clear();
        self.current_index = 0;
        self.record(initial_state);
    }

    pub fn cursor(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }

    pub fn states(&self) -> &[T] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_round_trip() {
        let mut h = History::new(0, 50);
        for op in 1..=10 {
            h.record(op);
        }

        for expected in (0..10).rev() {
            assert_eq!(h.undo(), Some(&expected));
        }
        assert_eq!(h.undo(), None);
        assert_eq!(h.current(), Some(&0));

        for expected in 1..=10 {
            assert_eq!(h.redo(), Some(&expected));
        }
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn record_prunes_redo_branch() {
        let mut h = History::new(0, 50);
        h.record(1);
        h.record(2);
        h.undo();
        h.undo();
        h.record(9);

        assert_eq!(h.states(), &[0, 9]);
        assert_eq!(h.cursor(), 1);
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut h = History::empty(50);
        for op in 1..=51 {
            h.record(op);
        }

        assert_eq!(h.len(), 50);
        assert_eq!(h.states()[0], 2);
        assert_eq!(h.cursor(), 49);
    }

    #[test]
    fn oldest_retained_after_many_ops() {
        let cap = 7;
        let mut h = History::empty(cap);
        let total = 30;
        for op in 1..=total {
            h.record(op);
            assert!(h.len() <= cap);
        }
        assert_eq!(h.states()[0], total - cap + 1);
    }

    #[test]
    fn empty_history_is_inert() {
        let mut h: History<u8> = History::empty(3);
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), None);
        assert_eq!(h.current(), None);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn reset_leaves_single_state() {
        let mut h = History::new(1, 5);
        h.record(2);
        h.reset(7);
        assert_eq!(h.states(), &[7]);
        assert_eq!(h.cursor(), 0);
    }
}
