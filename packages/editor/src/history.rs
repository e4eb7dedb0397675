//! # Undo/Redo History
//!
//! Snapshot-based: before every recorded command the session hands the
//! whole [`EditorState`] to [`History::record`]. Snapshots are owned deep
//! copies, so later edits to the live state never reach them.
//!
//! ## Design
//!
//! - `past` is bounded; the oldest snapshot is evicted first
//! - Recording a new snapshot clears `future`
//! - Undo swaps the live state with the newest past snapshot and keeps the
//!   displaced state for redo (and vice versa)
//! - Each entry carries the label of the command that followed it
//!
//! ## Example
//!
//! ```rust
//! use wireframe_editor::{EditorState, History};
//!
//! let mut history = History::new();
//! let mut state = EditorState::new();
//!
//! history.record(state.clone(), "Lock");
//! state.locks.lock("root".into());
//!
//! assert!(history.undo(&mut state));
//! assert!(state.locks.is_empty());
//! assert!(history.redo(&mut state));
//! assert_eq!(state.locks.len(), 1);
//! ```

use crate::state::EditorState;
use std::collections::VecDeque;

/// Default number of undo levels
pub const DEFAULT_HISTORY_DEPTH: usize = 64;

/// A stored state plus the label of the action it precedes
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub state: EditorState,
    pub label: String,
}

/// Undo/redo stacks for an edit session
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots before each action (most recent last)
    past: VecDeque<HistoryEntry>,

    /// Snapshots after each undone action (most recent last)
    future: Vec<HistoryEntry>,

    /// Maximum number of undo levels, at least 1
    max_depth: usize,
}

impl History {
    /// Create history with the default depth (64)
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_HISTORY_DEPTH)
    }

    /// History keeping at most `max_depth` undo levels. A depth of 0 is
    /// raised to 1; the past is always bounded.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state as it was before an action
    pub fn record(&mut self, state: EditorState, label: impl Into<String>) {
        self.push_past(HistoryEntry {
            state,
            label: label.into(),
        });
        // New action invalidates the future
        self.future.clear();
    }

    /// Restore the previous state into `current`
    pub fn undo(&mut self, current: &mut EditorState) -> bool {
        let Some(entry) = self.past.pop_back() else {
            return false;
        };
        let after = std::mem::replace(current, entry.state);
        self.future.push(HistoryEntry {
            state: after,
            label: entry.label,
        });
        true
    }

    /// Re-apply the most recently undone state into `current`
    pub fn redo(&mut self, current: &mut EditorState) -> bool {
        let Some(entry) = self.future.pop() else {
            return false;
        };
        let before = std::mem::replace(current, entry.state);
        self.push_past(HistoryEntry {
            state: before,
            label: entry.label,
        });
        true
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        while self.past.len() > self.max_depth {
            self.past.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Label of the action the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        self.past.back().map(|e| e.label.as_str())
    }

    /// Label of the action the next redo re-applies
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|e| e.label.as_str())
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};

    fn state_with(n: usize) -> EditorState {
        let mut state = EditorState::new();
        for i in 0..n {
            state
                .tree
                .insert_child(&"root".into(), Node::new(format!("n{}", i), NodeKind::Text), None)
                .unwrap();
        }
        state
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.max_depth(), DEFAULT_HISTORY_DEPTH);
    }

    #[test]
    fn test_undo_redo_swap_states() {
        let mut history = History::new();
        let mut live = state_with(1);

        history.record(live.clone(), "Add");
        live = state_with(2);

        assert!(history.undo(&mut live));
        assert_eq!(live, state_with(1));
        assert_eq!(history.redo_label(), Some("Add"));

        assert!(history.redo(&mut live));
        assert_eq!(live, state_with(2));
        assert_eq!(history.undo_label(), Some("Add"));
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new();
        let mut live = state_with(1);
        assert!(!history.undo(&mut live));
        assert!(!history.redo(&mut live));
        assert_eq!(live, state_with(1));
    }

    #[test]
    fn test_record_clears_future() {
        let mut history = History::new();
        let mut live = state_with(0);

        history.record(live.clone(), "a");
        live = state_with(1);
        history.undo(&mut live);
        assert_eq!(history.redo_levels(), 1);

        history.record(live.clone(), "b");
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.redo(&mut live));
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let mut history = History::with_max_depth(2);
        let mut live = state_with(0);
        for i in 1..=3 {
            history.record(live.clone(), format!("step {}", i));
            live = state_with(i);
        }

        assert_eq!(history.undo_levels(), 2);
        history.undo(&mut live);
        history.undo(&mut live);
        // "step 1" was evicted; the oldest reachable state is after it
        assert_eq!(live, state_with(1));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_depth_still_bounded() {
        let mut history = History::with_max_depth(0);
        assert_eq!(history.max_depth(), 1);

        let mut live = state_with(0);
        for i in 1..=5 {
            history.record(live.clone(), "step");
            live = state_with(i);
        }
        assert_eq!(history.undo_levels(), 1);
    }
}
