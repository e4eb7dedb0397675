//! # Post-Effect System
//!
//! Commands trigger cascading effects to keep the state consistent.
//!
//! ## Design
//!
//! When a command is applied, it may require additional changes elsewhere
//! in the state. For example:
//! - Deleting a node → forget its lock entry
//! - Deleting a class → detach it from every node
//! - Deleting the selected node → clear the selection
//!
//! Post-effects run after the primary command and before the commit, so
//! they land in the same undo step. They are:
//! - **Deterministic**: Same command always produces same effects
//! - **Order-independent**: Effects touch disjoint parts of the state
//! - **Minimal**: Only the state the command invalidated is touched

use crate::classes::DetachClass;
use crate::commands::Command;
use crate::drop::DragSource;
use crate::node::NodeId;
use crate::state::EditorState;

/// Secondary change triggered by a command
pub trait PostEffect: std::fmt::Debug {
    /// Inspect the applied command and patch `state` if needed
    fn run(&self, command: &Command, state: &mut EditorState);
}

/// Drop the lock entry of a node that was deleted or reparented
#[derive(Debug)]
pub struct ForgetLocks;

impl PostEffect for ForgetLocks {
    fn run(&self, command: &Command, state: &mut EditorState) {
        let node_id = match command {
            Command::RemoveNode { node_id } | Command::MoveNode { node_id, .. } => node_id,
            Command::Drop(request) => match &request.source {
                DragSource::Existing { node_id } => node_id,
                DragSource::Palette { .. } => return,
            },
            _ => return,
        };
        state.locks.forget(node_id);
    }
}

/// Remove a deleted class from every node that referenced it
#[derive(Debug)]
pub struct DetachDeletedClass;

impl PostEffect for DetachDeletedClass {
    fn run(&self, command: &Command, state: &mut EditorState) {
        let Command::DeleteClass { name } = command else {
            return;
        };
        let mut sweep = DetachClass::new(name);
        state.tree.accept_mut(&mut sweep);
        if state.selected_class.as_deref() == Some(name.as_str()) {
            state.selected_class = None;
        }
    }
}

/// Clear a selection that no longer resolves
#[derive(Debug)]
pub struct ClearStaleSelection;

impl PostEffect for ClearStaleSelection {
    fn run(&self, command: &Command, state: &mut EditorState) {
        let Command::RemoveNode { node_id } = command else {
            return;
        };
        // Resetting the root drops the selection even though "root" survives
        let stale = node_id.is_root()
            || state
                .selection
                .as_ref()
                .is_some_and(|id: &NodeId| !state.tree.contains(id));
        if stale {
            state.selection = None;
        }
    }
}

/// Post-effect engine that runs all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![
                Box::new(ForgetLocks),
                Box::new(DetachDeletedClass),
                Box::new(ClearStaleSelection),
            ],
        }
    }

    /// Run every effect for an applied command
    pub fn run(&self, command: &Command, state: &mut EditorState) {
        for effect in &self.effects {
            effect.run(command, state);
        }
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
