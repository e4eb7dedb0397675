//! # Edit Session
//!
//! One user's editing session: the live [`EditorState`], its undo history
//! and the transient interaction state (clipboard, drag in progress).
//!
//! Every mutating entry point funnels through [`EditSession::apply`]:
//!
//! ```text
//! validate ──✗ guard──→ Ok(false), nothing recorded
//!    │      ──✗ validation──→ Err, nothing recorded
//!    ▼
//! snapshot ─→ execute ─→ post-effects ─→ record ─→ commit hook
//! ```
//!
//! Exactly one snapshot is taken per gesture, however many internal steps
//! the command performs.

use crate::commands::Command;
use crate::config::SessionConfig;
use crate::document::{export_document, parse_document};
use crate::drop::{DragSource, DropRequest, Point, Rect};
use crate::errors::EditorError;
use crate::history::History;
use crate::ids::IdGenerator;
use crate::node::{Node, NodeId, NodeKind};
use crate::post_effects::PostEffectEngine;
use crate::state::EditorState;
use crate::style::StyleMap;
use crate::tree::{walk_node_mut, Tree, VisitorMut};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument};

/// Label of the snapshot pushed when a session starts
pub const INITIAL_LABEL: &str = "Open";

/// Passed to the commit hook after every committed change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit<'a> {
    pub label: &'a str,
    pub version: u64,
}

pub type CommitHook = Box<dyn FnMut(Commit<'_>)>;

/// Single-user edit session
pub struct EditSession {
    state: EditorState,
    history: History,
    ids: IdGenerator,
    effects: PostEffectEngine,

    /// Deep copy taken by `copy`
    clipboard: Option<Node>,

    /// Node picked up by `begin_drag`
    dragging: Option<NodeId>,

    /// Incremented on every commit, undo and redo
    version: u64,

    on_commit: Option<CommitHook>,
}

impl EditSession {
    /// Session over a fresh tree with default options
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_state(EditorState::new(), config)
    }

    /// Session over an exported document. Unlike
    /// [`import_json`](Self::import_json), loading is not an undo step.
    pub fn open(json: &str, config: SessionConfig) -> Result<Self, EditorError> {
        let root = parse_document(json)?;
        let mut state = EditorState::new();
        state.tree.replace_root(root);
        info!(nodes = state.tree.len(), "Opened document");
        Ok(Self::with_state(state, config))
    }

    fn with_state(state: EditorState, config: SessionConfig) -> Self {
        let ids = match config.id_seed {
            Some(seed) => IdGenerator::from_seed(seed),
            None => IdGenerator::new(),
        };
        let mut history = History::with_max_depth(config.history_depth);
        if config.seed_history {
            history.record(state.clone(), INITIAL_LABEL);
        }

        Self {
            state,
            history,
            ids,
            effects: PostEffectEngine::new(),
            clipboard: None,
            dragging: None,
            version: 0,
            on_commit: None,
        }
    }

    /// Register the render trigger
    pub fn on_commit(&mut self, hook: impl FnMut(Commit<'_>) + 'static) {
        self.on_commit = Some(Box::new(hook));
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.state.selection.as_ref()
    }

    pub fn clipboard(&self) -> Option<&Node> {
        self.clipboard.as_ref()
    }

    pub fn dragging(&self) -> Option<&NodeId> {
        self.dragging.as_ref()
    }

    /// Apply a command as one undoable step.
    ///
    /// Returns `Ok(true)` when the state changed and `Ok(false)` when the
    /// command was a guarded no-op (stale id, locked target, cycle).
    #[instrument(skip(self, command), fields(command = command.label()))]
    pub fn apply(&mut self, command: Command) -> Result<bool, EditorError> {
        match command.validate(&self.state) {
            Ok(()) => {}
            Err(EditorError::Mutation(reason)) => {
                debug!(%reason, "Command skipped");
                return Ok(false);
            }
            Err(err) => return Err(err),
        }

        // Unrecorded commands only touch selection pointers and cannot fail
        let before = command.is_recorded().then(|| self.state.clone());

        if let Err(err) = command.execute(&mut self.state, &mut self.ids) {
            if let Some(before) = before {
                self.state = before;
            }
            return match err {
                EditorError::Mutation(reason) => {
                    debug!(%reason, "Command rolled back");
                    Ok(false)
                }
                other => Err(other),
            };
        }

        self.effects.run(&command, &mut self.state);
        if let Some(before) = before {
            self.history.record(before, command.label());
        }
        self.commit(command.label());
        Ok(true)
    }

    /// Restore the state before the last recorded command
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.state) {
            return false;
        }
        let label = self.history.redo_label().unwrap_or_default().to_string();
        info!(%label, "Undo");
        self.dragging = None;
        self.commit(&label);
        true
    }

    /// Re-apply the last undone command
    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.state) {
            return false;
        }
        let label = self.history.undo_label().unwrap_or_default().to_string();
        info!(%label, "Redo");
        self.dragging = None;
        self.commit(&label);
        true
    }

    fn commit(&mut self, label: &str) {
        self.version += 1;
        if let Some(hook) = self.on_commit.as_mut() {
            hook(Commit {
                label,
                version: self.version,
            });
        }
    }

    pub fn select(&mut self, id: Option<NodeId>) -> Result<bool, EditorError> {
        self.apply(Command::Select { node_id: id })
    }

    /// Add a palette node as the last child of `parent`.
    ///
    /// Returns the generated id when the node was inserted.
    pub fn create_node(
        &mut self,
        parent: &NodeId,
        kind: NodeKind,
    ) -> Result<Option<NodeId>, EditorError> {
        let tree = &self.state.tree;
        let id = self.ids.fresh_id(|id| tree.contains(id));
        let inserted = self.apply(Command::InsertNode {
            parent_id: parent.clone(),
            index: None,
            node: Node::new(id.clone(), kind),
        })?;
        Ok(inserted.then_some(id))
    }

    pub fn delete_selected(&mut self) -> Result<bool, EditorError> {
        match self.state.selection.clone() {
            Some(node_id) => self.apply(Command::RemoveNode { node_id }),
            None => Ok(false),
        }
    }

    pub fn lock(&mut self, id: &NodeId) -> Result<bool, EditorError> {
        self.apply(Command::Lock {
            node_id: id.clone(),
        })
    }

    pub fn unlock(&mut self, id: &NodeId) -> Result<bool, EditorError> {
        self.apply(Command::Unlock {
            node_id: id.clone(),
        })
    }

    /// Register a class and return the name it is stored under
    pub fn add_class(&mut self, raw_name: &str) -> Result<String, EditorError> {
        let name = self.state.classes.check_new(raw_name)?;
        self.apply(Command::AddClass {
            name: raw_name.to_string(),
        })?;
        Ok(name)
    }

    pub fn delete_class(&mut self, name: &str) -> Result<bool, EditorError> {
        self.apply(Command::DeleteClass {
            name: name.to_string(),
        })
    }

    /// Copy the selected node (never the root) into the clipboard
    pub fn copy(&mut self) -> bool {
        let Some(node) = self.state.selected_node() else {
            return false;
        };
        if node.is_root() {
            return false;
        }
        self.clipboard = Some(node.clone());
        true
    }

    /// Insert a fresh-id clone of the clipboard after the selection
    pub fn paste(&mut self) -> Result<bool, EditorError> {
        let (Some(template), Some(after)) = (self.clipboard.as_ref(), self.state.selection.clone())
        else {
            return Ok(false);
        };
        let mut node = template.clone();
        let mut reassign = ReassignIds {
            ids: &mut self.ids,
            tree: &self.state.tree,
            assigned: HashSet::new(),
        };
        reassign.visit_node_mut(&mut node);

        self.apply(Command::Paste {
            after: Some(after),
            node,
        })
    }

    /// Start dragging an existing node. Locked nodes and the root stay put.
    pub fn begin_drag(&mut self, id: &NodeId) -> bool {
        if id.is_root() || !self.state.tree.contains(id) || self.state.is_locked(id) {
            return false;
        }
        self.dragging = Some(id.clone());
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Finish a drag over `target`.
    ///
    /// A `template` drops a new palette node; otherwise the node recorded
    /// by [`begin_drag`](Self::begin_drag) moves. The drag ends either way.
    #[instrument(skip(self, rect, pointer))]
    pub fn drop_at(
        &mut self,
        target: &NodeId,
        rect: Rect,
        pointer: Point,
        template: Option<NodeKind>,
    ) -> Result<bool, EditorError> {
        let dragged = self.dragging.take();
        let source = match (template, dragged) {
            (Some(kind), _) => DragSource::Palette { kind },
            (None, Some(node_id)) => DragSource::Existing { node_id },
            (None, None) => return Ok(false),
        };
        let request = DropRequest::at(source, target.clone(), rect, pointer);
        debug!(zone = ?request.zone, "Drop classified");
        self.apply(Command::Drop(request))
    }

    /// Replace the tree with an exported document.
    ///
    /// Malformed input fails with [`EditorError::InvalidInput`] and leaves
    /// the session untouched.
    pub fn import_json(&mut self, json: &str) -> Result<bool, EditorError> {
        let root = parse_document(json)?;
        let applied = self.apply(Command::ReplaceTree { root })?;
        info!(nodes = self.state.tree.len(), "Imported document");
        Ok(applied)
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        export_document(&self.state.tree)
    }

    pub fn effective_style(&self, id: &NodeId) -> Option<StyleMap> {
        self.state.effective_style(id)
    }

    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.state.is_locked(id)
    }

    pub fn topmost_locked_ancestor(&self, id: &NodeId) -> Option<NodeId> {
        self.state.topmost_locked_ancestor(id)
    }

    pub fn breadcrumb(&self, id: &NodeId) -> Option<String> {
        self.state.tree.breadcrumb(id)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("ids", &self.ids)
            .field("clipboard", &self.clipboard)
            .field("dragging", &self.dragging)
            .field("version", &self.version)
            .field("on_commit", &self.on_commit.is_some())
            .finish()
    }
}

/// Gives every node of a clipboard clone an id unused in the tree
struct ReassignIds<'a> {
    ids: &'a mut IdGenerator,
    tree: &'a Tree,
    assigned: HashSet<NodeId>,
}

impl VisitorMut for ReassignIds<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        let tree = self.tree;
        let assigned = &self.assigned;
        let id = self
            .ids
            .fresh_id(|id| tree.contains(id) || assigned.contains(id));
        self.assigned.insert(id.clone());
        node.id = id;
        walk_node_mut(self, node);
    }
}
