//! # Editing Commands
//!
//! Every state change a user gesture can make, as a value.
//!
//! ## Design Principles
//!
//! 1. **Validate, then execute**: validation sees the whole state and never
//!    mutates; execution only runs on a validated command
//! 2. **Silent guards**: stale ids, locked targets and cyclic moves fail
//!    with a [`MutationError`], which the session treats as "no change"
//! 3. **Loud validation**: bad class names and malformed documents fail
//!    with a user-facing [`EditorError`]
//! 4. **One gesture, one command**: a drop that reparents, restyles the
//!    parent and resizes all siblings is a single command and a single
//!    undo step
//!
//! Commands serialize with serde, so editing scripts can be stored and
//! replayed.

use crate::document::validate_root;
use crate::drop::{insert_beside, plan_drop, DragSource, DropPlan, DropRequest};
use crate::errors::{EditorError, MutationError};
use crate::ids::IdGenerator;
use crate::node::{ClassRefs, Node, NodeId, NodeKind, PropKey};
use crate::state::EditorState;
use crate::tree::{check_structure, walk};
use serde::{Deserialize, Serialize};

/// Smallest width a resize gesture may produce, in px
pub const MIN_RESIZE_WIDTH: f64 = 40.0;

/// Smallest height a resize gesture may produce, in px
pub const MIN_RESIZE_HEIGHT: f64 = 30.0;

/// Semantic editing commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Select a node (redirected to its outermost locked ancestor) or clear
    /// the selection. Not recorded in history.
    Select { node_id: Option<NodeId> },

    /// Insert a prepared subtree under a container
    InsertNode {
        parent_id: NodeId,
        index: Option<usize>,
        node: Node,
    },

    /// Delete a subtree. Deleting the root resets it to an empty root.
    RemoveNode { node_id: NodeId },

    /// Reparent a node as the last child of a container
    MoveNode {
        node_id: NodeId,
        new_parent_id: NodeId,
    },

    /// Set one inline style property; an empty value clears it
    SetStyle {
        node_id: NodeId,
        property: String,
        value: String,
    },

    /// Set a kind-specific attribute (text, src, href)
    SetProp {
        node_id: NodeId,
        key: PropKey,
        value: String,
    },

    /// Replace the class list of a node
    SetClasses { node_id: NodeId, classes: ClassRefs },

    /// Pixel resize from the resize handles
    Resize {
        node_id: NodeId,
        width: Option<f64>,
        height: Option<f64>,
    },

    Lock { node_id: NodeId },

    Unlock { node_id: NodeId },

    /// Register a class; the name is validated and normalized
    AddClass { name: String },

    /// Remove a class and detach it from every node
    DeleteClass { name: String },

    /// Set one property of a class style; an empty value clears it
    SetClassStyle {
        name: String,
        property: String,
        value: String,
    },

    /// Point the class editor at a class. Not recorded in history.
    SelectClass { name: Option<String> },

    /// A classified drop gesture
    Drop(DropRequest),

    /// Insert a clipboard copy after `after` (or first in the root) and
    /// select it
    Paste { after: Option<NodeId>, node: Node },

    /// Replace the whole tree (import)
    ReplaceTree { root: Node },
}

impl Command {
    /// Human-readable name, used as the undo label
    pub fn label(&self) -> &'static str {
        match self {
            Command::Select { .. } => "Select",
            Command::InsertNode { .. } => "Insert",
            Command::RemoveNode { .. } => "Delete",
            Command::MoveNode { .. } => "Move",
            Command::SetStyle { .. } => "Edit style",
            Command::SetProp { .. } => "Edit property",
            Command::SetClasses { .. } => "Edit classes",
            Command::Resize { .. } => "Resize",
            Command::Lock { .. } => "Lock",
            Command::Unlock { .. } => "Unlock",
            Command::AddClass { .. } => "Add class",
            Command::DeleteClass { .. } => "Delete class",
            Command::SetClassStyle { .. } => "Edit class",
            Command::SelectClass { .. } => "Select class",
            Command::Drop(_) => "Drop",
            Command::Paste { .. } => "Paste",
            Command::ReplaceTree { .. } => "Import",
        }
    }

    /// Whether the session snapshots state before this command
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Command::Select { .. } | Command::SelectClass { .. })
    }

    /// Validate and apply in one step
    pub fn apply(&self, state: &mut EditorState, ids: &mut IdGenerator) -> Result<(), EditorError> {
        self.validate(state)?;
        self.execute(state, ids)
    }

    /// Validate without applying
    pub fn validate(&self, state: &EditorState) -> Result<(), EditorError> {
        match self {
            Command::Select { node_id } => {
                if let Some(id) = node_id {
                    existing(state, id)?;
                }
                Ok(())
            }

            Command::InsertNode {
                parent_id, node, ..
            } => {
                container_accepting_drop(state, parent_id)?;
                check_fresh_subtree(state, node)?;
                Ok(())
            }

            Command::RemoveNode { node_id } => {
                existing(state, node_id)?;
                Ok(())
            }

            Command::MoveNode {
                node_id,
                new_parent_id,
            } => {
                state.tree.check_move(node_id, new_parent_id)?;
                if state.is_locked(node_id) {
                    return Err(MutationError::Locked(node_id.clone()).into());
                }
                if state.is_locked(new_parent_id) {
                    return Err(MutationError::Locked(new_parent_id.clone()).into());
                }
                Ok(())
            }

            Command::SetStyle {
                node_id,
                property,
                value,
            } => {
                let node = editable(state, node_id)?;
                check_property(property)?;
                if node.props.style.get(property).unwrap_or("") == value.trim() {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::SetProp {
                node_id,
                key,
                value,
            } => {
                let node = editable(state, node_id)?;
                if !supports_prop(node.kind, *key) {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} has no {:?} attribute",
                        node.kind.label(),
                        key
                    ))
                    .into());
                }
                if node.props.get(*key) == Some(value.as_str()) {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::SetClasses { node_id, classes } => {
                if node_id.is_root() {
                    return Err(MutationError::RootImmutable.into());
                }
                let node = editable(state, node_id)?;
                if let Some(missing) = classes.iter().find(|c| !state.classes.contains(c)) {
                    return Err(MutationError::ClassNotFound(missing.to_string()).into());
                }
                if &node.props.class_refs == classes {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::Resize {
                node_id,
                width,
                height,
            } => {
                editable(state, node_id)?;
                let sizes = [width, height];
                if sizes.iter().all(|s| s.is_none()) {
                    return Err(MutationError::Unchanged.into());
                }
                if sizes.iter().flat_map(|s| s.iter()).any(|v| !v.is_finite()) {
                    return Err(MutationError::InvalidStructure("non-finite size".to_string()).into());
                }
                Ok(())
            }

            Command::Lock { node_id } => {
                existing(state, node_id)?;
                if state.locks.contains(node_id) {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::Unlock { node_id } => {
                existing(state, node_id)?;
                if !state.locks.contains(node_id) {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::AddClass { name } => {
                state.classes.check_new(name)?;
                Ok(())
            }

            Command::DeleteClass { name } => {
                existing_class(state, name)?;
                Ok(())
            }

            Command::SetClassStyle {
                name,
                property,
                value,
            } => {
                existing_class(state, name)?;
                check_property(property)?;
                let current = state.classes.get(name).and_then(|s| s.get(property));
                if current.unwrap_or("") == value.trim() {
                    return Err(MutationError::Unchanged.into());
                }
                Ok(())
            }

            Command::SelectClass { name } => {
                if let Some(name) = name {
                    existing_class(state, name)?;
                }
                Ok(())
            }

            Command::Drop(request) => {
                plan_drop(&state.tree, &state.locks, request)?;
                Ok(())
            }

            Command::Paste { after, node } => {
                let (parent, _) = paste_position(state, after.as_ref());
                container_accepting_drop(state, &parent)?;
                check_fresh_subtree(state, node)?;
                Ok(())
            }

            Command::ReplaceTree { root } => validate_root(root),
        }
    }

    /// Apply a command that already passed [`validate`](Self::validate)
    pub(crate) fn execute(
        &self,
        state: &mut EditorState,
        ids: &mut IdGenerator,
    ) -> Result<(), EditorError> {
        match self {
            Command::Select { node_id } => {
                state.selection = node_id
                    .as_ref()
                    .map(|id| state.topmost_locked_ancestor(id).unwrap_or_else(|| id.clone()));
            }

            Command::InsertNode {
                parent_id,
                index,
                node,
            } => {
                state.tree.insert_child(parent_id, node.clone(), *index)?;
            }

            Command::RemoveNode { node_id } => {
                if node_id.is_root() {
                    state.tree.replace_root(Node::empty_root());
                } else {
                    state
                        .tree
                        .remove(node_id)
                        .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                }
            }

            Command::MoveNode {
                node_id,
                new_parent_id,
            } => {
                state.tree.move_node(node_id, new_parent_id)?;
            }

            Command::SetStyle {
                node_id,
                property,
                value,
            } => {
                let node = node_mut(state, node_id)?;
                node.props.style.set(property.trim(), value.trim());
            }

            Command::SetProp {
                node_id,
                key,
                value,
            } => {
                let node = node_mut(state, node_id)?;
                node.props.set(*key, value.clone());
            }

            Command::SetClasses { node_id, classes } => {
                let node = node_mut(state, node_id)?;
                node.props.class_refs = classes.clone();
            }

            Command::Resize {
                node_id,
                width,
                height,
            } => {
                let node = node_mut(state, node_id)?;
                if let Some(w) = width {
                    node.props.style.set("width", px(w.max(MIN_RESIZE_WIDTH)));
                }
                if let Some(h) = height {
                    node.props.style.set("height", px(h.max(MIN_RESIZE_HEIGHT)));
                }
            }

            Command::Lock { node_id } => {
                state.locks.lock(node_id.clone());
            }

            Command::Unlock { node_id } => {
                state.locks.unlock(node_id);
            }

            Command::AddClass { name } => {
                state.classes.add(name)?;
            }

            Command::DeleteClass { name } => {
                state
                    .classes
                    .remove(name)
                    .ok_or_else(|| MutationError::ClassNotFound(name.clone()))?;
            }

            Command::SetClassStyle {
                name,
                property,
                value,
            } => {
                let style = state
                    .classes
                    .get_mut(name)
                    .ok_or_else(|| MutationError::ClassNotFound(name.clone()))?;
                style.set(property.trim(), value.trim());
            }

            Command::SelectClass { name } => {
                state.selected_class = name.clone();
            }

            Command::Drop(request) => {
                let plan = plan_drop(&state.tree, &state.locks, request)?;
                let node = match &request.source {
                    DragSource::Palette { kind } => {
                        let tree = &state.tree;
                        Node::new(ids.fresh_id(|id| tree.contains(id)), *kind)
                    }
                    DragSource::Existing { node_id } => state
                        .tree
                        .remove(node_id)
                        .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?,
                };
                match plan {
                    DropPlan::Beside {
                        parent,
                        target,
                        zone,
                    } => insert_beside(&mut state.tree, &parent, &target, zone, node)?,
                    DropPlan::Append { parent } => state.tree.insert_child(&parent, node, None)?,
                }
            }

            Command::Paste { after, node } => {
                let (parent, index) = paste_position(state, after.as_ref());
                state.tree.insert_child(&parent, node.clone(), index)?;
                state.selection = Some(node.id.clone());
            }

            Command::ReplaceTree { root } => {
                state.tree.replace_root(root.clone());
                state.selection = None;
                state.locks.clear();
            }
        }
        Ok(())
    }
}

/// Text is editable on text-like kinds, src on images, href on links
pub fn supports_prop(kind: NodeKind, key: PropKey) -> bool {
    match key {
        PropKey::Text => matches!(kind, NodeKind::Text | NodeKind::Button | NodeKind::Link),
        PropKey::Src => kind == NodeKind::Image,
        PropKey::Href => kind == NodeKind::Link,
    }
}

fn px(value: f64) -> String {
    format!("{}px", value.round())
}

fn existing<'a>(state: &'a EditorState, id: &NodeId) -> Result<&'a Node, MutationError> {
    state
        .tree
        .find(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))
}

/// Exists and is not inside a locked subtree
fn editable<'a>(state: &'a EditorState, id: &NodeId) -> Result<&'a Node, MutationError> {
    let node = existing(state, id)?;
    if state.is_locked(id) {
        return Err(MutationError::Locked(id.clone()));
    }
    Ok(node)
}

fn container_accepting_drop(state: &EditorState, id: &NodeId) -> Result<(), MutationError> {
    let node = state
        .tree
        .find(id)
        .ok_or_else(|| MutationError::ParentNotFound(id.clone()))?;
    if !node.can_have_children() {
        return Err(MutationError::NotAContainer(id.clone()));
    }
    if state.is_locked(id) {
        return Err(MutationError::Locked(id.clone()));
    }
    Ok(())
}

fn existing_class(state: &EditorState, name: &str) -> Result<(), MutationError> {
    if state.classes.contains(name) {
        Ok(())
    } else {
        Err(MutationError::ClassNotFound(name.to_string()))
    }
}

fn check_property(property: &str) -> Result<(), MutationError> {
    if property.trim().is_empty() || property.contains([':', ';']) {
        return Err(MutationError::InvalidStructure(format!(
            "invalid style property {:?}",
            property
        )));
    }
    Ok(())
}

/// A subtree about to enter the tree: well-formed, and no id collides
fn check_fresh_subtree(state: &EditorState, node: &Node) -> Result<(), MutationError> {
    check_structure(node)?;
    if let Some(dup) = walk(node).map(|v| &v.node.id).find(|id| state.tree.contains(id)) {
        return Err(MutationError::DuplicateId(dup.clone()));
    }
    Ok(())
}

/// Pasted nodes go right after `after`; with the root (or no parent)
/// selected they become the first child of the root
fn paste_position(state: &EditorState, after: Option<&NodeId>) -> (NodeId, Option<usize>) {
    if let Some(after) = after {
        if let Some(parent) = state.tree.find_parent(after) {
            let index = parent.child_index(after).map(|i| i + 1);
            return (parent.id.clone(), index);
        }
    }
    (NodeId::root(), Some(0))
}

fn node_mut<'a>(state: &'a mut EditorState, id: &NodeId) -> Result<&'a mut Node, MutationError> {
    state
        .tree
        .find_mut(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))
}
