use crate::cascade::effective_style;
use crate::classes::ClassRegistry;
use crate::locks::LockSet;
use crate::node::{Node, NodeId};
use crate::style::StyleMap;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

/// Everything one undo step restores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub tree: Tree,
    pub selection: Option<NodeId>,
    pub locks: LockSet,
    pub classes: ClassRegistry,
    pub selected_class: Option<String>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected node, if the selection still resolves
    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_ref().and_then(|id| self.tree.find(id))
    }

    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.locks.is_locked(&self.tree, id)
    }

    pub fn topmost_locked_ancestor(&self, id: &NodeId) -> Option<NodeId> {
        self.locks.topmost_locked_ancestor(&self.tree, id)
    }

    /// Effective style of `id`, or `None` for unknown ids
    pub fn effective_style(&self, id: &NodeId) -> Option<StyleMap> {
        self.tree
            .find(id)
            .map(|node| effective_style(node, &self.classes))
    }
}
