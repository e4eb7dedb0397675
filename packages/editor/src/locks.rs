//! # Lock Overlay
//!
//! Side-table of locked node ids, independent of tree shape. A node is
//! *effectively* locked when it or any ancestor is in the set; locks are
//! inherited downward only.

use crate::node::NodeId;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockSet {
    ids: BTreeSet<NodeId>,
}

impl LockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the set changed
    pub fn lock(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    /// Returns true if the set changed
    pub fn unlock(&mut self, id: &NodeId) -> bool {
        self.ids.remove(id)
    }

    /// Drop a deleted or reparented node. Other entries are left alone.
    pub fn forget(&mut self, id: &NodeId) {
        self.ids.remove(id);
    }

    /// Directly locked (not inherited)
    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// `id` or one of its ancestors is locked
    pub fn is_locked(&self, tree: &Tree, id: &NodeId) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.contains(id) || tree.ancestors(id).iter().any(|a| self.ids.contains(a))
    }

    /// Outermost locked node on the chain from `id` to the root.
    ///
    /// Interaction with anything inside a locked subtree is redirected here.
    pub fn topmost_locked_ancestor(&self, tree: &Tree, id: &NodeId) -> Option<NodeId> {
        if self.ids.is_empty() {
            return None;
        }
        let mut topmost = self.ids.contains(id).then(|| id.clone());
        for ancestor in tree.ancestors(id) {
            if self.ids.contains(&ancestor) {
                topmost = Some(ancestor);
            }
        }
        topmost
    }
}
