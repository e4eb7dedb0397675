//! # Layout Tree
//!
//! Single-rooted tree of [`Node`]s. The root carries the fixed
//! [`ROOT_ID`](crate::node::ROOT_ID) and is never detached; only its
//! subtree is replaced.
//!
//! Every read-only query composes over [`Tree::walk`], a lazy pre-order
//! iterator that yields each node together with its parent. Mutable
//! sweeps go through [`VisitorMut`].
//!
//! Structural operations work in place and are not undoable on their own;
//! callers take a history snapshot first.

use crate::errors::MutationError;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node reached during a walk
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a Node,
    pub parent: Option<&'a Node>,
    pub depth: usize,
}

/// Pre-order, single-pass walk over a subtree
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Walk<'a> {
    fn new(start: &'a Node) -> Self {
        Self {
            stack: vec![Visit {
                node: start,
                parent: None,
                depth: 0,
            }],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        // Reverse so the first child is popped next
        for child in visit.node.children.iter().rev() {
            self.stack.push(Visit {
                node: child,
                parent: Some(visit.node),
                depth: visit.depth + 1,
            });
        }
        Some(visit)
    }
}

/// Mutable visitor for sweeping the tree.
///
/// Override `visit_node_mut` and call [`walk_node_mut`] to keep
/// descending.
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    for child in &mut node.children {
        visitor.visit_node_mut(child);
    }
}

/// Detaches the first descendant with a matching id
struct Detach<'a> {
    id: &'a NodeId,
    found: Option<Node>,
}

impl VisitorMut for Detach<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if self.found.is_some() {
            return;
        }
        if let Some(pos) = node.child_index(self.id) {
            self.found = Some(node.children.remove(pos));
            return;
        }
        walk_node_mut(self, node);
    }
}

/// The layout tree owned by an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Wrap an existing root. Callers are expected to have validated it.
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Replace the whole tree, returning the previous root
    pub fn replace_root(&mut self, root: Node) -> Node {
        std::mem::replace(&mut self.root, root)
    }

    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root)
    }

    /// Visit every node exactly once, pre-order
    pub fn traverse(&self, mut visitor: impl FnMut(&Node)) {
        for visit in self.walk() {
            visitor(visit.node);
        }
    }

    pub fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) {
        visitor.visit_node_mut(&mut self.root);
    }

    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.walk().map(|v| v.node).find(|n| &n.id == id)
    }

    /// Mutable lookup: the path is resolved with [`Tree::walk`], then
    /// followed by child index
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        if !self.contains(id) {
            return None;
        }
        let mut path = self.ancestors(id);
        path.reverse();
        path.push(id.clone());

        let mut node = &mut self.root;
        for next in path.iter().skip(1) {
            let pos = node.child_index(next)?;
            node = &mut node.children[pos];
        }
        Some(node)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Parent of `id`; `None` for the root and for unknown ids
    pub fn find_parent(&self, id: &NodeId) -> Option<&Node> {
        self.walk().find(|v| &v.node.id == id)?.parent
    }

    /// Ancestor chain of `id` from its parent up to the root
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = id.clone();
        while let Some(parent) = self.find_parent(&current) {
            chain.push(parent.id.clone());
            current = parent.id.clone();
        }
        chain
    }

    /// True if `ancestor` is `id` itself or lies on its ancestor chain
    pub fn is_ancestor_or_self(&self, ancestor: &NodeId, id: &NodeId) -> bool {
        match self.find(ancestor) {
            Some(node) => Walk::new(node).any(|v| &v.node.id == id),
            None => false,
        }
    }

    /// Insert `node` under `parent_id` at `index` (clamped), or last.
    ///
    /// Rejects non-container parents and any subtree carrying an id that
    /// already exists in the tree.
    pub fn insert_child(
        &mut self,
        parent_id: &NodeId,
        node: Node,
        index: Option<usize>,
    ) -> Result<(), MutationError> {
        if let Some(dup) = self.first_duplicate(&node) {
            return Err(MutationError::DuplicateId(dup));
        }

        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

        if !parent.can_have_children() {
            return Err(MutationError::NotAContainer(parent_id.clone()));
        }

        let at = index
            .unwrap_or(parent.children.len())
            .min(parent.children.len());
        parent.children.insert(at, node);
        Ok(())
    }

    /// Detach a subtree. The root is never removed.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        if id.is_root() {
            return None;
        }
        let mut detach = Detach { id, found: None };
        detach.visit_node_mut(&mut self.root);
        detach.found
    }

    /// Reparent `id` as the last child of `new_parent_id`.
    pub fn move_node(&mut self, id: &NodeId, new_parent_id: &NodeId) -> Result<(), MutationError> {
        self.check_move(id, new_parent_id)?;
        let node = self
            .remove(id)
            .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?;
        self.insert_child(new_parent_id, node, None)
    }

    /// Guard shared by every reparenting path
    pub fn check_move(&self, id: &NodeId, new_parent_id: &NodeId) -> Result<(), MutationError> {
        if id == new_parent_id {
            return Err(MutationError::SelfDrop);
        }
        if id.is_root() {
            return Err(MutationError::RootImmutable);
        }
        if !self.contains(id) {
            return Err(MutationError::NodeNotFound(id.clone()));
        }
        let parent = self
            .find(new_parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(new_parent_id.clone()))?;
        if !parent.can_have_children() {
            return Err(MutationError::NotAContainer(new_parent_id.clone()));
        }
        if self.is_ancestor_or_self(id, new_parent_id) {
            return Err(MutationError::CycleDetected);
        }
        Ok(())
    }

    /// `Root > Container > Text` style path for `id`
    pub fn breadcrumb(&self, id: &NodeId) -> Option<String> {
        let node = self.find(id)?;
        let mut labels: Vec<&str> = self
            .ancestors(id)
            .iter()
            .rev()
            .filter_map(|a| self.find(a))
            .map(label_of)
            .collect();
        labels.push(label_of(node));
        Some(labels.join(" > "))
    }

    fn first_duplicate(&self, subtree: &Node) -> Option<NodeId> {
        let existing: HashSet<&NodeId> = self.walk().map(|v| &v.node.id).collect();
        Walk::new(subtree)
            .map(|v| &v.node.id)
            .find(|id| existing.contains(id))
            .cloned()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

fn label_of(node: &Node) -> &'static str {
    if node.is_root() {
        "Root"
    } else {
        node.kind.label()
    }
}

/// Structural problems of a standalone subtree (used on import).
///
/// Returns the first problem found: a duplicated id or a non-container
/// holding children.
pub fn check_structure(root: &Node) -> Result<(), MutationError> {
    let mut seen = HashSet::new();
    for visit in Walk::new(root) {
        let node = visit.node;
        if !seen.insert(&node.id) {
            return Err(MutationError::DuplicateId(node.id.clone()));
        }
        if !node.children.is_empty() && !node.can_have_children() {
            return Err(MutationError::NotAContainer(node.id.clone()));
        }
    }
    Ok(())
}

/// Walk an arbitrary subtree (e.g. a clipboard entry)
pub fn walk(node: &Node) -> Walk<'_> {
    Walk::new(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn sample() -> Tree {
        // root
        // ├── a (container)
        // │   ├── a1 (text)
        // │   └── a2 (container)
        // │       └── a2x (button)
        // └── b (text)
        Tree::from_root(
            Node::root()
                .with_child(
                    Node::new("a", NodeKind::Container)
                        .with_child(Node::new("a1", NodeKind::Text))
                        .with_child(
                            Node::new("a2", NodeKind::Container)
                                .with_child(Node::new("a2x", NodeKind::Button)),
                        ),
                )
                .with_child(Node::new("b", NodeKind::Text)),
        )
    }

    fn order(tree: &Tree) -> Vec<String> {
        tree.walk().map(|v| v.node.id.to_string()).collect()
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = sample();
        assert_eq!(order(&tree), vec!["root", "a", "a1", "a2", "a2x", "b"]);
    }

    #[test]
    fn test_find_parent() {
        let tree = sample();
        assert_eq!(tree.find_parent(&"a2x".into()).unwrap().id, "a2");
        assert!(tree.find_parent(&"root".into()).is_none());
        assert!(tree.find_parent(&"missing".into()).is_none());
    }

    #[test]
    fn test_ancestors_and_breadcrumb() {
        let tree = sample();
        assert_eq!(
            tree.ancestors(&"a2x".into()),
            vec![NodeId::from("a2"), NodeId::from("a"), NodeId::root()]
        );
        assert_eq!(
            tree.breadcrumb(&"a2x".into()).unwrap(),
            "Root > Container > Container > Button"
        );
    }

    #[test]
    fn test_insert_child_clamps_index() {
        let mut tree = sample();
        tree.insert_child(&"a".into(), Node::new("n", NodeKind::Text), Some(99))
            .unwrap();
        tree.insert_child(&"a".into(), Node::new("m", NodeKind::Text), Some(0))
            .unwrap();

        let a = tree.find(&"a".into()).unwrap();
        let ids: Vec<_> = a.children.iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["m", "a1", "a2", "n"]);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_leaf_parents() {
        let mut tree = sample();
        assert_eq!(
            tree.insert_child(&"a".into(), Node::new("b", NodeKind::Text), None),
            Err(MutationError::DuplicateId("b".into()))
        );
        assert_eq!(
            tree.insert_child(&"b".into(), Node::new("z", NodeKind::Text), None),
            Err(MutationError::NotAContainer("b".into()))
        );
    }

    #[test]
    fn test_remove_returns_subtree() {
        let mut tree = sample();
        let removed = tree.remove(&"a2".into()).unwrap();
        assert_eq!(removed.children[0].id, "a2x");
        assert!(!tree.contains(&"a2x".into()));
        assert!(tree.remove(&"a2".into()).is_none());
        assert!(tree.remove(&NodeId::root()).is_none());
    }

    #[test]
    fn test_find_mut_reaches_deep_nodes() {
        let mut tree = sample();
        tree.find_mut(&"a2x".into())
            .unwrap()
            .props
            .style
            .set("color", "red");
        assert_eq!(
            tree.find(&"a2x".into()).unwrap().props.style.get("color"),
            Some("red")
        );
        assert!(tree.find_mut(&NodeId::root()).unwrap().is_root());
        assert!(tree.find_mut(&"missing".into()).is_none());
    }

    #[test]
    fn test_move_guards_against_cycles() {
        let mut tree = sample();
        assert_eq!(
            tree.move_node(&"a".into(), &"a2".into()),
            Err(MutationError::CycleDetected)
        );
        assert_eq!(
            tree.move_node(&"a".into(), &"a".into()),
            Err(MutationError::SelfDrop)
        );
        assert_eq!(order(&tree), vec!["root", "a", "a1", "a2", "a2x", "b"]);

        tree.move_node(&"b".into(), &"a2".into()).unwrap();
        assert_eq!(order(&tree), vec!["root", "a", "a1", "a2", "a2x", "b"]);
        assert_eq!(tree.find_parent(&"b".into()).unwrap().id, "a2");
    }

    #[test]
    fn test_check_structure() {
        let bad = Node::root().with_child(
            Node::new("t", NodeKind::Text).with_child(Node::new("x", NodeKind::Text)),
        );
        assert_eq!(
            check_structure(&bad),
            Err(MutationError::NotAContainer("t".into()))
        );

        let dup = Node::root()
            .with_child(Node::new("x", NodeKind::Text))
            .with_child(Node::new("x", NodeKind::Text));
        assert_eq!(check_structure(&dup), Err(MutationError::DuplicateId("x".into())));
    }
}
