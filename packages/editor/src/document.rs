//! # Document Import / Export
//!
//! The exchange format is the serde form of [`Node`]: a plain nested JSON
//! document.
//!
//! ```text
//! {
//!   "id": "root",
//!   "kind": "container",
//!   "props": { "style": "min-height:80vh", "classRefs": "user-card" },
//!   "children": [ ... ]
//! }
//! ```
//!
//! Parsing never touches session state; the session only swaps the tree
//! in after the whole document validated.

use crate::errors::EditorError;
use crate::node::{Node, NodeKind};
use crate::tree::{check_structure, Tree};

/// Parse and validate an exported document
pub fn parse_document(json: &str) -> Result<Node, EditorError> {
    let root: Node = serde_json::from_str(json)?;
    validate_root(&root)?;
    Ok(root)
}

/// Check that `root` can become the root of a tree
pub fn validate_root(root: &Node) -> Result<(), EditorError> {
    if !root.is_root() {
        return Err(EditorError::InvalidInput(format!(
            "root node must have id \"root\", found {:?}",
            root.id.as_str()
        )));
    }
    if root.kind != NodeKind::Container {
        return Err(EditorError::InvalidInput(format!(
            "root node must be a container, found {}",
            root.kind.label()
        )));
    }
    check_structure(root).map_err(|e| EditorError::InvalidInput(e.to_string()))
}

/// Serialize the tree as pretty-printed JSON
pub fn export_document(tree: &Tree) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(tree.root())?)
}
