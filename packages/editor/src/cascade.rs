//! # Style Cascade
//!
//! Effective style = classes folded left to right (later classes win),
//! then the node's inline style on top. Merging is a flat per-property
//! overwrite; cleared values never override.

use crate::classes::ClassRegistry;
use crate::node::Node;
use crate::style::StyleMap;

/// Resolve the style a node renders with.
///
/// Class references missing from the registry are skipped.
pub fn effective_style(node: &Node, classes: &ClassRegistry) -> StyleMap {
    let mut style = StyleMap::new();
    for name in node.props.class_refs.iter() {
        if let Some(class_style) = classes.get(name) {
            style.merge(class_style);
        }
    }
    style.merge(&node.props.style);
    style
}
