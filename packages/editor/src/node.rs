//! # Layout Nodes
//!
//! The unit of the wireframe tree. The serde derives define the
//! import/export format:
//!
//! ```json
//! {
//!   "id": "root",
//!   "kind": "container",
//!   "props": { "style": "min-height:80vh", "classRefs": "user-card user-wide" },
//!   "children": [ { "id": "e1-1", "kind": "text", "props": { "text": "Text" } } ]
//! }
//! ```

use crate::style::StyleMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of the root sentinel
pub const ROOT_ID: &str = "root";

/// Placeholder source for freshly created images
pub const DEFAULT_IMAGE_SRC: &str = "https://via.placeholder.com/80x40";

/// Opaque node identifier, unique across the tree and never reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Element kinds offered by the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Text,
    Button,
    #[serde(rename = "img", alias = "image")]
    Image,
    Link,
}

impl NodeKind {
    /// Only containers (and the root, which is one) hold children
    pub fn can_have_children(self) -> bool {
        matches!(self, NodeKind::Container)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Container => "Container",
            NodeKind::Text => "Text",
            NodeKind::Button => "Button",
            NodeKind::Image => "Image",
            NodeKind::Link => "Link",
        }
    }
}

/// Kind-specific attribute editable through the property form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKey {
    Text,
    Src,
    Href,
}

/// Ordered set of class names applied to a node.
///
/// Serialized as a single space-separated string. Later names win in the
/// style cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRefs(Vec<String>);

impl ClassRefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    /// Append a class; returns false if it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != name);
        self.0.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for ClassRefs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut refs = ClassRefs::new();
        for name in iter {
            refs.insert(name);
        }
        refs
    }
}

impl fmt::Display for ClassRefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl Serialize for ClassRefs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClassRefs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(ClassRefs::parse(&text))
    }
}

/// Node attributes: kind-specific fields plus inline style and classes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,

    #[serde(default, alias = "class", skip_serializing_if = "ClassRefs::is_empty")]
    pub class_refs: ClassRefs,
}

impl Props {
    pub fn get(&self, key: PropKey) -> Option<&str> {
        match key {
            PropKey::Text => self.text.as_deref(),
            PropKey::Src => self.src.as_deref(),
            PropKey::Href => self.href.as_deref(),
        }
    }

    pub fn set(&mut self, key: PropKey, value: impl Into<String>) {
        let slot = match key {
            PropKey::Text => &mut self.text,
            PropKey::Src => &mut self.src,
            PropKey::Href => &mut self.href,
        };
        *slot = Some(value.into());
    }
}

/// A node in the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(alias = "type")]
    pub kind: NodeKind,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Bare node without defaults
    pub fn bare(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            props: Props::default(),
            children: Vec::new(),
        }
    }

    /// Node with the palette defaults for its kind
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        let mut node = Self::bare(id, kind);
        let props = &mut node.props;
        match kind {
            NodeKind::Container => {
                props.style = StyleMap::parse("min-height:50px;min-width:100px;display:block");
            }
            NodeKind::Text => props.text = Some("Text".to_string()),
            NodeKind::Button => props.text = Some("Button".to_string()),
            NodeKind::Image => props.src = Some(DEFAULT_IMAGE_SRC.to_string()),
            NodeKind::Link => {
                props.text = Some("Link".to_string());
                props.href = Some("#".to_string());
            }
        }
        node
    }

    /// The root of a fresh session
    pub fn root() -> Self {
        let mut root = Self::bare(NodeId::root(), NodeKind::Container);
        root.props.style = StyleMap::parse("min-height:80vh");
        root
    }

    /// What the root is reset to when it gets deleted
    pub fn empty_root() -> Self {
        Self::bare(NodeId::root(), NodeKind::Container)
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    pub fn can_have_children(&self) -> bool {
        self.kind.can_have_children()
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_style(mut self, css: &str) -> Self {
        self.props.style = StyleMap::parse(css);
        self
    }

    pub fn with_classes(mut self, classes: &str) -> Self {
        self.props.class_refs = ClassRefs::parse(classes);
        self
    }

    /// Index of the direct child with `id`
    pub fn child_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|c| &c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_defaults() {
        let container = Node::new("c", NodeKind::Container);
        assert_eq!(
            container.props.style.to_css(),
            "min-height:50px;min-width:100px;display:block"
        );

        let link = Node::new("l", NodeKind::Link);
        assert_eq!(link.props.text.as_deref(), Some("Link"));
        assert_eq!(link.props.href.as_deref(), Some("#"));

        let img = Node::new("i", NodeKind::Image);
        assert_eq!(img.props.src.as_deref(), Some(DEFAULT_IMAGE_SRC));
    }

    #[test]
    fn test_class_refs_are_an_ordered_set() {
        let mut refs = ClassRefs::parse("  user-a user-b   user-a ");
        assert_eq!(refs.to_string(), "user-a user-b");

        assert!(!refs.insert("user-b"));
        assert!(refs.insert("user-c"));
        assert!(refs.remove("user-a"));
        assert_eq!(refs.to_string(), "user-b user-c");
    }

    #[test]
    fn test_wire_format() {
        let node = Node::new("e-1", NodeKind::Image).with_classes("user-x");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["kind"], "img");
        assert_eq!(json["props"]["classRefs"], "user-x");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_import_accepts_legacy_field_names() {
        let json = r#"{
            "id": "root",
            "type": "container",
            "props": { "style": "display:flex", "class": "user-a user-b" },
            "children": [ { "id": "e1", "type": "image", "props": {} } ]
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.props.class_refs.len(), 2);
        assert_eq!(node.children[0].kind, NodeKind::Image);
    }
}
