//! # Class Registry
//!
//! Named, reusable style bundles. User-authored names are stored with the
//! `user-` marker so they can never collide with built-in classes; display
//! code strips it with [`display_class_name`].

use crate::errors::EditorError;
use crate::node::Node;
use crate::style::StyleMap;
use crate::tree::{walk_node_mut, VisitorMut};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Namespace marker for user-authored classes
pub const USER_CLASS_PREFIX: &str = "user-";

fn class_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("valid pattern"))
}

/// Validate a raw class name and add the `user-` marker if missing
pub fn normalize_class_name(raw: &str) -> Result<String, EditorError> {
    let name = raw.trim();
    if !class_name_pattern().is_match(name) {
        return Err(EditorError::InvalidClassName(raw.to_string()));
    }
    if name.starts_with(USER_CLASS_PREFIX) {
        Ok(name.to_string())
    } else {
        Ok(format!("{}{}", USER_CLASS_PREFIX, name))
    }
}

/// Class name as shown to the user
pub fn display_class_name(name: &str) -> &str {
    name.strip_prefix(USER_CLASS_PREFIX).unwrap_or(name)
}

/// Class name → style, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRegistry {
    classes: Vec<(String, StyleMap)>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty class. Returns the stored (normalized) name.
    pub fn add(&mut self, raw_name: &str) -> Result<String, EditorError> {
        let name = self.check_new(raw_name)?;
        self.classes.push((name.clone(), StyleMap::new()));
        Ok(name)
    }

    /// Validation half of [`add`](Self::add)
    pub fn check_new(&self, raw_name: &str) -> Result<String, EditorError> {
        let name = normalize_class_name(raw_name)?;
        if self.contains(&name) {
            return Err(EditorError::ClassExists(name));
        }
        Ok(name)
    }

    /// Remove the registry entry only. See [`DetachClass`] for the tree sweep.
    pub fn remove(&mut self, name: &str) -> Option<StyleMap> {
        let pos = self.classes.iter().position(|(n, _)| n == name)?;
        Some(self.classes.remove(pos).1)
    }

    pub fn get(&self, name: &str) -> Option<&StyleMap> {
        self.classes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StyleMap> {
        self.classes
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Strips one class name from every node it visits
pub struct DetachClass<'a> {
    pub name: &'a str,
    pub detached: usize,
}

impl<'a> DetachClass<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name, detached: 0 }
    }
}

impl VisitorMut for DetachClass<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if node.props.class_refs.remove(self.name) {
            self.detached += 1;
        }
        walk_node_mut(self, node);
    }
}
