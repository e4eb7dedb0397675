//! # Style Maps
//!
//! Inline styles and class styles are stored as ordered property maps.
//! The `key:value;key:value` text form only exists at the wire boundary
//! (export/import and class editing).
//!
//! A property can be in one of three states:
//!
//! - **unset**: the key is absent
//! - **cleared**: the key is present with an empty value (e.g. "Bold"
//!   was unchecked); cleared properties never serialize and never
//!   override a value coming from a class
//! - **set**: the key carries a non-empty value
//!
//! Order is insertion order. Re-setting an existing key keeps its slot.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered CSS-like property map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `key:value;key:value` wire form.
    ///
    /// Rules without a `:` or with an empty key are ignored. Values may
    /// contain further colons (`url(http://...)`).
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for rule in text.split(';') {
            let Some((key, value)) = rule.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            style.set(key, value.trim());
        }
        style
    }

    /// Set a property. An empty value clears it.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Mark a property as explicitly cleared.
    pub fn clear(&mut self, property: &str) {
        self.set(property, "");
    }

    /// Drop a property entirely (back to "unset").
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == property)?;
        Some(self.entries.remove(pos).1)
    }

    /// Value of a set property. Cleared and unset both yield `None`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, v)| k == property && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn is_cleared(&self, property: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| k == property && v.is_empty())
    }

    /// Set properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when no property is set (cleared entries don't count)
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Overlay `other` on top of `self`: set values overwrite, cleared
    /// and unset values leave `self` untouched.
    pub fn merge(&mut self, other: &StyleMap) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    /// Serialize to the wire form, omitting cleared properties.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = StyleMap::new();
        for (k, v) in iter {
            style.set(k, v);
        }
        style
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(StyleMap::parse(&text))
    }
}
