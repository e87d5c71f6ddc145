//! Addressing inside a value tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step into a container: a sequence position or a record field.
///
/// Keys order indices before fields, so partitions of a sequence iterate in
/// positional order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Field(String),
}

impl Key {
    /// The sequence position, if this key addresses one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Field(_) => None,
        }
    }

    /// The record field name, if this key addresses one.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Index(_) => None,
            Self::Field(name) => Some(name),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Field(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Field(name.to_owned())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// The keys leading from a root value to a nested node.
///
/// Displays in a JSONPath-like form: `$`, `$.colors.primary[2]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// The path of the root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys between the root and the addressed node.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    pub fn pop(&mut self) -> Option<Key> {
        self.0.pop()
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for key in &self.0 {
            match key {
                Key::Index(index) => write!(f, "[{index}]")?,
                Key::Field(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}
