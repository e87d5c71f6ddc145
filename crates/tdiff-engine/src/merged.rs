//! Merged view of a partition.
//!
//! Downstream changeset tooling walks three trees (everything added,
//! everything deleted, everything updated) rather than one tree of nested
//! partitions. [`MergedPartition`] is that shape. It is derived from a
//! [`Diff`] by folding every nested *record* partition into its parent key
//! by key:
//!
//! - `parent.added[key] = child.added` when non-empty, and likewise for
//!   `deleted` and `updated`. A key can therefore appear in more than one of
//!   the three trees, e.g. a nested record that both gained and lost fields.
//! - A replacement is hoisted as-is: `parent.updated[key] = value`.
//! - A nested partition found under a *sequence* index stays intact as
//!   [`Delta::Partition`].

use std::collections::BTreeMap;

use serde::Serialize;
use tdiff_types::{Key, Value};

use crate::partition::{Diff, Origin, Partition};

/// A node of a merged partition tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delta {
    /// An added value or a raw replacement.
    Value(Value),
    /// The removed-marker: this key or index no longer exists. Distinct from
    /// a value that happens to be null.
    Removed,
    /// Changes keyed one level further down.
    Branch(BTreeMap<Key, Delta>),
    /// A partition nested under a sequence index.
    Partition(Box<MergedPartition>),
}

impl Delta {
    /// A branch with no entries.
    pub fn empty() -> Self {
        Self::Branch(BTreeMap::new())
    }

    /// Returns `true` for a branch with no entries.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Branch(entries) if entries.is_empty())
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&BTreeMap<Key, Delta>> {
        match self {
            Self::Branch(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a child of a branch.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Delta> {
        self.entries()?.get(&key.into())
    }
}

impl From<Value> for Delta {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Three trees: everything added, everything deleted, everything updated.
///
/// Each tree is normally a [`Delta::Branch`]. When the root values could not
/// be partitioned (a scalar root, or roots of different kinds) `updated` is
/// the replacement [`Delta::Value`] and the other two are empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergedPartition {
    pub added: Delta,
    pub deleted: Delta,
    pub updated: Delta,
}

impl MergedPartition {
    pub fn empty() -> Self {
        Self {
            added: Delta::empty(),
            deleted: Delta::empty(),
            updated: Delta::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    /// Merge `added`, then `updated`, then `deleted` into one mapping.
    ///
    /// Later trees overwrite earlier ones on key collision. Deleted keys are
    /// kept with [`Delta::Removed`] rather than dropped. A root replacement
    /// contributes the entries of the replacing container; a scalar root
    /// replacement has no entries.
    pub fn flatten(self) -> BTreeMap<Key, Delta> {
        let mut flat = BTreeMap::new();
        for tree in [self.added, self.updated, self.deleted] {
            match tree {
                Delta::Branch(entries) => flat.extend(entries),
                Delta::Value(value) => flat.extend(spread(&value)),
                Delta::Removed | Delta::Partition(_) => {}
            }
        }
        flat
    }
}

impl Default for MergedPartition {
    fn default() -> Self {
        Self::empty()
    }
}

fn spread(value: &Value) -> Vec<(Key, Delta)> {
    match value {
        Value::Record(entries) => entries
            .iter()
            .map(|(name, v)| (Key::Field(name.clone()), Delta::Value(v.clone())))
            .collect(),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, v)| (Key::Index(index), Delta::Value(v.clone())))
            .collect(),
        _ => Vec::new(),
    }
}

impl From<Diff> for MergedPartition {
    fn from(diff: Diff) -> Self {
        match diff {
            Diff::Replaced(value) => Self {
                updated: Delta::Value(value),
                ..Self::empty()
            },
            Diff::Partitioned(partition) => partition.into(),
        }
    }
}

impl From<Partition> for MergedPartition {
    fn from(partition: Partition) -> Self {
        let origin = partition.origin();
        let mut added: BTreeMap<Key, Delta> = partition
            .added
            .into_iter()
            .map(|(key, value)| (key, Delta::Value(value)))
            .collect();
        let mut deleted: BTreeMap<Key, Delta> = partition
            .deleted
            .into_iter()
            .map(|key| (key, Delta::Removed))
            .collect();
        let mut updated = BTreeMap::new();

        for (key, change) in partition.updated {
            match (origin, change) {
                (_, Diff::Replaced(value)) => {
                    updated.insert(key, Delta::Value(value));
                }
                (Origin::Sequence, Diff::Partitioned(nested)) => {
                    updated.insert(key, Delta::Partition(Box::new(nested.into())));
                }
                (Origin::Record, Diff::Partitioned(nested)) => {
                    let child = MergedPartition::from(nested);
                    for (tree, sub) in [
                        (&mut added, child.added),
                        (&mut deleted, child.deleted),
                        (&mut updated, child.updated),
                    ] {
                        if !sub.is_empty() {
                            tree.insert(key.clone(), sub);
                        }
                    }
                }
            }
        }

        Self {
            added: Delta::Branch(added),
            deleted: Delta::Branch(deleted),
            updated: Delta::Branch(updated),
        }
    }
}
