//! Partition result types.
//!
//! A [`Partition`] classifies the differences found at one container level
//! into three disjoint groups. Entries under `updated` are [`Diff`]s, which
//! keep a raw replacement apart from a nested partition so consumers can
//! tell *why* a key changed.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::AddAssign;

use serde::Serialize;
use tdiff_types::{Key, Value};

/// Which comparator produced a [`Partition`] level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Record,
    Sequence,
}

/// The added/deleted/updated classification of one container level.
///
/// # Invariants
///
/// - A key appears in at most one of `added`, `deleted`, `updated`.
/// - Unchanged keys appear nowhere; there are no empty placeholders.
/// - Every nested [`Diff::Partitioned`] under `updated` is non-empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partition {
    origin: Origin,
    /// Keys present only in the updated tree, with their whole new subtree.
    pub added: BTreeMap<Key, Value>,
    /// Keys present only in the original tree.
    pub deleted: BTreeSet<Key>,
    /// Keys present on both sides whose values differ.
    pub updated: BTreeMap<Key, Diff>,
}

impl Partition {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            added: BTreeMap::new(),
            deleted: BTreeSet::new(),
            updated: BTreeMap::new(),
        }
    }

    /// An empty partition of two records.
    pub fn record() -> Self {
        Self::new(Origin::Record)
    }

    /// An empty partition of two sequences.
    pub fn sequence() -> Self {
        Self::new(Origin::Sequence)
    }

    /// A partition whose only differences are additions.
    pub(crate) fn additions_only(origin: Origin, added: BTreeMap<Key, Value>) -> Self {
        Self {
            added,
            ..Self::new(origin)
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns `true` if no differences were found at this level.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    /// Number of keys with a difference at this level.
    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.updated.len()
    }

    pub fn with_added(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.added.insert(key.into(), value.into());
        self
    }

    pub fn with_deleted(mut self, key: impl Into<Key>) -> Self {
        self.deleted.insert(key.into());
        self
    }

    pub fn with_updated(mut self, key: impl Into<Key>, change: impl Into<Diff>) -> Self {
        self.updated.insert(key.into(), change.into());
        self
    }

    /// Leaf-level change counts across this level and every nested one.
    pub fn stats(&self) -> ChangeStats {
        let mut stats = ChangeStats {
            added: self.added.len(),
            deleted: self.deleted.len(),
            replaced: 0,
        };
        for change in self.updated.values() {
            stats += change.stats();
        }
        stats
    }
}

/// The result of comparing two values that are not identical.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diff {
    /// The updated value replaces the original wholesale: scalars that
    /// differ, containers of different kinds, or nested sequence elements.
    Replaced(Value),
    /// Both sides are comparable containers; differences are partitioned
    /// one level further down.
    Partitioned(Partition),
}

impl Diff {
    /// The result for two identical inputs. The empty partition takes its
    /// origin from the kind of `value`, so shared and separately built
    /// sequences report the same shape.
    pub fn unchanged_for(value: &Value) -> Self {
        match value {
            Value::Sequence(_) => Self::Partitioned(Partition::sequence()),
            _ => Self::Partitioned(Partition::record()),
        }
    }

    /// Returns `true` if this is a partition with no differences.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Partitioned(partition) if partition.is_empty())
    }

    pub fn as_partition(&self) -> Option<&Partition> {
        match self {
            Self::Partitioned(partition) => Some(partition),
            Self::Replaced(_) => None,
        }
    }

    pub fn replacement(&self) -> Option<&Value> {
        match self {
            Self::Replaced(value) => Some(value),
            Self::Partitioned(_) => None,
        }
    }

    pub fn stats(&self) -> ChangeStats {
        match self {
            Self::Replaced(_) => ChangeStats {
                replaced: 1,
                ..ChangeStats::default()
            },
            Self::Partitioned(partition) => partition.stats(),
        }
    }
}

impl From<Partition> for Diff {
    fn from(partition: Partition) -> Self {
        Self::Partitioned(partition)
    }
}

impl From<Value> for Diff {
    fn from(value: Value) -> Self {
        Self::Replaced(value)
    }
}

/// Deep counts of the leaves of a [`Diff`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeStats {
    /// Keys or indices that only exist in the updated tree.
    pub added: usize,
    /// Keys or indices that only exist in the original tree.
    pub deleted: usize,
    /// Values replaced wholesale.
    pub replaced: usize,
}

impl ChangeStats {
    pub fn total(&self) -> usize {
        self.added + self.deleted + self.replaced
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for ChangeStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.deleted += other.deleted;
        self.replaced += other.replaced;
    }
}
