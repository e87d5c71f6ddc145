//! Structural diff engine for untyped value trees.
//!
//! Compares two trees of records, sequences, and scalars and partitions
//! their differences into additions, deletions, and updates. The result
//! feeds external changeset tooling; no policy about what a change *means*
//! is decided here.
//!
//! # Key Types
//!
//! - [`Differ`] / [`DiffConfig`] -- Entry points and their configuration
//! - [`Diff`] / [`Partition`] -- Typed result: replacement or nested partition per key
//! - [`MergedPartition`] / [`Delta`] -- The same result folded into three trees
//! - [`DiffError`] -- Depth limit, configuration, and input conversion failures
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tdiff_engine::{detailed_partition, Key, Value};
//!
//! let original = Value::from(json!({"a": 1, "b": 2}));
//! let updated = Value::from(json!({"a": 1}));
//!
//! let diff = detailed_partition(&original, &updated).unwrap();
//! let partition = diff.as_partition().unwrap();
//! assert!(partition.deleted.contains(&Key::from("b")));
//! ```

mod comparator;
pub mod config;
pub mod differ;
pub mod error;
pub mod merged;
pub mod partition;
mod record;
mod sequence;

use std::collections::BTreeMap;

pub use config::{DiffConfig, DEFAULT_MAX_DEPTH};
pub use differ::Differ;
pub use error::{DiffError, DiffResult};
pub use merged::{Delta, MergedPartition};
pub use partition::{ChangeStats, Diff, Origin, Partition};
pub use tdiff_types::{Key, Path, TypeError, Value, ValueKind};

/// [`Differ::detailed_partition`] with the default configuration.
pub fn detailed_partition(original: &Value, updated: &Value) -> DiffResult<Diff> {
    Differ::default().detailed_partition(original, updated)
}

/// [`Differ::partition_added`] with the default configuration.
pub fn partition_added(original: &Value, updated: &Value) -> DiffResult<Delta> {
    Differ::default().partition_added(original, updated)
}

/// [`Differ::partition_deleted`] with the default configuration.
pub fn partition_deleted(original: &Value, updated: &Value) -> DiffResult<Delta> {
    Differ::default().partition_deleted(original, updated)
}

/// [`Differ::partition_updated`] with the default configuration.
pub fn partition_updated(original: &Value, updated: &Value) -> DiffResult<Delta> {
    Differ::default().partition_updated(original, updated)
}

/// [`Differ::flatten`] with the default configuration.
///
/// Scalar roots always flatten to an empty map, changed or not.
pub fn flatten(original: &Value, updated: &Value) -> DiffResult<BTreeMap<Key, Delta>> {
    Differ::default().flatten(original, updated)
}
