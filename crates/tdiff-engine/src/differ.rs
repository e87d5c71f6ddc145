//! Partition API: the public entry points over two value trees.

use std::collections::BTreeMap;

use tdiff_types::{Key, TypeError, Value};
use tracing::debug;

use crate::comparator::Comparator;
use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::merged::{Delta, MergedPartition};
use crate::partition::Diff;

/// Compares value trees under a [`DiffConfig`].
///
/// A `Differ` holds no state between calls; one instance can serve any
/// number of comparisons, from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Full three-way partition of `original` against `updated`.
    ///
    /// Identical inputs yield an empty partition. Roots that cannot be
    /// partitioned (scalars, or values of different kinds) yield
    /// [`Diff::Replaced`] with the whole `updated` value. Neither input is
    /// modified.
    pub fn detailed_partition(&self, original: &Value, updated: &Value) -> DiffResult<Diff> {
        if original.is_identical(updated) {
            return Ok(Diff::unchanged_for(original));
        }
        let diff = Comparator::new(&self.config).compare(original, updated)?;
        let stats = diff.stats();
        debug!(
            added = stats.added,
            deleted = stats.deleted,
            replaced = stats.replaced,
            "partition computed"
        );
        Ok(diff)
    }

    /// [`detailed_partition`](Self::detailed_partition) folded into three
    /// trees. See [`MergedPartition`].
    pub fn merged_partition(
        &self,
        original: &Value,
        updated: &Value,
    ) -> DiffResult<MergedPartition> {
        self.detailed_partition(original, updated)
            .map(MergedPartition::from)
    }

    /// Everything present only in `updated`.
    pub fn partition_added(&self, original: &Value, updated: &Value) -> DiffResult<Delta> {
        Ok(self.merged_partition(original, updated)?.added)
    }

    /// Everything present only in `original`, marked [`Delta::Removed`].
    pub fn partition_deleted(&self, original: &Value, updated: &Value) -> DiffResult<Delta> {
        Ok(self.merged_partition(original, updated)?.deleted)
    }

    /// Everything present on both sides with a different value.
    pub fn partition_updated(&self, original: &Value, updated: &Value) -> DiffResult<Delta> {
        Ok(self.merged_partition(original, updated)?.updated)
    }

    /// One mapping of every change; see [`MergedPartition::flatten`].
    ///
    /// A changed scalar root has no keys to flatten, so this returns an
    /// empty map exactly as it does for unchanged inputs. Use
    /// [`detailed_partition`](Self::detailed_partition) when the roots may
    /// be scalars; it reports [`Diff::Replaced`] for them.
    pub fn flatten(&self, original: &Value, updated: &Value) -> DiffResult<BTreeMap<Key, Delta>> {
        Ok(self.merged_partition(original, updated)?.flatten())
    }

    /// Convert two parsed documents into value trees and partition them.
    ///
    /// Accepts anything convertible into a [`Value`], such as
    /// `serde_json::Value` or `toml::Value`. Content with no counterpart in
    /// the value model fails with [`DiffError::Value`].
    pub fn partition_documents<T>(&self, original: T, updated: T) -> DiffResult<Diff>
    where
        T: TryInto<Value>,
        T::Error: Into<TypeError>,
    {
        let original = original
            .try_into()
            .map_err(|e| DiffError::Value(e.into()))?;
        let updated = updated
            .try_into()
            .map_err(|e| DiffError::Value(e.into()))?;
        self.detailed_partition(&original, &updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{Origin, Partition};
    use proptest::prelude::*;
    use serde_json::json;

    fn val(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn partition(original: serde_json::Value, updated: serde_json::Value) -> Diff {
        Differ::default()
            .detailed_partition(&val(original), &val(updated))
            .unwrap()
    }

    #[test]
    fn identical_inputs_are_unchanged() {
        let tree = val(json!({"color": {"primary": "#fff", "steps": [1, 2]}}));
        let diff = Differ::default().detailed_partition(&tree, &tree.clone()).unwrap();
        assert!(diff.is_unchanged());
    }

    #[test]
    fn structurally_equal_inputs_are_unchanged() {
        assert!(partition(json!({"a": [{"b": 1}]}), json!({"a": [{"b": 1}]})).is_unchanged());
    }

    #[test]
    fn sequence_index_alignment() {
        let diff = partition(json!(["a", "b"]), json!(["a", "b", "c"]));
        assert_eq!(
            diff,
            Diff::Partitioned(Partition::sequence().with_added(Key::Index(2), "c"))
        );
    }

    #[test]
    fn sequence_collapse() {
        let diff = partition(json!(["a"]), json!(["a", "b"]));
        assert_eq!(
            diff,
            Diff::Partitioned(Partition::sequence().with_added(Key::Index(1), "b"))
        );
    }

    #[test]
    fn record_hoisting() {
        let diff = partition(json!({"a": {"x": 1}}), json!({"a": {"x": 2}}));
        let expected = Partition::record()
            .with_updated("a", Partition::record().with_updated("x", Value::from(2)));
        assert_eq!(diff, Diff::Partitioned(expected));
    }

    #[test]
    fn deletion_scenario() {
        let diff = partition(json!({"a": 1, "b": 2}), json!({"a": 1}));
        assert_eq!(diff, Diff::Partitioned(Partition::record().with_deleted("b")));
    }

    #[test]
    fn scalar_root_degenerates_to_replacement() {
        assert_eq!(partition(json!(1), json!(2)), Diff::Replaced(Value::from(2)));
        assert!(partition(json!("same"), json!("same")).is_unchanged());
    }

    #[test]
    fn identical_sequence_root_keeps_sequence_origin() {
        let shared = val(json!([1, 2]));
        let identical = Differ::default().detailed_partition(&shared, &shared.clone()).unwrap();
        let rebuilt = partition(json!([1, 2]), json!([1, 2]));

        assert_eq!(identical.as_partition().map(Partition::origin), Some(Origin::Sequence));
        assert_eq!(identical, rebuilt);
        assert_eq!(
            serde_json::to_value(&identical).unwrap(),
            serde_json::to_value(&rebuilt).unwrap()
        );
    }

    #[test]
    fn flatten_cannot_see_scalar_root_changes() {
        let differ = Differ::default();
        let (one, two) = (Value::from(1), Value::from(2));

        assert!(differ.flatten(&one, &two).unwrap().is_empty());
        assert_eq!(
            differ.detailed_partition(&one, &two).unwrap(),
            Diff::Replaced(two.clone())
        );
    }

    #[test]
    fn config_is_carried() {
        let differ = Differ::new(DiffConfig { max_depth: 9 });
        assert_eq!(differ.config().max_depth, 9);
        assert_eq!(Differ::default().config(), &DiffConfig::default());
    }

    #[test]
    fn differing_root_kinds_are_replaced() {
        let diff = partition(json!({"a": 1}), json!(["a"]));
        assert_eq!(diff, Diff::Replaced(val(json!(["a"]))));
    }

    #[test]
    fn projections_follow_merged_view() {
        let differ = Differ::default();
        let original = val(json!({"a": {"x": 1}, "keep": true, "old": 0}));
        let updated = val(json!({"a": {"y": 2}, "keep": true, "new": 1}));

        let added = differ.partition_added(&original, &updated).unwrap();
        assert_eq!(added.get("new"), Some(&Delta::Value(Value::from(1))));
        assert_eq!(
            added.get("a").and_then(|a| a.get("y")),
            Some(&Delta::Value(Value::from(2)))
        );

        let deleted = differ.partition_deleted(&original, &updated).unwrap();
        assert!(deleted.get("old").is_some_and(Delta::is_removed));
        assert!(deleted.get("a").and_then(|a| a.get("x")).is_some_and(Delta::is_removed));

        let changed = differ.partition_updated(&original, &updated).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn nested_sequence_of_records_in_merged_view() {
        let merged = Differ::default()
            .merged_partition(&val(json!({"list": [{"x": 1}]})), &val(json!({"list": [{"x": 2}]})))
            .unwrap();
        let element = merged.updated.get("list").and_then(|list| list.get(Key::Index(0)));
        match element {
            Some(Delta::Partition(inner)) => {
                assert_eq!(inner.updated.get("x"), Some(&Delta::Value(Value::from(2))));
                assert!(inner.added.is_empty());
                assert!(inner.deleted.is_empty());
            }
            other => panic!("expected a nested partition, got {:?}", other),
        }
    }

    #[test]
    fn flatten_reports_every_change() {
        let flat = Differ::default()
            .flatten(
                &val(json!({"a": 1, "b": 2, "c": {"x": 1}})),
                &val(json!({"a": 9, "c": {"x": 1, "y": 2}, "d": 4})),
            )
            .unwrap();

        assert_eq!(flat.len(), 4);
        assert_eq!(flat[&Key::from("a")], Delta::Value(Value::from(9)));
        assert!(flat[&Key::from("b")].is_removed());
        assert_eq!(
            flat[&Key::from("c")].get("y"),
            Some(&Delta::Value(Value::from(2)))
        );
        assert_eq!(flat[&Key::from("d")], Delta::Value(Value::from(4)));
    }

    #[test]
    fn flatten_collision_deleted_wins() {
        let flat = Differ::default()
            .flatten(&val(json!({"a": {"x": 1}})), &val(json!({"a": {"y": 2}})))
            .unwrap();
        let a = &flat[&Key::from("a")];
        assert!(a.get("x").is_some_and(Delta::is_removed));
        assert!(a.get("y").is_none());
    }

    #[test]
    fn depth_limit_is_configurable() {
        let differ = Differ::new(DiffConfig { max_depth: 1 });
        let err = differ
            .detailed_partition(&val(json!({"a": {"b": 1}})), &val(json!({"a": {"b": 2}})))
            .unwrap_err();
        assert!(matches!(err, DiffError::DepthLimitExceeded { limit: 1, .. }));

        let ok = differ
            .detailed_partition(&val(json!({"a": 1})), &val(json!({"a": 2})))
            .unwrap();
        assert_eq!(ok.stats().replaced, 1);
    }

    #[test]
    fn json_documents() {
        let diff = Differ::default()
            .partition_documents(json!({"v": 1}), json!({"v": 2}))
            .unwrap();
        assert_eq!(diff.stats().replaced, 1);
    }

    #[test]
    fn toml_documents_with_datetime_are_rejected() {
        let original: toml::Value = toml::from_str("v = 1").unwrap();
        let updated: toml::Value = toml::from_str("v = 1979-05-27").unwrap();
        let err = Differ::default()
            .partition_documents(original, updated)
            .unwrap_err();
        assert!(matches!(
            err,
            DiffError::Value(TypeError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let original = val(json!({"a": [1, 2], "b": {"c": 3}}));
        let updated = val(json!({"a": [1], "b": {"c": 4}}));
        let before = (original.to_string(), updated.to_string());
        Differ::default().flatten(&original, &updated).unwrap();
        assert_eq!(before, (original.to_string(), updated.to_string()));
    }

    #[test]
    fn results_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Differ>();
        assert_send_sync::<Diff>();
        assert_send_sync::<MergedPartition>();
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (0i64..4).prop_map(Value::from),
            "[a-c]{0,2}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Value::from),
            ]
        })
    }

    /// A structurally equal tree that shares no storage with `value`.
    fn rebuilt(value: &Value) -> Value {
        Value::from(serde_json::Value::from(value))
    }

    fn assert_well_formed(partition: &Partition) -> Result<(), TestCaseError> {
        for key in partition.added.keys() {
            prop_assert!(!partition.deleted.contains(key));
            prop_assert!(!partition.updated.contains_key(key));
        }
        for key in &partition.deleted {
            prop_assert!(!partition.updated.contains_key(key));
        }
        for change in partition.updated.values() {
            if let Diff::Partitioned(nested) = change {
                prop_assert!(!nested.is_empty());
                assert_well_formed(nested)?;
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_identity(x in arb_value()) {
            let diff = Differ::default().detailed_partition(&x, &x).unwrap();
            prop_assert!(diff.is_unchanged());
        }

        #[test]
        fn prop_rebuilt_tree_is_unchanged(x in arb_value()) {
            let diff = Differ::default().detailed_partition(&x, &rebuilt(&x)).unwrap();
            prop_assert!(diff.is_unchanged());
        }

        #[test]
        fn prop_levels_are_disjoint(a in arb_value(), b in arb_value()) {
            let diff = Differ::default().detailed_partition(&a, &b).unwrap();
            if let Diff::Partitioned(partition) = diff {
                assert_well_formed(&partition)?;
            }
        }

        #[test]
        fn prop_kind_change_replaces_verbatim(a in arb_value(), b in arb_value()) {
            prop_assume!(a.kind() != b.kind());
            let diff = Differ::default().detailed_partition(&a, &b).unwrap();
            prop_assert_eq!(diff, Diff::Replaced(b));
        }

        #[test]
        fn prop_flatten_keys_come_from_inputs(
            a in prop::collection::btree_map("[a-d]", arb_value(), 0..4),
            b in prop::collection::btree_map("[a-d]", arb_value(), 0..4),
        ) {
            let flat = Differ::default()
                .flatten(&Value::from(a.clone()), &Value::from(b.clone()))
                .unwrap();
            for key in flat.keys() {
                let name = key.as_field().unwrap_or_default();
                prop_assert!(a.contains_key(name) || b.contains_key(name));
            }
            for (name, value) in &b {
                let key = Key::from(name.as_str());
                match a.get(name) {
                    None => {
                        let expected = Delta::Value(value.clone());
                        prop_assert_eq!(flat.get(&key), Some(&expected));
                    }
                    Some(old) if old == value => prop_assert!(!flat.contains_key(&key)),
                    Some(_) => prop_assert!(flat.contains_key(&key)),
                }
            }
            for name in a.keys().filter(|name| !b.contains_key(*name)) {
                prop_assert!(flat[&Key::from(name.as_str())].is_removed());
            }
        }
    }
}
