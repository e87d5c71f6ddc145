//! Record comparator: diff over the union of two records' keys.

use std::collections::{BTreeMap, BTreeSet};

use tdiff_types::{Key, Value};

use crate::comparator::Comparator;
use crate::error::DiffResult;
use crate::partition::{Diff, Partition};

impl Comparator<'_> {
    pub(crate) fn compare_records(
        &mut self,
        original: &BTreeMap<String, Value>,
        updated: &BTreeMap<String, Value>,
    ) -> DiffResult<Partition> {
        let mut partition = Partition::record();
        let names: BTreeSet<&String> = original.keys().chain(updated.keys()).collect();

        for name in names {
            let key = Key::Field(name.clone());
            match (original.get(name), updated.get(name)) {
                // New keys are reported whole, not diffed further.
                (None, Some(new)) => {
                    partition.added.insert(key, new.clone());
                }
                (Some(_), None) => {
                    partition.deleted.insert(key);
                }
                (Some(old), Some(new)) if old.is_identical(new) => {}
                (Some(old), Some(new)) => {
                    match self.descend(key.clone(), |c| c.compare(old, new))? {
                        // Hoisted: a replacement has no sub-keys to merge.
                        Diff::Replaced(value) => {
                            partition.updated.insert(key, Diff::Replaced(value));
                        }
                        // Equal containers built separately.
                        Diff::Partitioned(child) if child.is_empty() => {}
                        nested => {
                            partition.updated.insert(key, nested);
                        }
                    }
                }
                (None, None) => {}
            }
        }

        Ok(partition)
    }
}
