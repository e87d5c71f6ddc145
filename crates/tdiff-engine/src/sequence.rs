//! Sequence comparator: index-aligned diff of two ordered lists.
//!
//! Elements are matched by position only. An insertion at the front shows
//! up as an update at every shifted index plus one trailing addition; no
//! longest-common-subsequence matching is attempted.

use tdiff_types::{Key, Value};
use tracing::trace;

use crate::comparator::Comparator;
use crate::error::DiffResult;
use crate::partition::{Diff, Origin, Partition};

impl Comparator<'_> {
    pub(crate) fn compare_sequences(
        &mut self,
        original: &[Value],
        updated: &[Value],
    ) -> DiffResult<Partition> {
        let mut partition = Partition::sequence();

        for index in 0..original.len().max(updated.len()) {
            let key = Key::Index(index);
            match (original.get(index), updated.get(index)) {
                (None, Some(new)) => {
                    partition.added.insert(key, new.clone());
                }
                (Some(_), None) => {
                    partition.deleted.insert(key);
                }
                (Some(old), Some(new)) => {
                    if old.is_identical(new) {
                        continue;
                    }
                    // Only record elements recurse. Nested sequences are
                    // replaced wholesale, like scalars.
                    let change = match (old, new) {
                        (Value::Record(_), Value::Record(_)) => {
                            self.descend(key.clone(), |c| c.compare(old, new))?
                        }
                        _ if old == new => continue,
                        _ => Diff::Replaced(new.clone()),
                    };
                    if !change.is_unchanged() {
                        partition.updated.insert(key, change);
                    }
                }
                (None, None) => {}
            }
        }

        if partition.updated.is_empty() && partition.deleted.is_empty() {
            trace!(path = %self.path, added = partition.added.len(), "additions only");
            return Ok(Partition::additions_only(Origin::Sequence, partition.added));
        }
        Ok(partition)
    }
}
