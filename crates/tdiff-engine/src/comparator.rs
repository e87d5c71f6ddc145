//! Value comparator: dispatches a pair of values to a comparison strategy
//! by their structural kinds.

use tdiff_types::{Key, Path, Value};
use tracing::{trace, warn};

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::partition::Diff;

/// Recursive comparison state for one top-level call.
///
/// The sequence and record strategies live in their own modules as further
/// `impl` blocks on this type.
pub(crate) struct Comparator<'a> {
    config: &'a DiffConfig,
    pub(crate) path: Path,
}

impl<'a> Comparator<'a> {
    pub(crate) fn new(config: &'a DiffConfig) -> Self {
        Self {
            config,
            path: Path::root(),
        }
    }

    /// Compare two values the caller has already found not to be identical.
    pub(crate) fn compare(&mut self, original: &Value, updated: &Value) -> DiffResult<Diff> {
        match (original, updated) {
            (Value::Sequence(old), Value::Sequence(new)) => {
                self.check_depth()?;
                self.compare_sequences(old, new).map(Diff::Partitioned)
            }
            (Value::Record(old), Value::Record(new)) => {
                self.check_depth()?;
                self.compare_records(old, new).map(Diff::Partitioned)
            }
            (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_)) => Ok(Diff::Replaced(updated.clone())),
            _ => {
                trace!(
                    path = %self.path,
                    from = %original.kind(),
                    to = %updated.kind(),
                    "kind changed; replacing"
                );
                Ok(Diff::Replaced(updated.clone()))
            }
        }
    }

    /// Run `f` with `key` appended to the current path.
    pub(crate) fn descend<T>(
        &mut self,
        key: Key,
        f: impl FnOnce(&mut Self) -> DiffResult<T>,
    ) -> DiffResult<T> {
        self.path.push(key);
        let result = f(self);
        self.path.pop();
        result
    }

    fn check_depth(&self) -> DiffResult<()> {
        let limit = self.config.max_depth;
        if self.path.depth() >= limit {
            warn!(limit, path = %self.path, "nesting depth limit exceeded");
            return Err(DiffError::DepthLimitExceeded {
                limit,
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
