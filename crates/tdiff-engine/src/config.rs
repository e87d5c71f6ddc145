use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Default nesting limit. Token documents rarely exceed a dozen levels.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for a [`Differ`](crate::Differ).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Maximum container nesting the comparators will descend into before
    /// failing with [`DiffError::DepthLimitExceeded`].
    pub max_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DiffConfig {
    /// Parse and validate a configuration from a TOML document.
    ///
    /// Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> DiffResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can partition at least a root container.
    pub fn validate(&self) -> DiffResult<()> {
        if self.max_depth == 0 {
            return Err(DiffError::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}
