//! Engine configuration loading and validation

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ScopeError};

/// Tuning knobs for tensor algebra and predicate compilation
///
/// ```toml
/// parallel_threshold = 65536
/// max_cells = 16777216
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScopeConfig {
    /// Cell or coordinate count at which work moves onto the rayon pool.
    /// `0` keeps everything on the calling thread.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Largest tensor (product of the shape) the compiler will allocate
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
}

fn default_parallel_threshold() -> usize { 1 << 16 }
fn default_max_cells() -> usize { 1 << 24 }

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            max_cells: default_max_cells(),
        }
    }
}

impl ScopeConfig {
    /// Configuration that never uses the rayon pool
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: 0,
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ScopeConfig = toml::from_str(contents)
            .map_err(|e| ScopeError::config(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScopeError::config(format!(
                "Failed to read configuration file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_cells == 0 {
            return Err(ScopeError::config("max_cells must be greater than zero"));
        }
        Ok(())
    }

    /// Whether a workload of `items` should run on the rayon pool
    pub fn should_parallelize(&self, items: usize) -> bool {
        self.parallel_threshold > 0 && items >= self.parallel_threshold
    }
}
