//! Analysis configuration.
//!
//! Loaded from a YAML file with kebab-case keys. Every key is optional:
//!
//! ```yaml
//! max-cycles-per-scc: 1000
//! top-n: 10
//! parallel-depth: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default bound on elementary cycles enumerated per strongly connected component
pub const DEFAULT_MAX_CYCLES_PER_SCC: usize = 1000;

/// Default length of the `most_imported` / `most_dependencies` rankings
pub const DEFAULT_TOP_N: usize = 10;

/// Tunables for one analysis run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Stop enumerating cycles in a component after this many
    #[serde(rename = "max-cycles-per-scc")]
    pub max_cycles_per_scc: usize,

    /// Ranking length used by the default summary
    #[serde(rename = "top-n")]
    pub top_n: usize,

    /// Run the per-root depth traversals on the rayon pool
    #[serde(rename = "parallel-depth")]
    pub parallel_depth: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_cycles_per_scc: DEFAULT_MAX_CYCLES_PER_SCC,
            top_n: DEFAULT_TOP_N,
            parallel_depth: true,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if it
    /// is not valid YAML or fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on serialization failure and `Error::Io` if the
    /// file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that would make analysis meaningless.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the cycle bound or the ranking length is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_cycles_per_scc == 0 {
            return Err(Error::Config(
                "max-cycles-per-scc must be at least 1".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(Error::Config("top-n must be at least 1".to_string()));
        }
        Ok(())
    }
}
