//! Build configuration, loaded from `docdeps.toml`

use std::path::Path;

use serde::Deserialize;

use crate::closure::SourceOrder;
use crate::error::{Error, Result};

/// Default configuration file name, looked up next to the manifest.
pub const CONFIG_FILE: &str = "docdeps.toml";

/// Upper bound on producer threads.
pub const MAX_WORKERS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Producer threads; 0 picks the available parallelism.
    pub workers: usize,
    pub order: SourceOrder,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Warn about cycles among transitive edges.
    pub report_cycles: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            workers: 0,
            order: SourceOrder::Sorted,
            pretty: false,
            report_cycles: true,
        }
    }
}

impl BuildConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: BuildConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&source)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("Loading configuration from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers > MAX_WORKERS {
            return Err(Error::InvalidConfig(format!(
                "workers must be at most {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        Ok(())
    }

    /// Producer thread count, resolving 0 to the machine's parallelism.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2)
    }
}
