//! Run configuration.
//!
//! A run needs exactly two inputs, a seed and a size. They may come from a
//! JSON file, from command-line flags, or from an interactive prompt; this
//! module only merges and validates them. It never does the prompting itself.
//!
//! ```json
//! { "seed": 42, "size": 1000, "lcg": { "multiplier": 6097, "increment": 749060, "modulus": 127 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generators::LcgParams;

/// Partially specified run inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub seed: Option<i64>,
    pub size: Option<i64>,
    pub lcg: Option<LcgParams>,
}

/// Fully validated run inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub seed: i64,
    pub size: usize,
    pub lcg: LcgParams,
}

impl ResolvedConfig {
    pub fn new(seed: i64, size: usize) -> Self {
        Self {
            seed,
            size,
            lcg: LcgParams::default(),
        }
    }
}

impl RunConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Fields set in `overrides` win over fields set in `self`.
    pub fn merge(self, overrides: RunConfig) -> RunConfig {
        RunConfig {
            seed: overrides.seed.or(self.seed),
            size: overrides.size.or(self.size),
            lcg: overrides.lcg.or(self.lcg),
        }
    }

    /// Validate into a [`ResolvedConfig`].
    ///
    /// Missing fields are [`Error::Config`]; a negative size is
    /// [`Error::InvalidInput`]; bad LCG constants are [`Error::Generation`].
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let seed = self
            .seed
            .ok_or_else(|| Error::Config("seed is not set".to_string()))?;
        let size = self
            .size
            .ok_or_else(|| Error::Config("size is not set".to_string()))?;
        let size = usize::try_from(size)
            .map_err(|_| Error::InvalidInput(format!("size must be non-negative, got {size}")))?;
        let lcg = self.lcg.unwrap_or_default();
        lcg.validate()?;
        Ok(ResolvedConfig { seed, size, lcg })
    }
}

/// Parse one integer typed by the user (e.g. at a `Seed:` prompt).
pub fn parse_integer(field: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    trimmed.parse::<i64>().map_err(|_| {
        Error::InvalidInput(format!("{field} must be an integer, got {trimmed:?}"))
    })
}
