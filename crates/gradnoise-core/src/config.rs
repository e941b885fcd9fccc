use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::evaluator::NoiseEvaluator;
use crate::fbm::FbmParams;
use crate::grid::GridSpec;
use crate::precompute::Bounds;

/// Everything needed to reproduce a sampled field.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Seed for the gradient source. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub grid: GridSpec,
    pub fbm: FbmParams,
    /// Gradient warm-up rectangle, run before sampling.
    pub precompute: Option<Bounds>,
}

impl NoiseConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded noise config from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.fbm.validate()
    }

    /// Fresh evaluator for this config, warmed up over `precompute` if set.
    pub fn build_evaluator(&self) -> NoiseEvaluator {
        let mut noise = match self.seed {
            Some(seed) => NoiseEvaluator::with_seed(seed),
            None => NoiseEvaluator::new(),
        };
        if let Some(bounds) = self.precompute {
            noise.precompute_bounds(bounds);
        }
        noise
    }
}
