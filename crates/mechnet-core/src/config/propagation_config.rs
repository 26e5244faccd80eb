//! Monte Carlo propagation configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PropagationConfig {
    /// Joint samples per pathway. Default: 1000.
    pub n_samples: Option<usize>,
    /// Seed used when a request supplies none.
    pub default_seed: Option<u64>,
    /// Empirical interval level. Default: 0.90 (5th/95th percentile).
    pub interval_level: Option<f64>,
}

impl PropagationConfig {
    pub fn effective_n_samples(&self) -> usize {
        self.n_samples.unwrap_or(defaults::DEFAULT_N_SAMPLES)
    }

    pub fn effective_seed(&self) -> u64 {
        self.default_seed.unwrap_or(defaults::DEFAULT_SEED)
    }

    pub fn effective_interval_level(&self) -> f64 {
        self.interval_level.unwrap_or(defaults::DEFAULT_INTERVAL_LEVEL)
    }
}
