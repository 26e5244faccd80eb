//! Evidence weighting configuration, including the context covariate model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Additive log-space shift a fully active covariate applies to a mechanism's
/// effect, with the uncertainty of that shift.
///
/// The additive form is a modelling simplification; it sits behind the
/// `ContextAdjustment` trait in `mechnet-analysis` so it can be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CovariateShift {
    pub log_shift: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeightingConfig {
    /// Confidence level of literature CIs used to derive the prior spread. Default: 0.95.
    pub literature_ci_level: Option<f64>,
    /// Level of the reported posterior credible interval. Default: 0.95.
    pub credible_level: Option<f64>,
    /// Draws for the sampling-based posterior. Default: 20 000.
    pub sampling_draws: Option<usize>,
    /// Covariate name → shift.
    pub covariates: BTreeMap<String, CovariateShift>,
}

impl WeightingConfig {
    pub fn effective_literature_ci_level(&self) -> f64 {
        self.literature_ci_level
            .unwrap_or(defaults::DEFAULT_LITERATURE_CI_LEVEL)
    }

    pub fn effective_credible_level(&self) -> f64 {
        self.credible_level.unwrap_or(defaults::DEFAULT_CREDIBLE_LEVEL)
    }

    pub fn effective_sampling_draws(&self) -> usize {
        self.sampling_draws.unwrap_or(defaults::DEFAULT_SAMPLING_DRAWS)
    }
}
