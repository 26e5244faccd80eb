//! Context models: how local covariates turn into an observation of the
//! log effect.

use std::collections::BTreeMap;

use mechnet_core::config::{CovariateShift, WeightingConfig};
use mechnet_core::constants::MIN_LOG_SD;
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::QueryWarning;

use super::types::ContextVector;

/// A normal observation of the local log effect, `N(mean, sd²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextObservation {
    pub mean: f64,
    pub sd: f64,
}

/// Maps a context vector to a log-space observation around the prior mean.
///
/// Returns `Ok(None)` when nothing in the context is active, in which case
/// the prior is reported unchanged.
pub trait ContextAdjustment: Send + Sync {
    fn observe(
        &self,
        prior_mu: f64,
        context: &ContextVector,
        warnings: &mut Vec<QueryWarning>,
    ) -> MechnetResult<Option<ContextObservation>>;
}

/// Each active covariate adds `activation · log_shift` to the log effect;
/// shift uncertainties add in quadrature.
#[derive(Debug, Clone, Default)]
pub struct AdditiveLogShift {
    covariates: BTreeMap<String, CovariateShift>,
}

impl AdditiveLogShift {
    pub fn new(covariates: BTreeMap<String, CovariateShift>) -> Self {
        Self { covariates }
    }

    pub fn from_config(config: &WeightingConfig) -> Self {
        Self::new(config.covariates.clone())
    }
}

impl ContextAdjustment for AdditiveLogShift {
    fn observe(
        &self,
        prior_mu: f64,
        context: &ContextVector,
        warnings: &mut Vec<QueryWarning>,
    ) -> MechnetResult<Option<ContextObservation>> {
        let mut shift = 0.0;
        let mut variance = 0.0;
        let mut active = 0usize;

        for (name, &activation) in context {
            if !activation.is_finite() {
                return Err(MechanismError::invalid(format!(
                    "covariate '{name}' has non-finite activation {activation}"
                )));
            }
            if activation == 0.0 {
                continue;
            }
            let Some(covariate) = self.covariates.get(name) else {
                tracing::warn!(covariate = %name, "unknown context covariate ignored");
                warnings.push(QueryWarning::UnknownCovariate { name: name.clone() });
                continue;
            };
            shift += activation * covariate.log_shift;
            variance += (activation * covariate.sd).powi(2);
            active += 1;
        }

        if active == 0 {
            return Ok(None);
        }
        Ok(Some(ContextObservation {
            mean: prior_mu + shift,
            sd: variance.sqrt().max(MIN_LOG_SD),
        }))
    }
}
