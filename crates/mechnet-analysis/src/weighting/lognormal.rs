//! Analytic log-normal weighting.
//!
//! Prior: `ln(effect) ~ N(mu0, sigma0²)` with `mu0 = ln(effect_size)` and
//! `sigma0 = (ln(upper) - ln(lower)) / (2·z)` for the literature CI level.
//! Update: normal-normal conjugate in log space against the context
//! observation `N(y, tau²)`.

use mechnet_core::constants::MIN_LOG_SD;
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::{EdgeId, QueryWarning};
use statrs::distribution::{ContinuousCDF, Normal};

use super::context::ContextObservation;
use super::types::LogNormalPosterior;
use crate::graph::EffectEstimate;

/// Two-sided standard-normal quantile for a central interval at `level`.
pub fn z_for_level(level: f64) -> MechnetResult<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(MechanismError::invalid(format!(
            "interval level {level} must be strictly between 0 and 1"
        )));
    }
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| MechanismError::invalid(format!("standard normal: {e}")))?;
    Ok(standard.inverse_cdf(0.5 + level / 2.0))
}

/// Log-normal prior from a literature estimate. A zero-width CI floors the
/// spread at `MIN_LOG_SD` and records a warning.
pub fn prior_from_estimate(
    edge_id: &EdgeId,
    estimate: &EffectEstimate,
    literature_level: f64,
    warnings: &mut Vec<QueryWarning>,
) -> MechnetResult<LogNormalPosterior> {
    let z = z_for_level(literature_level)?;
    let mu = estimate.effect_size().ln();
    let sigma = (estimate.ci_upper().ln() - estimate.ci_lower().ln()) / (2.0 * z);
    if sigma < MIN_LOG_SD {
        tracing::warn!(edge_id = %edge_id, "degenerate literature interval, prior spread floored");
        warnings.push(QueryWarning::DegenerateInterval {
            edge_id: edge_id.clone(),
        });
        return Ok(LogNormalPosterior {
            mu,
            sigma: MIN_LOG_SD,
        });
    }
    Ok(LogNormalPosterior { mu, sigma })
}

/// Precision-weighted combination of prior and observation.
pub fn conjugate_update(prior: LogNormalPosterior, observation: ContextObservation) -> LogNormalPosterior {
    let prior_precision = 1.0 / (prior.sigma * prior.sigma);
    let obs_precision = 1.0 / (observation.sd * observation.sd);
    let variance = 1.0 / (prior_precision + obs_precision);
    LogNormalPosterior {
        mu: variance * (prior.mu * prior_precision + observation.mean * obs_precision),
        sigma: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_for_95_percent() {
        let z = z_for_level(0.95).unwrap();
        assert!((z - 1.959964).abs() < 1e-5);
        assert!(z_for_level(1.0).is_err());
        assert!(z_for_level(0.0).is_err());
    }

    #[test]
    fn test_prior_recovers_literature_interval() {
        let estimate = EffectEstimate::new(1.5, 1.2, 1.875).unwrap();
        let prior =
            prior_from_estimate(&EdgeId::from("m1"), &estimate, 0.95, &mut Vec::new()).unwrap();
        assert!((prior.median() - 1.5).abs() < 1e-12);
        let z = z_for_level(0.95).unwrap();
        let interval = prior.interval(z, 0.95);
        // Symmetric in log space: the interval reproduces the CI's log width.
        let width = interval.upper.ln() - interval.lower.ln();
        assert!((width - (1.875f64.ln() - 1.2f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_interval_floors_spread() {
        let estimate = EffectEstimate::new(2.0, 2.0, 2.0).unwrap();
        let mut warnings = Vec::new();
        let prior = prior_from_estimate(&EdgeId::from("m1"), &estimate, 0.95, &mut warnings).unwrap();
        assert_eq!(prior.sigma, MIN_LOG_SD);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_conjugate_update_equal_precision_averages() {
        let prior = LogNormalPosterior { mu: 0.0, sigma: 0.2 };
        let obs = ContextObservation { mean: 0.4, sd: 0.2 };
        let post = conjugate_update(prior, obs);
        assert!((post.mu - 0.2).abs() < 1e-12);
        assert!((post.sigma - 0.2 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_narrower_than_prior() {
        let prior = LogNormalPosterior { mu: 0.3, sigma: 0.5 };
        let post = conjugate_update(prior, ContextObservation { mean: 0.1, sd: 1.0 });
        assert!(post.sigma < prior.sigma);
        assert!(post.mu < prior.mu && post.mu > 0.1);
    }
}
