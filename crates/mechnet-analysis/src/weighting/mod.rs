//! Evidence weighting: literature effect → log-normal prior → contextual
//! posterior, reported as a point weight plus credible interval.

pub mod context;
pub mod lognormal;
pub mod sampling;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use mechnet_core::config::WeightingConfig;
use mechnet_core::constants::{SAMPLING_INTERVAL_TOLERANCE, SAMPLING_TOLERANCE};
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::tracing::metrics;
use mechnet_core::types::{MechanismDirection, QueryWarning};

pub use context::{AdditiveLogShift, ContextAdjustment, ContextObservation};
pub use types::{
    ConsistencyReport, ContextVector, CredibleInterval, LogNormalPosterior, WeightBasis,
    WeightedEdge, WeightingMethod,
};

use crate::graph::{EffectEvidence, Mechanism, MechanismGraph};
use crate::pathfinding::Path;

/// Computes per-mechanism weights under a context.
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Clone)]
pub struct EvidenceWeigher {
    literature_level: f64,
    credible_level: f64,
    sampling_draws: usize,
    adjustment: Arc<dyn ContextAdjustment>,
}

impl std::fmt::Debug for EvidenceWeigher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceWeigher")
            .field("literature_level", &self.literature_level)
            .field("credible_level", &self.credible_level)
            .field("sampling_draws", &self.sampling_draws)
            .finish_non_exhaustive()
    }
}

impl EvidenceWeigher {
    /// Weigher with the additive log-shift context model from `config`.
    pub fn new(config: &WeightingConfig) -> Self {
        Self::with_adjustment(config, AdditiveLogShift::from_config(config))
    }

    pub fn with_adjustment(
        config: &WeightingConfig,
        adjustment: impl ContextAdjustment + 'static,
    ) -> Self {
        Self {
            literature_level: config.effective_literature_ci_level(),
            credible_level: config.effective_credible_level(),
            sampling_draws: config.effective_sampling_draws(),
            adjustment: Arc::new(adjustment),
        }
    }

    /// Configured draw count for the sampling path.
    pub fn sampling_draws(&self) -> usize {
        self.sampling_draws
    }

    /// Sampling method with the configured draw count.
    pub fn sampling(&self, seed: u64) -> WeightingMethod {
        WeightingMethod::Sampling {
            draws: self.sampling_draws,
            seed,
        }
    }

    /// Analytic weight for one mechanism.
    pub fn weigh_edge(
        &self,
        mechanism: &Mechanism,
        context: &ContextVector,
    ) -> MechnetResult<WeightedEdge> {
        self.weigh_edge_with(mechanism, context, WeightingMethod::Analytic)
    }

    #[tracing::instrument(
        skip_all,
        fields(edge_id = %mechanism.id, weighting_time_us = tracing::field::Empty)
    )]
    pub fn weigh_edge_with(
        &self,
        mechanism: &Mechanism,
        context: &ContextVector,
        method: WeightingMethod,
    ) -> MechnetResult<WeightedEdge> {
        let timer = Instant::now();
        let weighted = match self.prepare(mechanism, context)? {
            Prepared::Neutral(edge) => edge,
            Prepared::Quantified(inputs) => match method {
                WeightingMethod::Analytic => self.analytic(mechanism, inputs)?,
                WeightingMethod::Sampling { draws, seed } => {
                    self.sampled(mechanism, inputs, draws, seed)?.0
                }
            },
        };
        tracing::Span::current().record(metrics::WEIGHTING_TIME, timer.elapsed().as_micros() as u64);
        Ok(weighted)
    }

    /// Weigh every mechanism of `path`, in order, ready for propagation.
    pub fn weigh_path(
        &self,
        graph: &MechanismGraph,
        path: &Path,
        context: &ContextVector,
    ) -> MechnetResult<Vec<WeightedEdge>> {
        path.edges
            .iter()
            .map(|step| {
                let mechanism = graph.mechanism(step.mechanism_id.as_str())?;
                self.weigh_edge(mechanism, context)
            })
            .collect()
    }

    /// Run the analytic and sampling paths on one mechanism and compare.
    ///
    /// The tolerances hold at `SAMPLING_MIN_DRAWS` draws or more. A neutral
    /// mechanism compares trivially.
    pub fn consistency_check(
        &self,
        mechanism: &Mechanism,
        context: &ContextVector,
        draws: usize,
        seed: u64,
    ) -> MechnetResult<ConsistencyReport> {
        let (analytic, sampled, effective_sample_size) = match self.prepare(mechanism, context)? {
            Prepared::Neutral(edge) => (edge.clone(), edge, draws as f64),
            Prepared::Quantified(inputs) => {
                let analytic = self.analytic(mechanism, inputs.clone())?;
                let (sampled, ess) = self.sampled(mechanism, inputs, draws, seed)?;
                (analytic, sampled, ess)
            }
        };

        let point_error = relative_error(sampled.point, analytic.point);
        let lower_error = relative_error(sampled.interval.lower, analytic.interval.lower);
        let upper_error = relative_error(sampled.interval.upper, analytic.interval.upper);
        let within_tolerance = point_error <= SAMPLING_TOLERANCE
            && lower_error <= SAMPLING_INTERVAL_TOLERANCE
            && upper_error <= SAMPLING_INTERVAL_TOLERANCE;
        if !within_tolerance {
            tracing::warn!(
                edge_id = %mechanism.id,
                point_error,
                lower_error,
                upper_error,
                "sampling and analytic posteriors disagree"
            );
        }

        Ok(ConsistencyReport {
            analytic,
            sampled,
            point_error,
            lower_error,
            upper_error,
            effective_sample_size,
            within_tolerance,
        })
    }

    fn prepare(&self, mechanism: &Mechanism, context: &ContextVector) -> MechnetResult<Prepared> {
        let direction = mechanism
            .direction
            .ok_or_else(|| MechanismError::missing(mechanism.id.as_str(), "direction"))?;

        let estimate = match &mechanism.evidence {
            EffectEvidence::Quantified(estimate) => estimate,
            EffectEvidence::TopologyOnly => {
                return Ok(Prepared::Neutral(WeightedEdge {
                    edge_id: mechanism.id.clone(),
                    point: 1.0,
                    interval: CredibleInterval::unbounded(self.credible_level),
                    posterior: None,
                    basis: WeightBasis::Neutral,
                    direction,
                    warnings: Vec::new(),
                }));
            }
        };

        let mut warnings = Vec::new();
        let prior = lognormal::prior_from_estimate(
            &mechanism.id,
            estimate,
            self.literature_level,
            &mut warnings,
        )?;
        let observation = self.adjustment.observe(prior.mu, context, &mut warnings)?;
        Ok(Prepared::Quantified(PosteriorInputs {
            direction,
            prior,
            observation,
            warnings,
        }))
    }

    fn analytic(&self, mechanism: &Mechanism, inputs: PosteriorInputs) -> MechnetResult<WeightedEdge> {
        let posterior = match inputs.observation {
            Some(obs) => lognormal::conjugate_update(inputs.prior, obs),
            None => inputs.prior,
        };
        let z = lognormal::z_for_level(self.credible_level)?;
        Ok(WeightedEdge {
            edge_id: mechanism.id.clone(),
            point: posterior.median(),
            interval: posterior.interval(z, self.credible_level),
            posterior: Some(posterior),
            basis: inputs.basis(),
            direction: inputs.direction,
            warnings: inputs.warnings,
        })
    }

    fn sampled(
        &self,
        mechanism: &Mechanism,
        inputs: PosteriorInputs,
        draws: usize,
        seed: u64,
    ) -> MechnetResult<(WeightedEdge, f64)> {
        let sampled = sampling::sample_posterior(
            inputs.prior,
            inputs.observation,
            self.credible_level,
            draws,
            seed,
        )?;
        let edge = WeightedEdge {
            edge_id: mechanism.id.clone(),
            point: sampled.point,
            interval: sampled.interval,
            posterior: Some(sampled.moments),
            basis: inputs.basis(),
            direction: inputs.direction,
            warnings: inputs.warnings,
        };
        Ok((edge, sampled.effective_sample_size))
    }
}

enum Prepared {
    Neutral(WeightedEdge),
    Quantified(PosteriorInputs),
}

#[derive(Clone)]
struct PosteriorInputs {
    direction: MechanismDirection,
    prior: LogNormalPosterior,
    observation: Option<ContextObservation>,
    warnings: Vec<QueryWarning>,
}

impl PosteriorInputs {
    fn basis(&self) -> WeightBasis {
        if self.observation.is_some() {
            WeightBasis::Contextual
        } else {
            WeightBasis::Literature
        }
    }
}

fn relative_error(observed: f64, expected: f64) -> f64 {
    if observed == expected {
        return 0.0;
    }
    ((observed - expected) / expected).abs()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use mechnet_core::config::CovariateShift;
    use mechnet_core::types::{Category, EvidenceGrade};

    use super::*;
    use crate::graph::EffectEstimate;

    fn config() -> WeightingConfig {
        let mut covariates = BTreeMap::new();
        covariates.insert("rural".to_string(), CovariateShift { log_shift: 0.1, sd: 0.1 });
        WeightingConfig {
            covariates,
            ..WeightingConfig::default()
        }
    }

    fn quantified() -> Mechanism {
        Mechanism::new(
            "m1",
            "a",
            "b",
            MechanismDirection::Amplifying,
            Category::Healthcare,
            EvidenceGrade::Strong,
        )
        .with_effect(EffectEstimate::new(1.5, 1.2, 1.9).unwrap())
    }

    #[test]
    fn test_empty_context_returns_literature_point() {
        let weigher = EvidenceWeigher::new(&config());
        let weighted = weigher.weigh_edge(&quantified(), &ContextVector::new()).unwrap();
        assert!((weighted.point - 1.5).abs() < 1e-12);
        assert_eq!(weighted.basis, WeightBasis::Literature);
        assert!(weighted.interval.contains(1.5));
    }

    #[test]
    fn test_context_shifts_point_and_narrows_interval() {
        let weigher = EvidenceWeigher::new(&config());
        let base = weigher.weigh_edge(&quantified(), &ContextVector::new()).unwrap();
        let ctx = ContextVector::from([("rural".to_string(), 1.0)]);
        let local = weigher.weigh_edge(&quantified(), &ctx).unwrap();
        assert_eq!(local.basis, WeightBasis::Contextual);
        assert!(local.point > base.point);
        assert!(local.point < 1.5 * 0.1f64.exp());
        assert!(local.interval.width() < base.interval.width());
    }

    #[test]
    fn test_topology_only_is_neutral() {
        let mechanism = Mechanism::new(
            "m2",
            "a",
            "b",
            MechanismDirection::Attenuating,
            Category::Social,
            EvidenceGrade::Weak,
        );
        let weighted = EvidenceWeigher::new(&config())
            .weigh_edge(&mechanism, &ContextVector::new())
            .unwrap();
        assert_eq!(weighted.point, 1.0);
        assert_eq!(weighted.interval.lower, 0.0);
        assert!(!weighted.interval.is_bounded());
        assert_eq!(weighted.basis, WeightBasis::Neutral);
        assert!(weighted.posterior.is_none());
        assert_eq!(weighted.direction, MechanismDirection::Attenuating);
    }

    #[test]
    fn test_missing_direction_is_missing_data() {
        let mut mechanism = quantified();
        mechanism.direction = None;
        let err = EvidenceWeigher::new(&config())
            .weigh_edge(&mechanism, &ContextVector::new())
            .unwrap_err();
        assert_eq!(err, MechanismError::missing("m1", "direction"));
    }

    #[test]
    fn test_unknown_covariate_is_annotated() {
        let ctx = ContextVector::from([("coastal".to_string(), 1.0)]);
        let weighted = EvidenceWeigher::new(&config()).weigh_edge(&quantified(), &ctx).unwrap();
        assert_eq!(weighted.basis, WeightBasis::Literature);
        assert!(matches!(
            weighted.warnings.as_slice(),
            [QueryWarning::UnknownCovariate { .. }]
        ));
    }

    #[test]
    fn test_sampling_agrees_with_analytic() {
        let weigher = EvidenceWeigher::new(&config());
        let ctx = ContextVector::from([("rural".to_string(), 1.0)]);
        let report = weigher.consistency_check(&quantified(), &ctx, 20_000, 42).unwrap();
        assert!(report.within_tolerance, "{report:?}");
        assert!(report.effective_sample_size > 1_000.0);
    }

    #[test]
    fn test_neutral_edge_consistency_is_trivial() {
        let mechanism = Mechanism::new(
            "m3",
            "a",
            "b",
            MechanismDirection::Amplifying,
            Category::Social,
            EvidenceGrade::Weak,
        );
        let report = EvidenceWeigher::new(&config())
            .consistency_check(&mechanism, &ContextVector::new(), 100, 1)
            .unwrap();
        assert!(report.within_tolerance);
        assert_eq!(report.point_error, 0.0);
    }

    #[test]
    fn test_sampling_uses_configured_draws() {
        let weigher = EvidenceWeigher::new(&WeightingConfig {
            sampling_draws: Some(4_000),
            ..config()
        });
        assert_eq!(weigher.sampling_draws(), 4_000);
        assert_eq!(
            weigher.sampling(11),
            WeightingMethod::Sampling { draws: 4_000, seed: 11 }
        );
        let sampled = weigher
            .weigh_edge_with(&quantified(), &ContextVector::new(), weigher.sampling(11))
            .unwrap();
        assert!((sampled.point - 1.5).abs() / 1.5 < 0.05);

        let defaults = EvidenceWeigher::new(&WeightingConfig::default());
        assert_eq!(defaults.sampling_draws(), 20_000);
    }
}
