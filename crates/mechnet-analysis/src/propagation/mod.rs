//! Uncertainty propagation: Monte Carlo aggregation of weighted pathways.

pub mod monte_carlo;
pub mod types;

use std::collections::BTreeMap;
use std::time::Instant;

use mechnet_core::config::PropagationConfig;
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::tracing::metrics;
use rayon::prelude::*;

pub use types::{AggregateSummary, PathwayDistribution};

use crate::weighting::WeightedEdge;

/// Samples every pathway's edge posteriors jointly and reports weakest-link,
/// geometric-mean and compound-product distributions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyPropagator {
    n_samples: usize,
    seed: u64,
    level: f64,
}

impl UncertaintyPropagator {
    pub fn new(config: &PropagationConfig) -> Self {
        Self {
            n_samples: config.effective_n_samples(),
            seed: config.effective_seed(),
            level: config.effective_interval_level(),
        }
    }

    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Propagate each pathway independently, in parallel.
    #[tracing::instrument(
        skip_all,
        fields(
            pathways = pathways.len(),
            n_samples = self.n_samples,
            propagation_time_us = tracing::field::Empty,
        )
    )]
    pub fn propagate(
        &self,
        pathways: &BTreeMap<String, Vec<WeightedEdge>>,
    ) -> MechnetResult<BTreeMap<String, PathwayDistribution>> {
        if self.n_samples == 0 {
            return Err(MechanismError::invalid("n_samples must be at least 1"));
        }
        if !(self.level > 0.0 && self.level < 1.0) {
            return Err(MechanismError::invalid(format!(
                "interval level {} must be strictly between 0 and 1",
                self.level
            )));
        }
        let timer = Instant::now();

        let result = pathways
            .par_iter()
            .map(|(id, edges)| {
                monte_carlo::simulate_pathway(id, edges, self.n_samples, self.seed, self.level)
                    .map(|dist| (id.clone(), dist))
            })
            .collect::<MechnetResult<BTreeMap<_, _>>>()?;

        tracing::Span::current()
            .record(metrics::PROPAGATION_TIME, timer.elapsed().as_micros() as u64);
        tracing::debug!(pathways = result.len(), "propagation complete");
        Ok(result)
    }
}

impl Default for UncertaintyPropagator {
    fn default() -> Self {
        Self::new(&PropagationConfig::default())
    }
}
