//! Sampling-based posterior: self-normalized importance sampling.
//!
//! Draws the log effect from the prior, weights each draw by the context
//! likelihood, and reports the weighted log-mean and weighted quantiles.
//! With no context observation every weight is equal and the result is a
//! plain Monte Carlo summary of the prior.

use mechnet_core::errors::{MechanismError, MechnetResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::context::ContextObservation;
use super::types::{CredibleInterval, LogNormalPosterior};

/// Result of one importance-sampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPosterior {
    /// Weighted mean and standard deviation of the log draws.
    pub moments: LogNormalPosterior,
    pub point: f64,
    pub interval: CredibleInterval,
    /// Kish effective sample size of the normalized weights.
    pub effective_sample_size: f64,
}

pub fn sample_posterior(
    prior: LogNormalPosterior,
    observation: Option<ContextObservation>,
    level: f64,
    draws: usize,
    seed: u64,
) -> MechnetResult<SampledPosterior> {
    if draws == 0 {
        return Err(MechanismError::invalid("sampling draws must be at least 1"));
    }
    let normal = Normal::new(prior.mu, prior.sigma)
        .map_err(|e| MechanismError::invalid(format!("prior distribution: {e}")))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let xs: Vec<f64> = (0..draws).map(|_| normal.sample(&mut rng)).collect();
    let log_weights: Vec<f64> = match observation {
        Some(obs) => {
            let two_var = 2.0 * obs.sd * obs.sd;
            xs.iter().map(|x| -(x - obs.mean).powi(2) / two_var).collect()
        }
        None => vec![0.0; draws],
    };

    // Shift by the max before exponentiating so the largest weight is 1.
    let max_lw = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = log_weights.iter().map(|lw| (lw - max_lw).exp()).collect();
    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(MechanismError::invalid("importance weights collapsed to zero"));
    }

    let mean: f64 = xs.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>() / total;
    let variance: f64 =
        xs.iter().zip(&weights).map(|(x, w)| w * (x - mean).powi(2)).sum::<f64>() / total;
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    let effective_sample_size = total * total / sum_sq;

    let mut pairs: Vec<(f64, f64)> = xs.into_iter().zip(weights).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    let tail = (1.0 - level) / 2.0;
    let lower = weighted_quantile(&pairs, total, tail);
    let upper = weighted_quantile(&pairs, total, 1.0 - tail);

    Ok(SampledPosterior {
        moments: LogNormalPosterior {
            mu: mean,
            sigma: variance.sqrt(),
        },
        point: mean.exp(),
        interval: CredibleInterval {
            lower: lower.exp(),
            upper: upper.exp(),
            level,
        },
        effective_sample_size,
    })
}

/// First sorted value whose cumulative weight reaches `q` of the total.
fn weighted_quantile(sorted: &[(f64, f64)], total: f64, q: f64) -> f64 {
    let threshold = q * total;
    let mut cumulative = 0.0;
    for &(x, w) in sorted {
        cumulative += w;
        if cumulative >= threshold {
            return x;
        }
    }
    sorted.last().map_or(f64::NAN, |&(x, _)| x)
}
