//! Joint Monte Carlo sampling of a pathway's edge posteriors.
//!
//! Every pathway gets its own ChaCha8 stream seeded from the request seed and
//! the pathway id, so results are reproducible and independent of which other
//! pathways ran alongside it.

use mechnet_core::constants::EPSILON_WEIGHT;
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::QueryWarning;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal};
use xxhash_rust::xxh3::xxh3_64;

use super::types::{AggregateSummary, PathwayDistribution};
use crate::weighting::WeightedEdge;

/// Seed for one pathway's RNG stream.
pub fn pathway_seed(seed: u64, pathway_id: &str) -> u64 {
    seed ^ xxh3_64(pathway_id.as_bytes())
}

pub fn simulate_pathway(
    pathway_id: &str,
    edges: &[WeightedEdge],
    n_samples: usize,
    seed: u64,
    level: f64,
) -> MechnetResult<PathwayDistribution> {
    if edges.is_empty() {
        return Err(MechanismError::invalid(format!("pathway '{pathway_id}' has no edges")));
    }

    let samplers: Vec<Option<LogNormal<f64>>> = edges
        .iter()
        .map(|edge| {
            edge.posterior
                .map(|p| {
                    LogNormal::new(p.mu, p.sigma).map_err(|e| {
                        MechanismError::invalid(format!(
                            "edge {} has an unusable posterior: {e}",
                            edge.edge_id
                        ))
                    })
                })
                .transpose()
        })
        .collect::<MechnetResult<_>>()?;
    let unquantified_edges = samplers.iter().filter(|s| s.is_none()).count();

    let mut rng = ChaCha8Rng::seed_from_u64(pathway_seed(seed, pathway_id));
    let mut weakest = Vec::with_capacity(n_samples);
    let mut geometric = Vec::with_capacity(n_samples);
    let mut compound = Vec::with_capacity(n_samples);
    let mut floored = 0usize;
    let k = edges.len() as f64;

    for _ in 0..n_samples {
        let mut min = f64::INFINITY;
        let mut log_sum = 0.0;
        let mut product = 1.0;
        for sampler in &samplers {
            let mut w = match sampler {
                Some(dist) => dist.sample(&mut rng),
                None => 1.0,
            };
            if !(w > 0.0 && w.is_finite()) {
                w = EPSILON_WEIGHT;
                floored += 1;
            }
            min = min.min(w);
            log_sum += w.ln();
            product *= w;
        }
        weakest.push(min);
        geometric.push((log_sum / k).exp());
        compound.push(product);
    }

    let mut warnings = Vec::new();
    if floored > 0 {
        tracing::warn!(pathway_id, count = floored, "sampled weights floored at epsilon");
        warnings.push(QueryWarning::SampleFloored {
            pathway_id: pathway_id.to_string(),
            count: floored,
        });
    }

    Ok(PathwayDistribution {
        pathway_id: pathway_id.to_string(),
        n_samples,
        edge_count: edges.len(),
        weakest_link: summarize(weakest, level),
        geometric_mean: summarize(geometric, level),
        compound_product: summarize(compound, level),
        unquantified_edges,
        warnings,
    })
}

fn summarize(mut samples: Vec<f64>, level: f64) -> AggregateSummary {
    let mean = samples.iter().sum::<f64>() / samples.len().max(1) as f64;
    samples.sort_by(|a, b| a.total_cmp(b));
    let tail = (1.0 - level) / 2.0;
    AggregateSummary {
        mean,
        lower: percentile(&samples, tail),
        upper: percentile(&samples, 1.0 - tail),
        level,
    }
}

/// Nearest-rank percentile of a sorted slice; `fraction` in [0, 1].
pub fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (fraction * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use mechnet_core::types::{EdgeId, MechanismDirection};

    use super::*;
    use crate::weighting::{CredibleInterval, LogNormalPosterior, WeightBasis};

    fn edge(id: &str, mu: f64, sigma: f64) -> WeightedEdge {
        let posterior = LogNormalPosterior { mu, sigma };
        WeightedEdge {
            edge_id: EdgeId::from(id),
            point: posterior.median(),
            interval: posterior.interval(1.96, 0.95),
            posterior: Some(posterior),
            basis: WeightBasis::Literature,
            direction: MechanismDirection::Amplifying,
            warnings: Vec::new(),
        }
    }

    fn neutral(id: &str) -> WeightedEdge {
        WeightedEdge {
            edge_id: EdgeId::from(id),
            point: 1.0,
            interval: CredibleInterval::unbounded(0.95),
            posterior: None,
            basis: WeightBasis::Neutral,
            direction: MechanismDirection::Amplifying,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted: Vec<f64> = (0..=100).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.05), 5.0);
        assert_eq!(percentile(&sorted, 0.95), 95.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_degenerate_posteriors_give_exact_aggregates() {
        let edges = vec![edge("a", 0.5f64.ln(), 0.0), edge("b", 0.8f64.ln(), 0.0)];
        let dist = simulate_pathway("p", &edges, 200, 1, 0.90).unwrap();
        assert!((dist.weakest_link.mean - 0.5).abs() < 1e-12);
        assert!((dist.compound_product.mean - 0.4).abs() < 1e-12);
        assert!((dist.geometric_mean.mean - 0.4f64.sqrt()).abs() < 1e-12);
        assert_eq!(dist.weakest_link.lower, dist.weakest_link.upper);
    }

    #[test]
    fn test_neutral_edges_counted_and_constant() {
        let edges = vec![edge("a", 0.5f64.ln(), 0.0), neutral("b")];
        let dist = simulate_pathway("p", &edges, 100, 1, 0.90).unwrap();
        assert_eq!(dist.unquantified_edges, 1);
        assert!((dist.compound_product.mean - 0.5).abs() < 1e-12);
        assert!((dist.weakest_link.mean - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_underflow_floored_with_warning() {
        let edges = vec![edge("tiny", -800.0, 1e-6)];
        let dist = simulate_pathway("p", &edges, 50, 3, 0.90).unwrap();
        assert!((dist.weakest_link.mean - EPSILON_WEIGHT).abs() < 1e-18);
        assert_eq!(
            dist.warnings,
            vec![QueryWarning::SampleFloored {
                pathway_id: "p".to_string(),
                count: 50
            }]
        );
    }

    #[test]
    fn test_pathway_seed_depends_on_id() {
        assert_ne!(pathway_seed(7, "a"), pathway_seed(7, "b"));
        assert_eq!(pathway_seed(7, "a"), pathway_seed(7, "a"));
    }

    #[test]
    fn test_empty_pathway_rejected() {
        assert!(simulate_pathway("p", &[], 10, 1, 0.9).is_err());
    }
}
