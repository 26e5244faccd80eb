//! Propagation result types.

use mechnet_core::types::QueryWarning;
use serde::{Deserialize, Serialize};

/// Sample mean with an empirical central interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

/// Aggregate distributions for one pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayDistribution {
    pub pathway_id: String,
    pub n_samples: usize,
    pub edge_count: usize,
    /// Smallest sampled edge weight per draw (bottleneck).
    pub weakest_link: AggregateSummary,
    /// Nth root of the product per draw (average per-step effect).
    pub geometric_mean: AggregateSummary,
    /// Full product per draw (total multiplicative effect).
    pub compound_product: AggregateSummary,
    /// Edges without a posterior; each contributed a constant 1.0.
    pub unquantified_edges: usize,
    pub warnings: Vec<QueryWarning>,
}
