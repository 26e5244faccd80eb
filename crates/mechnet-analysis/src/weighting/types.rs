//! Evidence weighting types.

use std::collections::BTreeMap;

use mechnet_core::types::{EdgeId, MechanismDirection, QueryWarning};
use serde::{Deserialize, Serialize};

/// Covariate name → activation. 0 is inactive, 1 fully active; values in
/// between scale the covariate's shift.
pub type ContextVector = BTreeMap<String, f64>;

/// Interval on the ratio scale. `upper` may be `+∞` for an unquantified
/// mechanism; it serializes as `null` and reads back as `+∞`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibleInterval {
    pub lower: f64,
    #[serde(with = "unbounded")]
    pub upper: f64,
    pub level: f64,
}

impl CredibleInterval {
    pub fn unbounded(level: f64) -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
            level,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.upper.is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Normal distribution of the log effect; the effect itself is log-normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogNormalPosterior {
    pub mu: f64,
    pub sigma: f64,
}

impl LogNormalPosterior {
    pub fn median(&self) -> f64 {
        self.mu.exp()
    }

    pub fn mean(&self) -> f64 {
        (self.mu + self.sigma * self.sigma / 2.0).exp()
    }

    /// Central interval `exp(mu ± z·sigma)`.
    pub fn interval(&self, z: f64, level: f64) -> CredibleInterval {
        CredibleInterval {
            lower: (self.mu - z * self.sigma).exp(),
            upper: (self.mu + z * self.sigma).exp(),
            level,
        }
    }
}

/// What a weight was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBasis {
    /// Literature prior only; no context covariate was active.
    Literature,
    /// Literature prior updated with the local context.
    Contextual,
    /// No effect size: direction known, magnitude unknown.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub edge_id: EdgeId,
    /// Posterior median, or 1.0 for a neutral edge.
    pub point: f64,
    pub interval: CredibleInterval,
    /// `None` for a neutral edge.
    pub posterior: Option<LogNormalPosterior>,
    pub basis: WeightBasis,
    pub direction: MechanismDirection,
    pub warnings: Vec<QueryWarning>,
}

impl WeightedEdge {
    pub fn is_quantified(&self) -> bool {
        self.posterior.is_some()
    }
}

/// How the posterior is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WeightingMethod {
    /// Closed-form conjugate update.
    #[default]
    Analytic,
    /// Self-normalized importance sampling from the prior.
    Sampling { draws: usize, seed: u64 },
}

/// Analytic and sampled results for one mechanism, with relative errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub analytic: WeightedEdge,
    pub sampled: WeightedEdge,
    pub point_error: f64,
    pub lower_error: f64,
    pub upper_error: f64,
    pub effective_sample_size: f64,
    pub within_tolerance: bool,
}

mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
