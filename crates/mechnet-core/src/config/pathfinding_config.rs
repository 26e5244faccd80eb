//! Pathfinding configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::types::{EvidenceGrade, GradeWeights};

/// Defaults for `find_paths` constraints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Maximum edges per path. Default: 6.
    pub max_depth: Option<usize>,
    /// Maximum paths returned. Default: 50.
    pub max_results: Option<usize>,
    /// Paths returned by the strongest-evidence algorithm. Default: 5.
    pub top_k: Option<usize>,
    /// Edges below this grade are pruned. Default: none.
    pub min_grade: Option<EvidenceGrade>,
    /// Grade → weight map for strongest-evidence scoring.
    pub grade_weights: Option<GradeWeights>,
}

impl PathfindingConfig {
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(defaults::DEFAULT_MAX_DEPTH)
    }

    pub fn effective_max_results(&self) -> usize {
        self.max_results.unwrap_or(defaults::DEFAULT_MAX_RESULTS)
    }

    pub fn effective_top_k(&self) -> usize {
        self.top_k.unwrap_or(defaults::DEFAULT_TOP_K)
    }

    pub fn effective_grade_weights(&self) -> GradeWeights {
        self.grade_weights.unwrap_or_default()
    }
}
