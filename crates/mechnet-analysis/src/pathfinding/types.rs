//! Pathfinding request and result types.

use std::fmt;
use std::str::FromStr;

use mechnet_core::config::PathfindingConfig;
use mechnet_core::errors::MechanismError;
use mechnet_core::types::{
    Category, EdgeId, EvidenceGrade, GradeWeights, MechanismDirection, NodeId, QueryWarning,
};
use serde::{Deserialize, Serialize};

use crate::graph::Mechanism;

/// Which search `find_paths` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathAlgorithm {
    /// Fewest edges; ties go to the highest weakest grade, then edge-id order.
    Shortest,
    /// Highest product of grade weights, top-K via Yen.
    StrongestEvidence,
    /// Every simple path up to the depth bound.
    AllPaths,
}

impl PathAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::StrongestEvidence => "strongest_evidence",
            Self::AllPaths => "all_paths",
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathAlgorithm {
    type Err = MechanismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortest" => Ok(Self::Shortest),
            "strongest_evidence" | "strongest-evidence" => Ok(Self::StrongestEvidence),
            "all_paths" | "all-paths" => Ok(Self::AllPaths),
            other => Err(MechanismError::invalid(format!("unknown algorithm '{other}'"))),
        }
    }
}

/// Limits and filters for one `find_paths` call.
///
/// Filters are applied while expanding, so a filtered edge never contributes
/// to depth or reachability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConstraints {
    pub max_depth: usize,
    pub max_results: usize,
    /// StrongestEvidence output size, clamped to `max_results`.
    pub top_k: usize,
    /// Empty means every category is allowed.
    pub include_categories: Vec<Category>,
    pub exclude_categories: Vec<Category>,
    pub min_grade: Option<EvidenceGrade>,
    /// AllPaths only: revisit nodes, never reuse an edge.
    pub allow_cycles: bool,
    pub grade_weights: GradeWeights,
}

impl PathConstraints {
    pub fn from_config(config: &PathfindingConfig) -> Self {
        Self {
            max_depth: config.effective_max_depth(),
            max_results: config.effective_max_results(),
            top_k: config.effective_top_k(),
            include_categories: Vec::new(),
            exclude_categories: Vec::new(),
            min_grade: config.min_grade,
            allow_cycles: false,
            grade_weights: config.effective_grade_weights(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_grade(mut self, grade: EvidenceGrade) -> Self {
        self.min_grade = Some(grade);
        self
    }

    pub fn including(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.include_categories.extend(categories);
        self
    }

    pub fn excluding(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.exclude_categories.extend(categories);
        self
    }

    pub fn with_cycles(mut self, allow: bool) -> Self {
        self.allow_cycles = allow;
        self
    }

    /// Whether a mechanism passes the grade and category filters.
    pub fn admits(&self, mechanism: &Mechanism) -> bool {
        if let Some(min) = self.min_grade {
            if mechanism.grade < min {
                return false;
            }
        }
        if !self.include_categories.is_empty()
            && !self.include_categories.contains(&mechanism.category)
        {
            return false;
        }
        !self.exclude_categories.contains(&mechanism.category)
    }
}

impl Default for PathConstraints {
    fn default() -> Self {
        Self::from_config(&PathfindingConfig::default())
    }
}

/// One mechanism on a path, with the evidence the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub mechanism_id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub grade: EvidenceGrade,
    pub direction: Option<MechanismDirection>,
    pub category: Category,
    /// Grade weight used for scoring.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub edges: Vec<PathStep>,
    /// Hop count for Shortest; product of grade weights otherwise.
    pub score: f64,
    /// Weakest grade on the path.
    pub min_grade: EvidenceGrade,
}

impl Path {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<&EdgeId> {
        self.edges.iter().map(|s| &s.mechanism_id).collect()
    }

    /// Visited factors in order, start first.
    pub fn node_ids(&self) -> Vec<&NodeId> {
        let mut nodes: Vec<&NodeId> = self.edges.first().map(|s| &s.source).into_iter().collect();
        nodes.extend(self.edges.iter().map(|s| &s.target));
        nodes
    }

    pub fn weight_product(&self) -> f64 {
        self.edges.iter().map(|s| s.weight).product()
    }
}

/// Why a result is empty or incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathReason {
    NoPath,
    /// The end is reachable under the filters, but only beyond `max_depth`.
    DepthExceeded,
    ResultCapReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub algorithm: PathAlgorithm,
    pub paths: Vec<Path>,
    pub reason: Option<PathReason>,
    pub warnings: Vec<QueryWarning>,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
