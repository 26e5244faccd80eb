//! Upstream traversal request and result types.

use mechnet_core::config::TraversalConfig;
use mechnet_core::types::{Category, EdgeId, EvidenceGrade, NodeId, Scale};
use serde::{Deserialize, Serialize};

use crate::graph::Mechanism;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamQuery {
    /// Seed factors; duplicates are collapsed.
    pub targets: Vec<NodeId>,
    /// Degrees walked upstream. 0 returns only the targets.
    pub max_degrees: usize,
    pub min_grade: EvidenceGrade,
    /// Empty means every category is followed.
    pub categories: Vec<Category>,
}

impl UpstreamQuery {
    pub fn new<I, T>(targets: I, config: &TraversalConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            max_degrees: config.effective_max_degrees(),
            min_grade: config.effective_min_grade(),
            categories: Vec::new(),
        }
    }

    pub fn with_max_degrees(mut self, max_degrees: usize) -> Self {
        self.max_degrees = max_degrees;
        self
    }

    pub fn with_min_grade(mut self, grade: EvidenceGrade) -> Self {
        self.min_grade = grade;
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub(crate) fn follows(&self, mechanism: &Mechanism) -> bool {
        mechanism.grade >= self.min_grade
            && (self.categories.is_empty() || self.categories.contains(&mechanism.category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub id: NodeId,
    /// Minimum number of upstream hops from any target.
    pub degree: usize,
    pub scale: Scale,
    pub category: Category,
    /// In the most-upstream structural tier.
    pub is_policy_lever: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubgraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    /// Mean degree-from-target over all nodes, targets counted as 0.
    pub average_degree: f64,
    pub policy_lever_count: usize,
    pub max_degree_reached: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubgraphReason {
    NoTargets,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    /// Sorted by (degree, id).
    pub nodes: Vec<SubgraphNode>,
    /// Traversed mechanisms, sorted by id.
    pub edges: Vec<EdgeId>,
    pub summary: SubgraphSummary,
    pub reason: Option<SubgraphReason>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&SubgraphNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn policy_levers(&self) -> impl Iterator<Item = &SubgraphNode> {
        self.nodes.iter().filter(|n| n.is_policy_lever)
    }
}
