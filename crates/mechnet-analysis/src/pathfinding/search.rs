//! State shared by the three path searches: resolved endpoints, floored
//! grade weights, filtered adjacency and BFS distance maps.

use std::collections::VecDeque;

use mechnet_core::constants::EPSILON_WEIGHT;
use mechnet_core::types::{EvidenceGrade, FxHashMap, GradeWeights, QueryWarning};
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::types::{Path, PathConstraints, PathStep};
use crate::graph::{Mechanism, MechanismGraph};

pub(crate) struct SearchContext<'g> {
    pub graph: &'g MechanismGraph,
    pub start: NodeIndex,
    pub end: NodeIndex,
    pub constraints: &'g PathConstraints,
    /// Grade weights after flooring.
    pub weights: GradeWeights,
}

impl<'g> SearchContext<'g> {
    pub fn new(
        graph: &'g MechanismGraph,
        start: NodeIndex,
        end: NodeIndex,
        constraints: &'g PathConstraints,
        warnings: &mut Vec<QueryWarning>,
    ) -> Self {
        Self {
            graph,
            start,
            end,
            constraints,
            weights: floor_grade_weights(&constraints.grade_weights, warnings),
        }
    }

    /// Admitted neighbors of `idx` in `direction`, sorted by mechanism id.
    pub fn neighbors(
        &self,
        idx: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = (NodeIndex, &'g Mechanism)> + '_ {
        self.graph
            .adjacent(idx, direction)
            .filter(move |(_, m)| self.constraints.admits(m))
    }

    pub fn weight(&self, mechanism: &Mechanism) -> f64 {
        self.weights.weight(mechanism.grade)
    }

    /// Unbounded BFS hop distances from `from` over admitted edges.
    pub fn bfs_distances(&self, from: NodeIndex, direction: Direction) -> FxHashMap<NodeIndex, usize> {
        let mut dist: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut queue = VecDeque::new();
        dist.insert(from, 0);
        queue.push_back(from);

        while let Some(node) = queue.pop_front() {
            let d = dist[&node];
            for (next, _) in self.neighbors(node, direction) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Materialize a mechanism sequence as a `Path`.
    pub fn build_path(&self, mechanisms: &[&Mechanism], score: f64) -> Path {
        let edges: Vec<PathStep> = mechanisms
            .iter()
            .map(|m| PathStep {
                mechanism_id: m.id.clone(),
                source: m.source.clone(),
                target: m.target.clone(),
                grade: m.grade,
                direction: m.direction,
                category: m.category,
                weight: self.weight(m),
            })
            .collect();
        let min_grade = mechanisms
            .iter()
            .map(|m| m.grade)
            .min()
            .unwrap_or(EvidenceGrade::Strong);
        Path {
            edges,
            score,
            min_grade,
        }
    }

    pub fn weight_product(&self, mechanisms: &[&Mechanism]) -> f64 {
        mechanisms.iter().map(|m| self.weight(m)).product()
    }
}

/// Raise non-positive grade weights to `EPSILON_WEIGHT`, one warning per grade.
pub(crate) fn floor_grade_weights(
    configured: &GradeWeights,
    warnings: &mut Vec<QueryWarning>,
) -> GradeWeights {
    let mut floored = *configured;
    for grade in EvidenceGrade::ALL {
        let w = configured.weight(grade);
        if w > 0.0 {
            continue;
        }
        tracing::warn!(%grade, configured = w, "grade weight floored at epsilon");
        warnings.push(QueryWarning::WeightFloored {
            grade,
            configured: w,
            floored_to: EPSILON_WEIGHT,
        });
        match grade {
            EvidenceGrade::Strong => floored.strong = EPSILON_WEIGHT,
            EvidenceGrade::Moderate => floored.moderate = EPSILON_WEIGHT,
            EvidenceGrade::Weak => floored.weak = EPSILON_WEIGHT,
        }
    }
    floored
}

/// Compare two mechanism sequences by edge id, lexicographically.
pub(crate) fn cmp_edge_ids(a: &[&Mechanism], b: &[&Mechanism]) -> std::cmp::Ordering {
    a.iter().map(|m| &m.id).cmp(b.iter().map(|m| &m.id))
}
