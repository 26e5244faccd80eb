//! Feedback-loop reporting via Tarjan's SCC.
//!
//! Cycles are legal in a mechanism network (a reverse mechanism is its own,
//! independently evidenced edge). This module only surfaces them.

use mechnet_core::types::NodeId;
use petgraph::algo::tarjan_scc;
use serde::{Deserialize, Serialize};

use super::indexed::MechanismGraph;

/// A strongly connected set of factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackLoop {
    /// Members sorted by id.
    pub members: Vec<NodeId>,
}

/// Every strongly connected component with more than one factor.
/// Loops are ordered by their first member.
pub fn feedback_loops(graph: &MechanismGraph) -> Vec<FeedbackLoop> {
    let mut loops: Vec<FeedbackLoop> = tarjan_scc(graph.inner())
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut members: Vec<NodeId> =
                scc.into_iter().map(|idx| graph.node_at(idx).id.clone()).collect();
            members.sort();
            FeedbackLoop { members }
        })
        .collect();
    loops.sort_by(|a, b| a.members.cmp(&b.members));
    loops
}
