//! petgraph::StableGraph wrapper with id-keyed access to factors and mechanisms.

use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::{EdgeId, FxHashMap, NodeId};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use super::types::{FactorNode, Mechanism};

/// The underlying directed graph type.
pub type MechanismStableGraph = StableGraph<FactorNode, Mechanism, Directed>;

/// Node and mechanism counts for a loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub mechanisms: usize,
    pub quantified: usize,
    pub topology_only: usize,
    pub policy_levers: usize,
}

/// In-memory mechanism graph.
///
/// Append-only: the only mutators take `&mut self`, so query services, which
/// receive `&MechanismGraph`, always see a frozen snapshot. petgraph keeps
/// outgoing and incoming adjacency lists, so neighbor lookups are cheap in
/// both directions.
#[derive(Debug, Clone, Default)]
pub struct MechanismGraph {
    graph: MechanismStableGraph,
    node_index: FxHashMap<NodeId, NodeIndex>,
    edge_index: FxHashMap<EdgeId, EdgeIndex>,
}

impl MechanismGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a factor. Duplicate ids are rejected.
    pub fn add_node(&mut self, node: FactorNode) -> MechnetResult<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(MechanismError::invalid(format!("duplicate node id '{}'", node.id)));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(())
    }

    /// Insert a mechanism. Both endpoints must already exist.
    pub fn add_mechanism(&mut self, mechanism: Mechanism) -> MechnetResult<()> {
        if self.edge_index.contains_key(&mechanism.id) {
            return Err(MechanismError::invalid(format!(
                "duplicate mechanism id '{}'",
                mechanism.id
            )));
        }
        let source = self
            .index_of(mechanism.source.as_str())
            .ok_or_else(|| MechanismError::node_not_found(mechanism.source.as_str()))?;
        let target = self
            .index_of(mechanism.target.as_str())
            .ok_or_else(|| MechanismError::node_not_found(mechanism.target.as_str()))?;
        if source == target {
            return Err(MechanismError::invalid(format!(
                "mechanism '{}' links '{}' to itself",
                mechanism.id, mechanism.source
            )));
        }
        let id = mechanism.id.clone();
        let idx = self.graph.add_edge(source, target, mechanism);
        self.edge_index.insert(id, idx);
        Ok(())
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_mechanism(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Look up a factor by id.
    pub fn node(&self, id: &str) -> MechnetResult<&FactorNode> {
        self.index_of(id)
            .and_then(|idx| self.graph.node_weight(idx))
            .ok_or_else(|| MechanismError::node_not_found(id))
    }

    /// Look up a mechanism by id.
    pub fn mechanism(&self, id: &str) -> MechnetResult<&Mechanism> {
        self.edge_index
            .get(id)
            .and_then(|&idx| self.graph.edge_weight(idx))
            .ok_or_else(|| MechanismError::edge_not_found(id))
    }

    /// Mechanisms leaving `id`, sorted by mechanism id.
    pub fn outgoing(&self, id: &str) -> MechnetResult<Vec<&Mechanism>> {
        let idx = self.index_of(id).ok_or_else(|| MechanismError::node_not_found(id))?;
        Ok(self.adjacent(idx, Direction::Outgoing).map(|(_, m)| m).collect())
    }

    /// Mechanisms entering `id`, sorted by mechanism id.
    pub fn incoming(&self, id: &str) -> MechnetResult<Vec<&Mechanism>> {
        let idx = self.index_of(id).ok_or_else(|| MechanismError::node_not_found(id))?;
        Ok(self.adjacent(idx, Direction::Incoming).map(|(_, m)| m).collect())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All factors, sorted by id.
    pub fn nodes(&self) -> Vec<&FactorNode> {
        let mut nodes: Vec<&FactorNode> = self.graph.node_indices().map(|i| &self.graph[i]).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// All mechanisms, sorted by id.
    pub fn mechanisms(&self) -> Vec<&Mechanism> {
        let mut edges: Vec<&Mechanism> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_weight(e))
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    pub fn stats(&self) -> GraphStats {
        let quantified = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_weight(e))
            .filter(|m| m.evidence.is_quantified())
            .count();
        GraphStats {
            nodes: self.node_count(),
            mechanisms: self.edge_count(),
            quantified,
            topology_only: self.edge_count() - quantified,
            policy_levers: self
                .graph
                .node_indices()
                .filter(|&i| self.graph[i].is_policy_lever_tier())
                .count(),
        }
    }

    // --- crate-internal index access for the query services ---

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &FactorNode {
        &self.graph[idx]
    }

    /// Neighbors of `idx` in `direction` with the connecting mechanism,
    /// sorted by mechanism id. For `Incoming` the index is the source.
    pub(crate) fn adjacent(
        &self,
        idx: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = (NodeIndex, &Mechanism)> {
        let mut edges: Vec<(NodeIndex, &Mechanism)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (other, e.weight())
            })
            .collect();
        edges.sort_by(|a, b| a.1.id.cmp(&b.1.id));
        edges.into_iter()
    }

    pub(crate) fn inner(&self) -> &MechanismStableGraph {
        &self.graph
    }
}
