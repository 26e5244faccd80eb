//! MechanismEngine: owns a frozen graph snapshot and the configured query
//! services, and exposes the analysis operations in one place.

use std::collections::BTreeMap;
use std::sync::Arc;

use mechnet_core::constants::VERSION;
use mechnet_core::errors::MechnetResult;
use mechnet_core::types::NodeId;
use mechnet_core::MechnetConfig;

use crate::graph::{self, FeedbackLoop, GraphStats, Mechanism, MechanismGraph};
use crate::pathfinding::{self, Path, PathAlgorithm, PathConstraints, PathResult};
use crate::propagation::{PathwayDistribution, UncertaintyPropagator};
use crate::traversal::{self, Subgraph, UpstreamQuery};
use crate::weighting::{
    ConsistencyReport, ContextAdjustment, ContextVector, EvidenceWeigher, WeightedEdge,
};

/// The causal-mechanism analysis engine.
///
/// Cheap to clone; clones share the same graph snapshot.
#[derive(Debug, Clone)]
pub struct MechanismEngine {
    graph: Arc<MechanismGraph>,
    config: MechnetConfig,
    weigher: EvidenceWeigher,
    propagator: UncertaintyPropagator,
}

impl MechanismEngine {
    pub fn new(graph: MechanismGraph, config: MechnetConfig) -> Self {
        Self::from_shared(Arc::new(graph), config)
    }

    /// Build over an already shared snapshot.
    pub fn from_shared(graph: Arc<MechanismGraph>, config: MechnetConfig) -> Self {
        let stats = graph.stats();
        tracing::info!(
            version = VERSION,
            nodes = stats.nodes,
            mechanisms = stats.mechanisms,
            quantified = stats.quantified,
            policy_levers = stats.policy_levers,
            "mechanism engine ready"
        );
        Self {
            weigher: EvidenceWeigher::new(&config.weighting),
            propagator: UncertaintyPropagator::new(&config.propagation),
            graph,
            config,
        }
    }

    /// Replace the context model used for weighting.
    pub fn with_context_adjustment(mut self, adjustment: impl ContextAdjustment + 'static) -> Self {
        self.weigher = EvidenceWeigher::with_adjustment(&self.config.weighting, adjustment);
        self
    }

    pub fn graph(&self) -> &MechanismGraph {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<MechanismGraph> {
        Arc::clone(&self.graph)
    }

    pub fn config(&self) -> &MechnetConfig {
        &self.config
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    // --- Pathfinding ---

    /// Constraints seeded from the pathfinding config.
    pub fn default_constraints(&self) -> PathConstraints {
        PathConstraints::from_config(&self.config.pathfinding)
    }

    pub fn find_paths(
        &self,
        start: &str,
        end: &str,
        algorithm: PathAlgorithm,
        constraints: &PathConstraints,
    ) -> MechnetResult<PathResult> {
        pathfinding::find_paths(&self.graph, start, end, algorithm, constraints)
    }

    /// `find_paths` with the algorithm given by name and config defaults.
    pub fn find_paths_named(&self, start: &str, end: &str, algorithm: &str) -> MechnetResult<PathResult> {
        let algorithm: PathAlgorithm = algorithm.parse()?;
        self.find_paths(start, end, algorithm, &self.default_constraints())
    }

    // --- Traversal ---

    /// Query seeded from the traversal config.
    pub fn upstream_query<I, T>(&self, targets: I) -> UpstreamQuery
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        UpstreamQuery::new(targets, &self.config.traversal)
    }

    pub fn explore_upstream(&self, query: &UpstreamQuery) -> MechnetResult<Subgraph> {
        traversal::explore_upstream(&self.graph, query)
    }

    // --- Weighting ---

    pub fn weigher(&self) -> &EvidenceWeigher {
        &self.weigher
    }

    /// Weigh a mechanism by id.
    pub fn weigh_edge(&self, edge_id: &str, context: &ContextVector) -> MechnetResult<WeightedEdge> {
        let mechanism: &Mechanism = self.graph.mechanism(edge_id)?;
        self.weigher.weigh_edge(mechanism, context)
    }

    /// Compare analytic and sampled weights for one mechanism, using the
    /// configured draw count.
    pub fn consistency_check(
        &self,
        edge_id: &str,
        context: &ContextVector,
        seed: u64,
    ) -> MechnetResult<ConsistencyReport> {
        let mechanism = self.graph.mechanism(edge_id)?;
        self.weigher
            .consistency_check(mechanism, context, self.weigher.sampling_draws(), seed)
    }

    pub fn weigh_path(&self, path: &Path, context: &ContextVector) -> MechnetResult<Vec<WeightedEdge>> {
        self.weigher.weigh_path(&self.graph, path, context)
    }

    // --- Propagation ---

    /// Propagate with config defaults unless `n_samples` or `seed` is given.
    pub fn propagate(
        &self,
        pathways: &BTreeMap<String, Vec<WeightedEdge>>,
        n_samples: Option<usize>,
        seed: Option<u64>,
    ) -> MechnetResult<BTreeMap<String, PathwayDistribution>> {
        let mut propagator = self.propagator;
        if let Some(n) = n_samples {
            propagator = propagator.with_samples(n);
        }
        if let Some(seed) = seed {
            propagator = propagator.with_seed(seed);
        }
        propagator.propagate(pathways)
    }

    /// Weigh every path in `result` and propagate them, keyed
    /// `"<algorithm>-<rank>"` by result position.
    pub fn propagate_paths(
        &self,
        result: &PathResult,
        context: &ContextVector,
        seed: Option<u64>,
    ) -> MechnetResult<BTreeMap<String, PathwayDistribution>> {
        let mut pathways = BTreeMap::new();
        for (rank, path) in result.paths.iter().enumerate() {
            let key = format!("{}-{rank:03}", result.algorithm);
            pathways.insert(key, self.weigh_path(path, context)?);
        }
        self.propagate(&pathways, None, seed)
    }

    // --- Structure ---

    pub fn feedback_loops(&self) -> Vec<FeedbackLoop> {
        graph::feedback_loops(&self.graph)
    }
}
