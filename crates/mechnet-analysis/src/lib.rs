//! # mechnet-analysis
//!
//! Causal-mechanism network analysis. Holds an append-only mechanism graph
//! (`petgraph`) and the stateless query services that run over it:
//! pathfinding, bounded upstream traversal, evidence weighting, and Monte
//! Carlo uncertainty propagation.

pub mod engine;
pub mod graph;
pub mod pathfinding;
pub mod propagation;
pub mod traversal;
pub mod weighting;

pub use engine::MechanismEngine;
pub use graph::{
    EffectEstimate, EffectEvidence, FactorNode, FeedbackLoop, GraphDocument, Mechanism,
    MechanismGraph,
};
pub use pathfinding::{Path, PathAlgorithm, PathConstraints, PathReason, PathResult};
pub use propagation::{PathwayDistribution, UncertaintyPropagator};
pub use traversal::{Subgraph, SubgraphNode, UpstreamQuery};
pub use weighting::{
    ContextAdjustment, ContextVector, CredibleInterval, EvidenceWeigher, WeightedEdge,
    WeightingMethod,
};
