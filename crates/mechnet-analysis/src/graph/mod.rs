//! Graph model: factors, evidence-annotated mechanisms, and the indexed graph.

pub mod feedback;
pub mod indexed;
pub mod ingest;
pub mod types;

pub use feedback::{feedback_loops, FeedbackLoop};
pub use indexed::{GraphStats, MechanismGraph};
pub use ingest::{GraphDocument, MechanismRecord, NodeRecord};
pub use types::{EffectEstimate, EffectEvidence, FactorNode, Mechanism};
