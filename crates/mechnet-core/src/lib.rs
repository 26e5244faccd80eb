//! # mechnet-core
//!
//! Foundation crate for the mechnet causal-mechanism engine.
//! Defines identifiers, closed tag sets, errors, config, tracing, and constants.
//! `mechnet-analysis` builds the graph model and query services on top of it.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::MechnetConfig;
pub use errors::{ConfigError, MechanismError, MechnetErrorCode, MechnetResult};
pub use types::{
    Category, EdgeId, EvidenceGrade, GradeWeights, MechanismDirection, NodeId, QueryWarning,
    Scale,
};
