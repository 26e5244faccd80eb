//! Query and graph-construction errors.

use std::fmt;

use super::error_code::{self, MechnetErrorCode};

/// Which kind of graph entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Errors raised by the graph model and the query services.
///
/// "No path" and "empty subgraph" are not errors; they come back as results
/// carrying a reason code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MechanismError {
    #[error("unknown {kind} reference: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("mechanism {edge_id} is missing {field}")]
    MissingData { edge_id: String, field: String },
}

impl MechanismError {
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Node,
            id: id.into(),
        }
    }

    pub fn edge_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Edge,
            id: id.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn missing(edge_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingData {
            edge_id: edge_id.into(),
            field: field.into(),
        }
    }
}

impl MechnetErrorCode for MechanismError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::InvalidRequest { .. } => error_code::INVALID_REQUEST,
            Self::MissingData { .. } => error_code::MISSING_DATA,
        }
    }
}

pub type MechnetResult<T> = Result<T, MechanismError>;
