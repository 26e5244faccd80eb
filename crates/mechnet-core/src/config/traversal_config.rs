//! Bounded upstream traversal configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::types::EvidenceGrade;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraversalConfig {
    /// Degrees walked upstream from the targets. Default: 3.
    pub max_degrees: Option<usize>,
    /// Minimum grade an incoming edge needs to be followed. Default: weak.
    pub min_grade: Option<EvidenceGrade>,
}

impl TraversalConfig {
    pub fn effective_max_degrees(&self) -> usize {
        self.max_degrees.unwrap_or(defaults::DEFAULT_MAX_DEGREES)
    }

    pub fn effective_min_grade(&self) -> EvidenceGrade {
        self.min_grade.unwrap_or(EvidenceGrade::Weak)
    }
}
