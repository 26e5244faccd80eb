//! Non-fatal annotations attached to query results.
//!
//! Degenerate numeric inputs are floored rather than raised; each floor is
//! recorded here so reduced confidence stays visible to the caller.

use serde::{Deserialize, Serialize};

use super::{EdgeId, EvidenceGrade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryWarning {
    /// A configured grade weight was non-positive and was raised to epsilon.
    WeightFloored {
        grade: EvidenceGrade,
        configured: f64,
        floored_to: f64,
    },
    /// A literature CI had zero width; the prior spread was floored.
    DegenerateInterval { edge_id: EdgeId },
    /// A context covariate has no configured shift and was ignored.
    UnknownCovariate { name: String },
    /// Monte Carlo draws at or below zero were raised to epsilon.
    SampleFloored { pathway_id: String, count: usize },
}
