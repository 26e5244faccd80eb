//! Pathfinding over the mechanism graph: shortest, strongest-evidence and
//! all-paths searches, with filters applied during expansion.

mod all_paths;
mod search;
mod shortest;
mod strongest;
pub mod types;

use std::time::Instant;

use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::tracing::metrics;
use mechnet_core::types::EvidenceGrade;

pub use types::{Path, PathAlgorithm, PathConstraints, PathReason, PathResult, PathStep};

use crate::graph::MechanismGraph;
use search::SearchContext;

/// Find paths from `start` to `end`.
///
/// Rejects `start == end`, unknown endpoints, `max_depth < 1`,
/// `max_results == 0` and grade weights above 1.0 or non-finite with
/// `InvalidRequest`. Weights at or below zero are floored, not rejected.
/// An empty result is not an error; `PathResult::reason` says why.
#[tracing::instrument(
    skip_all,
    fields(
        start = %start,
        end = %end,
        algorithm = %algorithm,
        pathfinding_time_us = tracing::field::Empty,
        paths_returned = tracing::field::Empty,
    )
)]
pub fn find_paths(
    graph: &MechanismGraph,
    start: &str,
    end: &str,
    algorithm: PathAlgorithm,
    constraints: &PathConstraints,
) -> MechnetResult<PathResult> {
    let timer = Instant::now();
    validate(constraints)?;
    if start == end {
        return Err(MechanismError::invalid(format!(
            "start and end are the same node '{start}'"
        )));
    }
    let start_idx = graph
        .index_of(start)
        .ok_or_else(|| MechanismError::invalid(format!("start node '{start}' is not in the graph")))?;
    let end_idx = graph
        .index_of(end)
        .ok_or_else(|| MechanismError::invalid(format!("end node '{end}' is not in the graph")))?;

    let mut warnings = Vec::new();
    let ctx = SearchContext::new(graph, start_idx, end_idx, constraints, &mut warnings);
    let (paths, reason) = match algorithm {
        PathAlgorithm::Shortest => shortest::shortest_paths(&ctx),
        PathAlgorithm::StrongestEvidence => strongest::strongest_paths(&ctx),
        PathAlgorithm::AllPaths => all_paths::all_paths(&ctx),
    };

    let span = tracing::Span::current();
    span.record(metrics::PATHFINDING_TIME, timer.elapsed().as_micros() as u64);
    span.record(metrics::PATHS_RETURNED, paths.len() as u64);
    tracing::debug!(paths = paths.len(), ?reason, "pathfinding complete");

    Ok(PathResult {
        algorithm,
        paths,
        reason,
        warnings,
    })
}

fn validate(constraints: &PathConstraints) -> MechnetResult<()> {
    if constraints.max_depth < 1 {
        return Err(MechanismError::invalid("max_depth must be at least 1"));
    }
    if constraints.max_results == 0 {
        return Err(MechanismError::invalid("max_results must be at least 1"));
    }
    if constraints.top_k == 0 {
        return Err(MechanismError::invalid("top_k must be at least 1"));
    }
    for grade in EvidenceGrade::ALL {
        let w = constraints.grade_weights.weight(grade);
        if !w.is_finite() || w > 1.0 {
            return Err(MechanismError::invalid(format!(
                "grade weight for {grade} must be finite and at most 1.0 (got {w})"
            )));
        }
    }
    Ok(())
}
