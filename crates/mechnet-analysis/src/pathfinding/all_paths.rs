//! Depth-bounded enumeration of every path from start to end.
//!
//! Runs one search per exact length, shortest first, so the result is
//! ordered by length. Within a length, partial paths are expanded best-first
//! on (score desc, edge ids asc). Grade weights are at most 1.0, so extending
//! a partial never improves its key and complete paths pop out in final
//! order. The result cap is checked on every pop, so work stops as soon as
//! one path past the cap is found.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mechnet_core::types::collections::SmallVec8;
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::search::{cmp_edge_ids, SearchContext};
use super::types::{Path, PathReason};
use crate::graph::Mechanism;

pub(crate) fn all_paths(ctx: &SearchContext<'_>) -> (Vec<Path>, Option<PathReason>) {
    // Hop distance to the end is a lower bound on the remaining path; it
    // prunes branches that cannot finish within the current length.
    let to_end = ctx.bfs_distances(ctx.end, Direction::Incoming);
    let Some(&min_len) = to_end.get(&ctx.start) else {
        return (Vec::new(), Some(PathReason::NoPath));
    };
    if min_len > ctx.constraints.max_depth {
        return (Vec::new(), Some(PathReason::DepthExceeded));
    }

    let limit = ctx.constraints.max_results;
    let allow_cycles = ctx.constraints.allow_cycles;
    let mut paths: Vec<Path> = Vec::new();

    for length in min_len..=ctx.constraints.max_depth {
        let mut heap = BinaryHeap::new();
        let mut root = Partial {
            node: ctx.start,
            score: 1.0,
            edges: SmallVec8::new(),
            visited: SmallVec8::new(),
        };
        root.visited.push(ctx.start);
        heap.push(root);

        while let Some(partial) = heap.pop() {
            if partial.node == ctx.end {
                if paths.len() == limit {
                    return (paths, Some(PathReason::ResultCapReached));
                }
                paths.push(ctx.build_path(&partial.edges, partial.score));
                continue;
            }
            let depth = partial.edges.len();
            for (next, mechanism) in ctx.neighbors(partial.node, Direction::Outgoing) {
                let Some(&remaining) = to_end.get(&next) else {
                    continue;
                };
                if depth + 1 + remaining > length {
                    continue;
                }
                // Paths stop at the end node.
                if next == ctx.end && depth + 1 != length {
                    continue;
                }
                let revisits = if allow_cycles {
                    partial.edges.iter().any(|m| m.id == mechanism.id)
                } else {
                    partial.visited.contains(&next)
                };
                if revisits {
                    continue;
                }
                let mut child = Partial {
                    node: next,
                    score: partial.score * ctx.weight(mechanism),
                    edges: partial.edges.clone(),
                    visited: partial.visited.clone(),
                };
                child.edges.push(mechanism);
                child.visited.push(next);
                heap.push(child);
            }
        }
    }

    let reason = paths.is_empty().then_some(PathReason::NoPath);
    (paths, reason)
}

/// A prefix of a path of the current length. Heap order: higher score
/// first, then lexicographically smaller edge-id sequence.
struct Partial<'g> {
    node: NodeIndex,
    score: f64,
    edges: SmallVec8<&'g Mechanism>,
    visited: SmallVec8<NodeIndex>,
}

impl PartialEq for Partial<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Partial<'_> {}

impl PartialOrd for Partial<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Partial<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| cmp_edge_ids(&other.edges, &self.edges))
    }
}
