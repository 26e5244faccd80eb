//! Fewest-edge paths with deterministic tie-breaking.
//!
//! Forward and reverse BFS give `ds` and `dt`; an admitted edge u→v lies on
//! some shortest path iff `ds[u] + 1 + dt[v] == D`. Those edges form a DAG.
//! Paths through it are enumerated best-first on (weakest grade desc,
//! edge ids asc). Extending a partial path never improves its key, so
//! complete paths pop out in final order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mechnet_core::types::EvidenceGrade;
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::search::{cmp_edge_ids, SearchContext};
use super::types::{Path, PathReason};
use crate::graph::Mechanism;

pub(crate) fn shortest_paths(ctx: &SearchContext<'_>) -> (Vec<Path>, Option<PathReason>) {
    let from_start = ctx.bfs_distances(ctx.start, Direction::Outgoing);
    let Some(&total) = from_start.get(&ctx.end) else {
        return (Vec::new(), Some(PathReason::NoPath));
    };
    if total > ctx.constraints.max_depth {
        return (Vec::new(), Some(PathReason::DepthExceeded));
    }
    let to_end = ctx.bfs_distances(ctx.end, Direction::Incoming);

    let on_dag = |u: NodeIndex, v: NodeIndex| match (from_start.get(&u), to_end.get(&v)) {
        (Some(&du), Some(&dv)) => du + 1 + dv == total,
        _ => false,
    };

    let limit = ctx.constraints.max_results;
    let mut paths: Vec<Path> = Vec::new();
    let mut heap = BinaryHeap::new();
    heap.push(Partial {
        node: ctx.start,
        min_grade: EvidenceGrade::Strong,
        edges: Vec::new(),
    });

    while let Some(partial) = heap.pop() {
        if partial.node == ctx.end {
            if paths.len() == limit {
                return (paths, Some(PathReason::ResultCapReached));
            }
            paths.push(ctx.build_path(&partial.edges, partial.edges.len() as f64));
            continue;
        }
        for (next, mechanism) in ctx.neighbors(partial.node, Direction::Outgoing) {
            if !on_dag(partial.node, next) {
                continue;
            }
            let mut edges = partial.edges.clone();
            edges.push(mechanism);
            heap.push(Partial {
                node: next,
                min_grade: partial.min_grade.min(mechanism.grade),
                edges,
            });
        }
    }

    (paths, None)
}

/// A prefix of a shortest path. Heap order: higher weakest grade first,
/// then lexicographically smaller edge-id sequence.
struct Partial<'g> {
    node: NodeIndex,
    min_grade: EvidenceGrade,
    edges: Vec<&'g Mechanism>,
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
        self.min_grade
            .cmp(&other.min_grade)
            .then_with(|| cmp_edge_ids(&other.edges, &self.edges))
    }
}
