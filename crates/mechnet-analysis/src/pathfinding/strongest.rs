//! Strongest-evidence paths: Dijkstra plus Yen's K-shortest over
//! `-ln(weight)` edge costs, so maximizing a product of weights becomes
//! minimizing a sum without underflow.
//!
//! Labels order by (cost, hop count, edge ids). That order is preserved by
//! appending an edge, so Dijkstra settles the best label per state exactly
//! and equal-cost ties resolve deterministically.
//!
//! Spur searches run over (node, hops) states and never leave the remaining
//! hop budget, so every candidate Yen generates already fits `max_depth`.
//! Grade weights are in (0, 1], which keeps every edge cost non-negative.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mechnet_core::types::{EdgeId, FxHashMap, FxHashSet};
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::search::{cmp_edge_ids, SearchContext};
use super::types::{Path, PathReason};
use crate::graph::Mechanism;

pub(crate) fn strongest_paths(ctx: &SearchContext<'_>) -> (Vec<Path>, Option<PathReason>) {
    let limit = ctx.constraints.top_k.min(ctx.constraints.max_results);
    let max_depth = ctx.constraints.max_depth;

    let to_end = ctx.bfs_distances(ctx.end, Direction::Incoming);
    match to_end.get(&ctx.start) {
        None => return (Vec::new(), Some(PathReason::NoPath)),
        Some(&d) if d > max_depth => return (Vec::new(), Some(PathReason::DepthExceeded)),
        Some(_) => {}
    }
    let search = SpurSearch { ctx, to_end: &to_end };

    let Some(first) =
        search.cheapest(ctx.start, max_depth, &FxHashSet::default(), &FxHashSet::default())
    else {
        return (Vec::new(), Some(PathReason::NoPath));
    };

    let mut accepted: Vec<Label<'_>> = Vec::new();
    let mut seen: FxHashSet<Vec<EdgeId>> = FxHashSet::default();
    let mut candidates: BinaryHeap<std::cmp::Reverse<Label<'_>>> = BinaryHeap::new();
    seen.insert(edge_ids(&first.edges));
    candidates.push(std::cmp::Reverse(first));

    while let Some(std::cmp::Reverse(best)) = candidates.pop() {
        if accepted.len() == limit {
            return (finish(ctx, accepted), Some(PathReason::ResultCapReached));
        }
        accepted.push(best);
        let Some(prev) = accepted.last() else { break };

        for spur_idx in 0..prev.edges.len() {
            let root = &prev.edges[..spur_idx];
            let spur_node = match root.last() {
                Some(m) => node_of(ctx, m.target.as_str()),
                None => Some(ctx.start),
            };
            let Some(spur_node) = spur_node else { continue };

            // Edges leaving the spur node on any accepted path sharing this root.
            let mut excluded_edges: FxHashSet<EdgeId> = FxHashSet::default();
            for path in &accepted {
                if path.edges.len() > spur_idx && same_ids(&path.edges[..spur_idx], root) {
                    excluded_edges.insert(path.edges[spur_idx].id.clone());
                }
            }
            // Root nodes other than the spur node stay off the spur path.
            let mut excluded_nodes: FxHashSet<NodeIndex> = FxHashSet::default();
            excluded_nodes.insert(ctx.start);
            for m in root {
                if let Some(idx) = node_of(ctx, m.target.as_str()) {
                    excluded_nodes.insert(idx);
                }
            }
            excluded_nodes.remove(&spur_node);

            let budget = max_depth - spur_idx;
            let Some(spur) = search.cheapest(spur_node, budget, &excluded_edges, &excluded_nodes)
            else {
                continue;
            };
            let mut edges: Vec<&Mechanism> = root.to_vec();
            edges.extend_from_slice(&spur.edges);
            if seen.insert(edge_ids(&edges)) {
                candidates.push(std::cmp::Reverse(Label::from_edges(ctx, edges)));
            }
        }
    }

    (finish(ctx, accepted), None)
}

fn finish(ctx: &SearchContext<'_>, labels: Vec<Label<'_>>) -> Vec<Path> {
    labels
        .into_iter()
        .map(|label| ctx.build_path(&label.edges, ctx.weight_product(&label.edges)))
        .collect()
}

/// Hop-bounded Dijkstra to the context's end node.
struct SpurSearch<'a, 'g> {
    ctx: &'a SearchContext<'g>,
    /// Hop distance to the end ignoring exclusions; a lower bound for any spur.
    to_end: &'a FxHashMap<NodeIndex, usize>,
}

impl<'a, 'g> SpurSearch<'a, 'g> {
    /// Cheapest path from `from` to the end using at most `budget` edges.
    fn cheapest(
        &self,
        from: NodeIndex,
        budget: usize,
        excluded_edges: &FxHashSet<EdgeId>,
        excluded_nodes: &FxHashSet<NodeIndex>,
    ) -> Option<Label<'g>> {
        let ctx = self.ctx;
        let mut best: FxHashMap<(NodeIndex, usize), Label<'g>> = FxHashMap::default();
        let mut heap = BinaryHeap::new();
        let origin = Label {
            cost: 0.0,
            edges: Vec::new(),
            node: from,
        };
        best.insert((from, 0), origin.clone());
        heap.push(std::cmp::Reverse(origin));

        while let Some(std::cmp::Reverse(label)) = heap.pop() {
            if label.node == ctx.end {
                return Some(label);
            }
            let hops = label.edges.len();
            if best.get(&(label.node, hops)).is_some_and(|b| b < &label) {
                continue;
            }

            for (next, mechanism) in ctx.neighbors(label.node, Direction::Outgoing) {
                if excluded_edges.contains(&mechanism.id) || excluded_nodes.contains(&next) {
                    continue;
                }
                match self.to_end.get(&next) {
                    Some(&remaining) if hops + 1 + remaining <= budget => {}
                    _ => continue,
                }
                let mut edges = label.edges.clone();
                edges.push(mechanism);
                let candidate = Label {
                    cost: label.cost + edge_cost(ctx, mechanism),
                    edges,
                    node: next,
                };
                let state = (next, hops + 1);
                let is_better = best.get(&state).map_or(true, |b| &candidate < b);
                if is_better {
                    best.insert(state, candidate.clone());
                    heap.push(std::cmp::Reverse(candidate));
                }
            }
        }

        None
    }
}

fn edge_cost(ctx: &SearchContext<'_>, mechanism: &Mechanism) -> f64 {
    -ctx.weight(mechanism).ln()
}

fn node_of(ctx: &SearchContext<'_>, id: &str) -> Option<NodeIndex> {
    ctx.graph.index_of(id)
}

fn edge_ids(edges: &[&Mechanism]) -> Vec<EdgeId> {
    edges.iter().map(|m| m.id.clone()).collect()
}

fn same_ids(a: &[&Mechanism], b: &[&Mechanism]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id == y.id)
}

/// A path from some origin, ordered by (cost, hop count, edge ids).
#[derive(Debug, Clone)]
struct Label<'g> {
    cost: f64,
    edges: Vec<&'g Mechanism>,
    node: NodeIndex,
}

impl<'g> Label<'g> {
    fn from_edges(ctx: &SearchContext<'g>, edges: Vec<&'g Mechanism>) -> Self {
        let cost = edges.iter().fold(0.0, |acc, m| acc + edge_cost(ctx, m));
        let node = edges
            .last()
            .and_then(|m| node_of(ctx, m.target.as_str()))
            .unwrap_or(ctx.end);
        Self { cost, edges, node }
    }
}

impl PartialEq for Label<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label<'_> {}

impl PartialOrd for Label<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.edges.len().cmp(&other.edges.len()))
            .then_with(|| cmp_edge_ids(&self.edges, &other.edges))
    }
}
