//! Multi-source reverse BFS from the target factors.

use std::collections::BTreeSet;
use std::time::Instant;

use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::tracing::metrics;
use mechnet_core::types::{EdgeId, FxHashMap};
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::types::{Subgraph, SubgraphNode, SubgraphReason, SubgraphSummary, UpstreamQuery};
use crate::graph::MechanismGraph;

/// Walk incoming mechanisms from every target at once, up to
/// `query.max_degrees` hops.
///
/// Each node keeps the smallest degree from any target. Filters are checked
/// before an edge is followed, so a filtered edge never shortens a degree.
/// A mechanism is in the result iff its target was expanded and it passed
/// the filters. The frontier is sorted by node id at every level, so equal
/// inputs give equal subgraphs.
#[tracing::instrument(
    skip_all,
    fields(
        targets = query.targets.len(),
        max_degrees = query.max_degrees,
        traversal_time_us = tracing::field::Empty,
        nodes_visited = tracing::field::Empty,
    )
)]
pub fn explore_upstream(graph: &MechanismGraph, query: &UpstreamQuery) -> MechnetResult<Subgraph> {
    let timer = Instant::now();
    let targets: BTreeSet<&str> = query.targets.iter().map(|t| t.as_str()).collect();
    if targets.is_empty() {
        return Ok(Subgraph {
            reason: Some(SubgraphReason::NoTargets),
            ..Subgraph::default()
        });
    }

    let mut degree: FxHashMap<NodeIndex, usize> = FxHashMap::default();
    let mut frontier: Vec<NodeIndex> = Vec::with_capacity(targets.len());
    for id in &targets {
        let idx = graph
            .index_of(id)
            .ok_or_else(|| MechanismError::node_not_found(*id))?;
        degree.insert(idx, 0);
        frontier.push(idx);
    }

    let mut edges: BTreeSet<EdgeId> = BTreeSet::new();
    for level in 0..query.max_degrees {
        if frontier.is_empty() {
            break;
        }
        let mut next: Vec<NodeIndex> = Vec::new();
        for &node in &frontier {
            for (source, mechanism) in graph.adjacent(node, Direction::Incoming) {
                if !query.follows(mechanism) {
                    continue;
                }
                edges.insert(mechanism.id.clone());
                if !degree.contains_key(&source) {
                    degree.insert(source, level + 1);
                    next.push(source);
                }
            }
        }
        next.sort_by(|a, b| graph.node_at(*a).id.cmp(&graph.node_at(*b).id));
        frontier = next;
    }

    let mut nodes: Vec<SubgraphNode> = degree
        .into_iter()
        .map(|(idx, degree)| {
            let node = graph.node_at(idx);
            SubgraphNode {
                id: node.id.clone(),
                degree,
                scale: node.scale,
                category: node.category,
                is_policy_lever: node.is_policy_lever_tier(),
            }
        })
        .collect();
    nodes.sort_by(|a, b| a.degree.cmp(&b.degree).then_with(|| a.id.cmp(&b.id)));

    let edges: Vec<EdgeId> = edges.into_iter().collect();
    let summary = summarize(&nodes, edges.len());

    let span = tracing::Span::current();
    span.record(metrics::TRAVERSAL_TIME, timer.elapsed().as_micros() as u64);
    span.record(metrics::NODES_VISITED, nodes.len() as u64);
    tracing::debug!(
        nodes = summary.node_count,
        edges = summary.edge_count,
        levers = summary.policy_lever_count,
        "upstream traversal complete"
    );

    Ok(Subgraph {
        nodes,
        edges,
        summary,
        reason: None,
    })
}

fn summarize(nodes: &[SubgraphNode], edge_count: usize) -> SubgraphSummary {
    let total_degree: usize = nodes.iter().map(|n| n.degree).sum();
    let average_degree = if nodes.is_empty() {
        0.0
    } else {
        total_degree as f64 / nodes.len() as f64
    };
    SubgraphSummary {
        node_count: nodes.len(),
        edge_count,
        average_degree,
        policy_lever_count: nodes.iter().filter(|n| n.is_policy_lever).count(),
        max_degree_reached: nodes.iter().map(|n| n.degree).max().unwrap_or(0),
    }
}
