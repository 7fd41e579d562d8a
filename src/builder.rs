// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, EdgeRecord, Graph, NetworkSnapshot};

/// Returns the routing cost of traversing an [EdgeRecord], that is its length
/// scaled by the multiplier of its [Condition](crate::Condition).
///
/// Returns `None` for edges which can't be traversed at all.
pub fn effective_weight(edge: &EdgeRecord) -> Option<f64> {
    edge.condition.multiplier().map(|m| edge.length * m)
}

/// Converts a [NetworkSnapshot] into a routing [Graph].
///
/// Every node of the snapshot becomes a graph node (possibly without any edges).
/// Every passable edge record adds a forward edge and, unless it is one-way,
/// a backward edge with the same cost. Blocked edges and edges referencing
/// unknown nodes are skipped.
///
/// The weight of an edge depends only on that edge's own record, so the result
/// doesn't depend on the order of edges in the snapshot, except for the order
/// of parallel edges in [Graph::get_edges].
pub fn build_graph(network: &NetworkSnapshot) -> Graph {
    let mut g = Graph::default();
    for &node in network.nodes() {
        g.insert_node(node);
    }

    let mut blocked: usize = 0;
    let mut dangling: usize = 0;

    for edge in network.edges() {
        let Some(cost) = effective_weight(edge) else {
            blocked += 1;
            continue;
        };

        if !g.push_edge(edge.from, Edge { to: edge.to, cost }) {
            log::debug!(
                "dropping edge {}: endpoint {} or {} is not a known node",
                edge.id,
                edge.from,
                edge.to
            );
            dangling += 1;
            continue;
        }

        if !edge.one_way {
            g.push_edge(edge.to, Edge { to: edge.from, cost });
        }
    }

    log::debug!(
        "built graph with {} nodes and {} directed edges ({} blocked, {} dangling edge records skipped)",
        g.len(),
        g.edge_count(),
        blocked,
        dangling,
    );

    g
}
