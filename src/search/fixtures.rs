// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Test networks shared by the search tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{earth_distance, Condition, EdgeRecord, Graph, NetworkSnapshot, Node};

macro_rules! assert_almost_eq {
    ($a:expr, $b:expr) => {
        assert!(
            (($a - $b).abs() < 1e-6),
            "assertion failed: {} ≈ {}",
            $a,
            $b
        )
    };
}

pub(crate) fn two_way(id: i64, from: i64, to: i64, length: f64) -> EdgeRecord {
    EdgeRecord {
        id,
        from,
        to,
        length,
        one_way: false,
        condition: Condition::Normal,
    }
}

/// 1 ── 2 ── 3, each 100 m long.
pub(crate) fn scenario_a() -> NetworkSnapshot {
    NetworkSnapshot::new(
        [
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.001),
            Node::new(3, 0.001, 0.001),
        ],
        [two_way(1, 1, 2, 100.0), two_way(2, 2, 3, 100.0)],
    )
}

/// 4 ── 3
/// ↓    │
/// 1 ── 2
///
/// All edges are 120 m long; 4 → 1 is one-way.
pub(crate) fn square() -> NetworkSnapshot {
    NetworkSnapshot::new(
        [
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.001),
            Node::new(3, 0.001, 0.001),
            Node::new(4, 0.001, 0.0),
        ],
        [
            two_way(1, 1, 2, 120.0),
            two_way(2, 2, 3, 120.0),
            two_way(3, 3, 4, 120.0),
            EdgeRecord {
                one_way: true,
                ..two_way(4, 4, 1, 120.0)
            },
        ],
    )
}

///   2
///  / \
/// 1   4
///  \ /
///   3
///
/// The route over 2 (edges 10 and 11) is 320 m, the route over 3 (12 and 13) is 340 m.
pub(crate) fn diamond() -> NetworkSnapshot {
    NetworkSnapshot::new(
        [
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.001, 0.001),
            Node::new(3, -0.001, 0.001),
            Node::new(4, 0.0, 0.002),
        ],
        [
            two_way(10, 1, 2, 160.0),
            two_way(11, 2, 4, 160.0),
            two_way(12, 1, 3, 170.0),
            two_way(13, 3, 4, 170.0),
        ],
    )
}

/// Builds a pseudo-random network with node ids `0..nodes`.
///
/// Every edge is at least as long as the crow-flies distance between its endpoints,
/// so the A* heuristic stays admissible.
pub(crate) fn random_network(seed: u64, nodes: i64, edges: i64) -> NetworkSnapshot {
    let mut rng = SmallRng::seed_from_u64(seed);

    let node_list: Vec<Node> = (0..nodes)
        .map(|id| {
            let lat = (id / 3) as f64 * 0.001 + rng.gen::<f64>() * 0.0005;
            let lon = (id % 3) as f64 * 0.001 + rng.gen::<f64>() * 0.0005;
            Node::new(id, lat, lon)
        })
        .collect();

    let edge_list: Vec<EdgeRecord> = (0..edges)
        .map(|id| {
            let a = node_list[rng.gen_range(0..node_list.len())];
            let b = node_list[rng.gen_range(0..node_list.len())];
            let crow_flies = earth_distance(a.lat, a.lon, b.lat, b.lon);
            EdgeRecord {
                id,
                from: a.id,
                to: b.id,
                length: crow_flies * (1.0 + rng.gen::<f64>()),
                one_way: rng.gen_range(0..4) == 0,
                condition: Condition::ALL[rng.gen_range(0..Condition::ALL.len())],
            }
        })
        .collect();

    NetworkSnapshot::new(node_list, edge_list)
}

/// Finds the cheapest route cost by enumerating all simple paths.
pub(crate) fn brute_force_cost(g: &Graph, from: i64, to: i64) -> f64 {
    fn visit(g: &Graph, at: i64, to: i64, cost: f64, visited: &mut Vec<i64>) -> f64 {
        if at == to {
            return cost;
        }

        let mut best = f64::INFINITY;
        for edge in g.get_edges(at) {
            if visited.contains(&edge.to) {
                continue;
            }
            visited.push(edge.to);
            best = best.min(visit(g, edge.to, to, cost + edge.cost, visited));
            visited.pop();
        }
        best
    }

    visit(g, from, to, 0.0, &mut vec![from])
}

/// Sums the cheapest edge costs along a sequence of nodes.
pub(crate) fn path_cost(g: &Graph, nodes: &[i64]) -> f64 {
    nodes.windows(2).map(|w| g.get_edge(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_network_is_reproducible() {
        let a = random_network(7, 9, 15);
        assert_eq!(a, random_network(7, 9, 15));
        assert_ne!(a, random_network(8, 9, 15));

        assert_eq!(a.len(), 9);
        assert_eq!(a.edge_count(), 15);
        for edge in a.edges() {
            let from = a.get_node(edge.from).unwrap();
            let to = a.get_node(edge.to).unwrap();
            assert!(edge.length >= earth_distance(from.lat, from.lon, to.lat, to.lon));
        }
    }
}
