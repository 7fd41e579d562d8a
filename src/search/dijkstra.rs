// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::queue::{reconstruct_path, Queue};
use crate::{Edge, Graph, Route, SearchError};

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the cheapest route between two nodes in the provided graph.
///
/// Returns [SearchError::NoRoute] if the goal is not reachable from the start,
/// and [SearchError::InvalidReference] if either node is not in the graph.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [SearchError::StepLimitExceeded]. The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route_dijkstra(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<Route, SearchError> {
    if !g.contains_node(from_id) {
        return Err(SearchError::InvalidReference(from_id));
    }
    if !g.contains_node(to_id) {
        return Err(SearchError::InvalidReference(to_id));
    }

    let mut queue = Queue::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(from_id, 0.0, 0.0);
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            log::trace!("dijkstra: reached {} after {} expansions", to_id, steps);
            return Ok(Route {
                nodes: reconstruct_path(&came_from, to_id),
                cost: item.cost,
            });
        }

        // Lazy deletion: the node might have been pushed again with a lower cost.
        if item.cost > known_costs.get(&item.at).cloned().unwrap_or(f64::INFINITY) {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            return Err(SearchError::StepLimitExceeded);
        }

        for &Edge {
            to: neighbor_id,
            cost: edge_cost,
        } in g.get_edges(item.at)
        {
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .cloned()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(neighbor_id, neighbor_cost, neighbor_cost);
        }
    }

    log::trace!("dijkstra: {} unreachable from {} after {} expansions", to_id, from_id, steps);
    Err(SearchError::NoRoute {
        from: from_id,
        to: to_id,
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::{build_graph, Condition, DEFAULT_STEP_LIMIT};

    #[test]
    fn scenario_a_two_hops() {
        let g = build_graph(&scenario_a());
        let route = find_route_dijkstra(&g, 1, 3, DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route.nodes, vec![1, 2, 3]);
        assert_almost_eq!(route.cost, 200.0);
    }

    #[test]
    fn scenario_b_blocked_without_alternative() {
        let n = scenario_a().with_condition(1, Condition::Blocked).unwrap();
        let g = build_graph(&n);
        let err = find_route_dijkstra(&g, 1, 3, DEFAULT_STEP_LIMIT).unwrap_err();
        assert_eq!(err, SearchError::NoRoute { from: 1, to: 3 });
        assert!(err.cost().is_infinite());
    }

    #[test]
    fn start_equals_goal() {
        let g = build_graph(&scenario_a());
        let route = find_route_dijkstra(&g, 2, 2, DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route.nodes, vec![2]);
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn invalid_reference() {
        let g = build_graph(&scenario_a());
        assert_eq!(
            find_route_dijkstra(&g, 1, 42, DEFAULT_STEP_LIMIT),
            Err(SearchError::InvalidReference(42)),
        );
        assert_eq!(
            find_route_dijkstra(&g, 42, 1, DEFAULT_STEP_LIMIT),
            Err(SearchError::InvalidReference(42)),
        );
    }

    #[test]
    fn one_way_is_respected() {
        let g = build_graph(&square());
        // 1 → 4 directly is one-way 4 → 1, so the route must go around
        let route = find_route_dijkstra(&g, 1, 4, DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route.nodes, vec![1, 2, 3, 4]);

        let back = find_route_dijkstra(&g, 4, 1, DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(back.nodes, vec![4, 1]);
    }

    #[test]
    fn reroutes_around_congestion() {
        let n = diamond();
        let g = build_graph(&n);
        assert_eq!(
            find_route_dijkstra(&g, 1, 4, DEFAULT_STEP_LIMIT).unwrap().nodes,
            vec![1, 2, 4],
        );

        let g = build_graph(&n.with_condition(10, Condition::Flooded).unwrap());
        let route = find_route_dijkstra(&g, 1, 4, DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route.nodes, vec![1, 3, 4]);
    }

    #[test]
    fn reroutes_around_block() {
        let n = diamond().with_condition(11, Condition::Blocked).unwrap();
        let g = build_graph(&n);
        assert_eq!(
            find_route_dijkstra(&g, 1, 4, DEFAULT_STEP_LIMIT).unwrap().nodes,
            vec![1, 3, 4],
        );
    }

    #[test]
    fn step_limit() {
        let g = build_graph(&scenario_a());
        assert_eq!(
            find_route_dijkstra(&g, 1, 3, 1),
            Err(SearchError::StepLimitExceeded),
        );
        assert!(find_route_dijkstra(&g, 1, 3, 2).is_ok());
    }

    #[test]
    fn matches_brute_force_on_random_graphs() {
        for seed in 1..=40 {
            let g = build_graph(&random_network(seed, 7, 12));
            for from in 0..7 {
                for to in 0..7 {
                    let expected = brute_force_cost(&g, from, to);
                    match find_route_dijkstra(&g, from, to, DEFAULT_STEP_LIMIT) {
                        Ok(route) => {
                            assert_almost_eq!(route.cost, expected);
                            assert_eq!(route.nodes.first(), Some(&from));
                            assert_eq!(route.nodes.last(), Some(&to));
                            assert_almost_eq!(path_cost(&g, &route.nodes), route.cost);
                        }
                        Err(SearchError::NoRoute { .. }) => assert!(expected.is_infinite()),
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            }
        }
    }
}
