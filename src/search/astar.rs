// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::queue::{reconstruct_path, Queue};
use crate::{earth_distance, Edge, Graph, Route, SearchError};

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the cheapest route between two nodes in the provided graph.
///
/// The heuristic is the great-circle distance to the goal node, in meters.
/// It never overestimates as long as every edge costs at least its crow-flies
/// length, which holds for graphs built with [build_graph](crate::build_graph)
/// from edges whose length is their real, physical length. With such graphs
/// the result is as cheap as the one of [find_route_dijkstra](crate::find_route_dijkstra).
///
/// Returns [SearchError::NoRoute] if the goal is not reachable from the start,
/// and [SearchError::InvalidReference] if either node is not in the graph.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [SearchError::StepLimitExceeded]. The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route_astar(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<Route, SearchError> {
    let from_node = g
        .get_node(from_id)
        .ok_or(SearchError::InvalidReference(from_id))?;
    let to_node = g
        .get_node(to_id)
        .ok_or(SearchError::InvalidReference(to_id))?;

    let heuristic = |lat: f64, lon: f64| earth_distance(lat, lon, to_node.lat, to_node.lon);

    let mut queue = Queue::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(from_id, 0.0, heuristic(from_node.lat, from_node.lon));
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        // Goal is checked on dequeue, not on discovery
        if item.at == to_id {
            log::trace!("astar: reached {} after {} expansions", to_id, steps);
            return Ok(Route {
                nodes: reconstruct_path(&came_from, to_id),
                cost: item.cost,
            });
        }

        // Contrary to the wikipedia definition, we might keep multiple items in the queue for the same node.
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
            // Graph::push_edge guarantees that the neighbor exists
            let Some(neighbor) = g.get_node(neighbor_id) else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .cloned()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(
                neighbor_id,
                neighbor_cost,
                neighbor_cost + heuristic(neighbor.lat, neighbor.lon),
            );
        }
    }

    log::trace!("astar: {} unreachable from {} after {} expansions", to_id, from_id, steps);
    Err(SearchError::NoRoute {
        from: from_id,
        to: to_id,
    })
}
