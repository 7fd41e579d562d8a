// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

#[cfg(test)]
#[macro_use]
pub(crate) mod fixtures;

mod astar;
mod dijkstra;
mod error;
mod queue;

pub use astar::find_route_astar;
pub use dijkstra::find_route_dijkstra;
pub use error::{SearchError, DEFAULT_STEP_LIMIT};

/// A route found by [find_route_dijkstra] or [find_route_astar].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ids of visited nodes, starting with the start node and ending with the goal node.
    pub nodes: Vec<i64>,

    /// Sum of effective weights of all traversed edges.
    pub cost: f64,
}
