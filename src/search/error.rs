// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Recommended number of allowed node expansions in [find_route_dijkstra](crate::find_route_dijkstra)
/// and [find_route_astar](crate::find_route_astar) before [SearchError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_route_dijkstra](crate::find_route_dijkstra)
/// or [find_route_astar](crate::find_route_astar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The start or goal node doesn't exist in a graph.
    InvalidReference(i64),

    /// All nodes reachable from the start were expanded without reaching the goal.
    NoRoute { from: i64, to: i64 },

    /// Route search has exceeded its limit of steps.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole reachable component,
    /// and the step limit is the only bound on that work.
    StepLimitExceeded,
}

impl SearchError {
    /// Cost associated with a failed search, which is always infinite.
    pub fn cost(&self) -> f64 {
        f64::INFINITY
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(node_id) => write!(f, "invalid node: {}", node_id),
            Self::NoRoute { from, to } => write!(f, "no route from {} to {}", from, to),
            Self::StepLimitExceeded => write!(f, "step limit exceeded"),
        }
    }
}

impl std::error::Error for SearchError {}
