// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use crate::{
    build_graph, find_route_astar, find_route_dijkstra, nearest_edge, nearest_node, Condition,
    EdgeRecord, GeoPoint, Graph, NetworkError, NetworkSnapshot, NetworkStore, Route, SearchError,
    StoreError, DEFAULT_STEP_LIMIT,
};

/// Shortest-path algorithm used by [RoutingEngine::route].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// [find_route_dijkstra]
    Dijkstra,

    /// [find_route_astar]
    #[default]
    AStar,
}

impl Algorithm {
    /// Runs this algorithm over a [Graph].
    pub fn find_route(
        self,
        g: &Graph,
        from_id: i64,
        to_id: i64,
        step_limit: usize,
    ) -> Result<Route, SearchError> {
        match self {
            Self::Dijkstra => find_route_dijkstra(g, from_id, to_id, step_limit),
            Self::AStar => find_route_astar(g, from_id, to_id, step_limit),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
        })
    }
}

/// Returned when a string doesn't name any [Algorithm].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown routing algorithm: {0:?}")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "a*" | "a-star" => Ok(Self::AStar),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Additional controls for [RoutingEngine::route].
///
/// The default caps a search at [DEFAULT_STEP_LIMIT] node expansions. Set
/// `step_limit` to `usize::MAX` for an uncapped search, which only stops
/// once the goal is reached or every reachable node was expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub algorithm: Algorithm,

    /// Maximum number of node expansions, see [DEFAULT_STEP_LIMIT].
    /// `usize::MAX` disables the limit.
    pub step_limit: usize,
}

impl SearchOptions {
    /// Options for a search without a step limit.
    pub const fn unbounded(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            step_limit: usize::MAX,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

/// A route between two positions, as returned by [RoutingEngine::route].
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Ids of traversed nodes, from start to goal.
    pub nodes: Vec<i64>,

    /// Positions of traversed nodes, from start to goal.
    pub points: Vec<GeoPoint>,

    /// Sum of effective weights of all traversed edges.
    pub cost: f64,
}

/// Error conditions which may occur during [RoutingEngine] operations.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("the road network has no nodes")]
    EmptyNetwork,

    #[error("no edge near the given position")]
    NoNearbyEdge,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A [NetworkSnapshot] together with the [Graph] built from it.
///
/// An engine never changes. Condition edits produce a new engine, while the
/// previous one (and any route search running on it) stays valid.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    network: NetworkSnapshot,
    graph: Graph,
}

impl RoutingEngine {
    /// Builds the routing [Graph] for a [NetworkSnapshot].
    pub fn new(network: NetworkSnapshot) -> Self {
        let graph = build_graph(&network);
        Self { network, graph }
    }

    /// Loads the network from a [NetworkStore] and builds its routing [Graph].
    pub fn load<S: NetworkStore + ?Sized>(store: &S) -> Result<Self, RouteError> {
        Ok(Self::new(store.load_network()?))
    }

    pub fn network(&self) -> &NetworkSnapshot {
        &self.network
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Finds a route between the nodes closest to `start` and `goal`.
    pub fn route(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        options: &SearchOptions,
    ) -> Result<RoutePath, RouteError> {
        let nodes = self.network.nodes();
        let from_id = nearest_node(start, nodes).ok_or(RouteError::EmptyNetwork)?;
        let to_id = nearest_node(goal, nodes).ok_or(RouteError::EmptyNetwork)?;

        log::debug!(
            "routing ({}, {}) → ({}, {}) snapped to nodes {} → {} using {}",
            start.lat,
            start.lon,
            goal.lat,
            goal.lon,
            from_id,
            to_id,
            options.algorithm,
        );
        self.route_between(from_id, to_id, options)
    }

    /// Finds a route between two nodes.
    pub fn route_between(
        &self,
        from_id: i64,
        to_id: i64,
        options: &SearchOptions,
    ) -> Result<RoutePath, RouteError> {
        let route = options
            .algorithm
            .find_route(&self.graph, from_id, to_id, options.step_limit)?;

        let points = route
            .nodes
            .iter()
            .map(|&id| {
                self.graph
                    .get_node(id)
                    .map(|n| n.point())
                    .ok_or(SearchError::InvalidReference(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RoutePath {
            nodes: route.nodes,
            points,
            cost: route.cost,
        })
    }

    /// Finds the edge closest to `point`, see [nearest_edge].
    pub fn nearest_edge(&self, point: GeoPoint) -> Option<&EdgeRecord> {
        nearest_edge(point, &self.network)
    }

    /// Returns a new engine with the conditions of the given edges replaced.
    /// Nothing is persisted.
    pub fn with_conditions(&self, edge_ids: &[i64], condition: Condition) -> Result<Self, RouteError> {
        let network = self
            .network
            .with_conditions(edge_ids.iter().map(|&id| (id, condition)))?;
        Ok(Self::new(network))
    }

    /// Sets the condition of the edge closest to `point`.
    ///
    /// The edit is first persisted in the `store`, and only then applied to a copy
    /// of this engine's network. Returns the id of the edited edge and the new engine.
    pub fn apply_condition<S: NetworkStore + ?Sized>(
        &self,
        store: &S,
        point: GeoPoint,
        condition: Condition,
    ) -> Result<(i64, Self), RouteError> {
        let edge_id = self.nearest_edge(point).ok_or(RouteError::NoNearbyEdge)?.id;
        let engine = self.apply_conditions(store, &[edge_id], condition)?;
        Ok((edge_id, engine))
    }

    /// Sets the condition of multiple edges at once, persisting it in the `store`
    /// before applying it to a copy of this engine's network.
    pub fn apply_conditions<S: NetworkStore + ?Sized>(
        &self,
        store: &S,
        edge_ids: &[i64],
        condition: Condition,
    ) -> Result<Self, RouteError> {
        if let Some(&unknown) = edge_ids.iter().find(|&&id| self.network.get_edge(id).is_none()) {
            return Err(NetworkError::UnknownEdge(unknown).into());
        }

        store.set_edge_conditions(edge_ids, condition)?;
        log::info!("set condition of edges {:?} to {}", edge_ids, condition);
        self.with_conditions(edge_ids, condition)
    }
}
