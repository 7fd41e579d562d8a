// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Condition-aware routing over a small road network.
//!
//! Road segments carry a traffic [Condition] set by an operator. The network is held
//! in an immutable [NetworkSnapshot], converted into a standard weighted directed
//! [Graph] (with each segment's length scaled by its condition), and searched with
//! either Dijkstra's algorithm or A*. Raw coordinates, like clicks on a map, are
//! resolved to nodes and edges with [nearest_node] and [nearest_edge].
//!
//! Persistent storage is abstracted behind [NetworkStore]. An SQLite-backed
//! implementation is available with the `sqlite` feature.
//!
//! # Example
//!
//! ```
//! use condroute::{Condition, EdgeRecord, GeoPoint, NetworkSnapshot, Node, RoutingEngine, SearchOptions};
//!
//! let network = NetworkSnapshot::new(
//!     [Node::new(1, 0.0, 0.0), Node::new(2, 0.0, 0.001), Node::new(3, 0.001, 0.001)],
//!     [
//!         EdgeRecord { id: 1, from: 1, to: 2, length: 120.0, one_way: false, condition: Condition::Normal },
//!         EdgeRecord { id: 2, from: 2, to: 3, length: 120.0, one_way: false, condition: Condition::Congested },
//!     ],
//! );
//!
//! let engine = RoutingEngine::new(network);
//! let route = engine
//!     .route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.001), &SearchOptions::default())
//!     .expect("route should exist");
//!
//! assert_eq!(route.nodes, vec![1, 2, 3]);
//! assert_eq!(route.cost, 360.0);
//! ```

mod builder;
mod condition;
mod distance;
mod graph;
mod network;
mod router;
mod search;
mod spatial;
pub mod store;

pub use builder::{build_graph, effective_weight};
pub use condition::{Condition, ParseConditionError};
pub use distance::{earth_distance, EARTH_RADIUS};
pub use graph::Graph;
pub use network::{EdgeRecord, NetworkError, NetworkSnapshot};
pub use router::{Algorithm, ParseAlgorithmError, RouteError, RoutePath, RoutingEngine, SearchOptions};
pub use search::{find_route_astar, find_route_dijkstra, Route, SearchError, DEFAULT_STEP_LIMIT};
pub use spatial::{
    nearest_edge, nearest_edge_within, nearest_node, nearest_node_haversine, segment_distance_sq,
};
pub use store::{MemoryStore, NetworkStore, StoreError};

#[cfg(feature = "sqlite")]
pub use store::SqliteStore;

/// A position on Earth, in decimal degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Represents a road network vertex: an intersection or a point along a road.
///
/// Ids are opaque and must be stable across loads of the same network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub const fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    /// Returns the position of this node.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Represents an outgoing (one-way) connection from a specific [Node] in a [Graph].
///
/// `cost` is the effective weight of the road segment: its length in meters
/// multiplied by the factor of its [Condition].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub cost: f64,
}
