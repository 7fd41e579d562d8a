// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;

use crate::{Condition, GeoPoint, Node};

/// A road segment, as loaded from persistent storage.
///
/// `length` is the physical length in meters and must not be negative.
/// Unless `one_way` is set, the segment may be traversed in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    pub length: f64,
    pub one_way: bool,
    pub condition: Condition,
}

/// Errors returned when editing a [NetworkSnapshot].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown edge: {0}")]
    UnknownEdge(i64),
}

#[derive(Debug, Default, PartialEq)]
struct NodeTable {
    nodes: Vec<Node>,
    index: HashMap<i64, usize>,
}

impl NodeTable {
    fn new<I: IntoIterator<Item = Node>>(nodes: I) -> Self {
        let mut table = Self::default();
        for node in nodes {
            match table.index.entry(node.id) {
                Entry::Vacant(e) => {
                    e.insert(table.nodes.len());
                    table.nodes.push(node);
                }
                Entry::Occupied(e) => {
                    table.nodes[*e.get()] = node;
                }
            }
        }
        table
    }
}

/// Immutable view of the road network: its [Nodes](Node) and [EdgeRecords](EdgeRecord).
///
/// Snapshots are cheap to clone. Condition edits never modify a snapshot in place;
/// instead [with_condition](NetworkSnapshot::with_condition) returns a new one,
/// so that graphs built from (or searches running over) an older snapshot
/// never observe a half-applied edit.
///
/// Nodes are kept in their load order, which decides ties in
/// [nearest_node](crate::nearest_node). If a node id is repeated, the later
/// coordinate wins while the earlier position is kept. Edge ids are expected
/// to be unique; lookups by id resolve to the first matching record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSnapshot {
    nodes: Arc<NodeTable>,
    edges: Arc<Vec<EdgeRecord>>,
    edge_index: Arc<HashMap<i64, usize>>,
}

impl NetworkSnapshot {
    /// Creates a snapshot from raw node and edge records.
    ///
    /// No validation is performed. Edges referencing unknown nodes are kept here
    /// and only dropped once a [Graph](crate::Graph) is built.
    pub fn new<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let edges: Vec<EdgeRecord> = edges.into_iter().collect();
        let mut edge_index = HashMap::with_capacity(edges.len());
        for (idx, edge) in edges.iter().enumerate() {
            edge_index.entry(edge.id).or_insert(idx);
        }

        Self {
            nodes: Arc::new(NodeTable::new(nodes)),
            edges: Arc::new(edges),
            edge_index: Arc::new(edge_index),
        }
    }

    /// Returns the number of nodes in the network.
    pub fn len(&self) -> usize {
        self.nodes.nodes.len()
    }

    /// Returns `true` if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.nodes.is_empty()
    }

    /// Returns the number of edge records in the network.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns all [Nodes](Node), in load order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes.nodes
    }

    /// Returns all [EdgeRecords](EdgeRecord), in load order.
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.nodes
            .index
            .get(&id)
            .map(|&idx| self.nodes.nodes[idx])
    }

    /// Returns `true` if a node with the provided id exists.
    pub fn contains_node(&self, id: i64) -> bool {
        self.nodes.index.contains_key(&id)
    }

    /// Retrieves an [EdgeRecord] with the provided id.
    pub fn get_edge(&self, id: i64) -> Option<&EdgeRecord> {
        self.edge_index.get(&id).map(|&idx| &self.edges[idx])
    }

    /// Returns the mean position of all nodes, or `None` if the network is empty.
    pub fn center(&self) -> Option<GeoPoint> {
        if self.is_empty() {
            return None;
        }

        let (lat_sum, lon_sum) = self
            .nodes()
            .iter()
            .fold((0.0, 0.0), |(lat, lon), n| (lat + n.lat, lon + n.lon));
        let count = self.len() as f64;
        Some(GeoPoint::new(lat_sum / count, lon_sum / count))
    }

    /// Returns a copy of this snapshot with the condition of a single edge replaced.
    ///
    /// `self` is left untouched; node data is shared between both snapshots.
    pub fn with_condition(&self, edge_id: i64, condition: Condition) -> Result<Self, NetworkError> {
        self.with_conditions([(edge_id, condition)])
    }

    /// Returns a copy of this snapshot with the conditions of multiple edges replaced.
    ///
    /// The update is all-or-nothing: if any edge is unknown, no snapshot is produced.
    /// If an edge appears multiple times, the last condition wins.
    pub fn with_conditions<I>(&self, updates: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (i64, Condition)>,
    {
        let mut edges = Vec::clone(&self.edges);
        for (edge_id, condition) in updates {
            let &idx = self
                .edge_index
                .get(&edge_id)
                .ok_or(NetworkError::UnknownEdge(edge_id))?;
            edges[idx].condition = condition;
        }

        Ok(Self {
            nodes: Arc::clone(&self.nodes),
            edges: Arc::new(edges),
            edge_index: Arc::clone(&self.edge_index),
        })
    }
}
