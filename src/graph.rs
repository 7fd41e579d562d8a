// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Represents the road network as a set of [Nodes](Node)
/// and weighted, directed [Edges](Edge) between them.
///
/// A graph is a pure projection of a [NetworkSnapshot](crate::NetworkSnapshot),
/// created with [build_graph](crate::build_graph). It doesn't reference the snapshot
/// it was built from; condition edits only take effect after a rebuild.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, (Node, Vec<Edge>)>);

impl Graph {
    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the total number of directed edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, edges)| edges.len()).sum()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.values().map(|(node, _)| node)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Returns `true` if a node with the provided id exists.
    pub fn contains_node(&self, id: i64) -> bool {
        self.0.contains_key(&id)
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id, in insertion order.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.0
            .get(&from_id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the cost of the cheapest [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> f64 {
        self.get_edges(from_id)
            .iter()
            .filter(|edge| edge.to == to_id)
            .map(|edge| edge.cost)
            .fold(f64::INFINITY, f64::min)
    }

    /// Adds a [Node] without any edges. An existing node with the same id is
    /// replaced, but its outgoing edges are preserved.
    pub(crate) fn insert_node(&mut self, node: Node) {
        match self.0.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                e.get_mut().0 = node;
            }
        }
    }

    /// Appends an [Edge] to the outgoing edges of a node.
    ///
    /// Returns `false` (and does nothing) if either endpoint is not in the graph.
    pub(crate) fn push_edge(&mut self, from_id: i64, edge: Edge) -> bool {
        if !self.0.contains_key(&edge.to) {
            return false;
        }

        if let Some((_, edges)) = self.0.get_mut(&from_id) {
            edges.push(edge);
            true
        } else {
            false
        }
    }
}
