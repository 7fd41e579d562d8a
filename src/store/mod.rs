// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Persistent storage of road networks and their conditions.
//!
//! Routing never talks to storage directly: a [NetworkStore] produces complete
//! [NetworkSnapshots](crate::NetworkSnapshot) and records condition edits,
//! everything else happens in memory.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::{Condition, NetworkSnapshot};

/// Error conditions which may occur when accessing a [NetworkStore].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored record can't be converted into a [Node](crate::Node)
    /// or an [EdgeRecord](crate::EdgeRecord).
    #[error("malformed {table} record {id}: {reason}")]
    Malformed {
        table: &'static str,
        id: i64,
        reason: String,
    },

    #[error("unknown edge: {0}")]
    UnknownEdge(i64),

    #[error("store lock poisoned")]
    Poisoned,

    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Source of road network data and sink for condition edits.
///
/// Implementations must return complete, self-consistent snapshots from
/// [load_network](NetworkStore::load_network); routing never retries failed calls.
pub trait NetworkStore {
    /// Loads all nodes and edges.
    fn load_network(&self) -> Result<NetworkSnapshot, StoreError>;

    /// Persists a new condition of a single edge.
    fn set_edge_condition(&self, edge_id: i64, condition: Condition) -> Result<(), StoreError>;

    /// Persists a new condition of multiple edges.
    ///
    /// The default implementation calls [set_edge_condition](NetworkStore::set_edge_condition)
    /// for every edge, stopping at the first error.
    fn set_edge_conditions(&self, edge_ids: &[i64], condition: Condition) -> Result<(), StoreError> {
        edge_ids
            .iter()
            .try_for_each(|&edge_id| self.set_edge_condition(edge_id, condition))
    }
}

/// Checks a node's coordinates at the load boundary.
#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub(crate) fn validate_node(id: i64, lat: f64, lon: f64) -> Result<(), StoreError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(StoreError::Malformed {
            table: "nodes",
            id,
            reason: format!("invalid latitude {}", lat),
        });
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(StoreError::Malformed {
            table: "nodes",
            id,
            reason: format!("invalid longitude {}", lon),
        });
    }
    Ok(())
}

/// Checks an edge's length at the load boundary.
#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub(crate) fn validate_length(id: i64, length: f64) -> Result<(), StoreError> {
    if !length.is_finite() || length < 0.0 {
        return Err(StoreError::Malformed {
            table: "edges",
            id,
            reason: format!("invalid length {}", length),
        });
    }
    Ok(())
}
