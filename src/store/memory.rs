// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Mutex;

use super::{NetworkStore, StoreError};
use crate::{Condition, NetworkError, NetworkSnapshot};

/// [NetworkStore] keeping the network in process memory.
///
/// Edits replace the held snapshot as a whole, so snapshots returned by earlier
/// [load_network](NetworkStore::load_network) calls are never affected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    network: Mutex<NetworkSnapshot>,
}

impl MemoryStore {
    pub fn new(network: NetworkSnapshot) -> Self {
        Self {
            network: Mutex::new(network),
        }
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&NetworkSnapshot) -> Result<NetworkSnapshot, NetworkError>,
    {
        let mut network = self.network.lock().map_err(|_| StoreError::Poisoned)?;
        let updated = f(&*network)
            .map_err(|NetworkError::UnknownEdge(id)| StoreError::UnknownEdge(id))?;
        *network = updated;
        Ok(())
    }
}

impl NetworkStore for MemoryStore {
    fn load_network(&self) -> Result<NetworkSnapshot, StoreError> {
        let network = self.network.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(network.clone())
    }

    fn set_edge_condition(&self, edge_id: i64, condition: Condition) -> Result<(), StoreError> {
        self.update(|n| n.with_condition(edge_id, condition))
    }

    fn set_edge_conditions(&self, edge_ids: &[i64], condition: Condition) -> Result<(), StoreError> {
        self.update(|n| n.with_conditions(edge_ids.iter().map(|&id| (id, condition))))
    }
}
