// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::{validate_length, validate_node, NetworkStore, StoreError};
use crate::{Condition, EdgeRecord, NetworkSnapshot, Node};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    id  INTEGER PRIMARY KEY,
    lat REAL NOT NULL,
    lon REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS edges (
    id        INTEGER PRIMARY KEY,
    from_node INTEGER NOT NULL REFERENCES nodes(id),
    to_node   INTEGER NOT NULL REFERENCES nodes(id),
    length    REAL,
    oneway    INTEGER NOT NULL DEFAULT 0,
    status    TEXT NOT NULL DEFAULT 'normal'
);";

/// [NetworkStore] backed by an SQLite database file.
///
/// Only the path is held; every call opens its own connection and closes it
/// before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Creates the `nodes` and `edges` tables, if they don't exist yet.
    ///
    /// Databases created without the `oneway` column get it added,
    /// with every existing edge marked as two-way.
    pub fn initialize(&self) -> Result<(), StoreError> {
        create_schema(&self.connect()?)
    }

    /// Writes all nodes and edges of a snapshot in a single transaction,
    /// replacing records with the same ids.
    pub fn save_network(&self, network: &NetworkSnapshot) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        create_schema(&conn)?;

        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT OR REPLACE INTO nodes (id, lat, lon) VALUES (?1, ?2, ?3)")?;
            for node in network.nodes() {
                stmt.execute(params![node.id, node.lat, node.lon])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO edges (id, from_node, to_node, length, oneway, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for edge in network.edges() {
                stmt.execute(params![
                    edge.id,
                    edge.from,
                    edge.to,
                    edge.length,
                    edge.one_way,
                    edge.condition.code(),
                ])?;
            }
        }
        tx.commit()?;

        log::info!(
            "saved {} nodes and {} edges to {}",
            network.len(),
            network.edge_count(),
            self.path.display()
        );
        Ok(())
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |r| r.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    if !has_column(conn, "edges", "oneway")? {
        log::info!("adding the oneway column to the edges table");
        conn.execute_batch("ALTER TABLE edges ADD COLUMN oneway INTEGER NOT NULL DEFAULT 0;")?;
    }
    Ok(())
}

fn load_nodes(conn: &Connection) -> Result<Vec<Node>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, lat, lon FROM nodes ORDER BY id")?;
    let rows = stmt.query_map([], |r| Ok(Node::new(r.get(0)?, r.get(1)?, r.get(2)?)))?;

    let mut nodes = Vec::new();
    for row in rows {
        let node = row?;
        validate_node(node.id, node.lat, node.lon)?;
        nodes.push(node);
    }
    Ok(nodes)
}

fn load_edges(conn: &Connection) -> Result<Vec<EdgeRecord>, StoreError> {
    // Edges without the oneway column are all two-way
    let sql = if has_column(conn, "edges", "oneway")? {
        "SELECT id, from_node, to_node, length, oneway, status FROM edges ORDER BY id"
    } else {
        "SELECT id, from_node, to_node, length, 0, status FROM edges ORDER BY id"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, Option<f64>>(3)?,
            r.get::<_, bool>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut edges = Vec::new();
    for row in rows {
        let (id, from, to, length, one_way, status) = row?;

        let length = length.ok_or_else(|| StoreError::Malformed {
            table: "edges",
            id,
            reason: "missing length".to_string(),
        })?;
        validate_length(id, length)?;

        let condition = match status {
            Some(s) => s.parse::<Condition>().map_err(|e| StoreError::Malformed {
                table: "edges",
                id,
                reason: e.to_string(),
            })?,
            None => Condition::Normal,
        };

        edges.push(EdgeRecord {
            id,
            from,
            to,
            length,
            one_way,
            condition,
        });
    }
    Ok(edges)
}

impl NetworkStore for SqliteStore {
    fn load_network(&self) -> Result<NetworkSnapshot, StoreError> {
        let conn = self.connect()?;
        let nodes = load_nodes(&conn)?;
        let edges = load_edges(&conn)?;

        log::info!(
            "loaded {} nodes and {} edges from {}",
            nodes.len(),
            edges.len(),
            self.path.display()
        );
        Ok(NetworkSnapshot::new(nodes, edges))
    }

    fn set_edge_condition(&self, edge_id: i64, condition: Condition) -> Result<(), StoreError> {
        self.set_edge_conditions(&[edge_id], condition)
    }

    fn set_edge_conditions(&self, edge_ids: &[i64], condition: Condition) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached("UPDATE edges SET status = ?1 WHERE id = ?2")?;
            for &edge_id in edge_ids {
                if stmt.execute(params![condition.code(), edge_id])? == 0 {
                    // Dropping the transaction rolls back earlier updates
                    return Err(StoreError::UnknownEdge(edge_id));
                }
            }
        }
        tx.commit()?;

        log::info!("set condition of {} edge(s) to {}", edge_ids.len(), condition);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::{diamond, square};

    fn tmp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteStore::new(dir.path().join("map_data.db"));
        (dir, store)
    }

    #[test]
    fn save_and_load() {
        let (_dir, store) = tmp_store();
        let network = square();
        store.save_network(&network).unwrap();

        let loaded = store.load_network().unwrap();
        assert_eq!(loaded.nodes(), network.nodes());
        assert_eq!(loaded.edges(), network.edges());
    }

    #[test]
    fn set_condition_persists() {
        let (_dir, store) = tmp_store();
        store.save_network(&diamond()).unwrap();

        store.set_edge_condition(11, Condition::Flooded).unwrap();

        let conn = Connection::open(store.path()).unwrap();
        let status: String = conn
            .query_row("SELECT status FROM edges WHERE id = 11", [], |r| r.get(0))
            .unwrap();
        assert_eq!(status, "flood");
        assert_eq!(
            store.load_network().unwrap().get_edge(11).unwrap().condition,
            Condition::Flooded,
        );
    }

    #[test]
    fn unknown_edge_rolls_back_batch() {
        let (_dir, store) = tmp_store();
        store.save_network(&diamond()).unwrap();

        assert!(matches!(
            store.set_edge_conditions(&[10, 404], Condition::Blocked),
            Err(StoreError::UnknownEdge(404))
        ));
        assert_eq!(
            store.load_network().unwrap().get_edge(10).unwrap().condition,
            Condition::Normal,
        );
    }

    #[test]
    fn minimal_schema_defaults() {
        let (_dir, store) = tmp_store();
        store.initialize().unwrap();

        let conn = Connection::open(store.path()).unwrap();
        conn.execute_batch(
            "INSERT INTO nodes (id, lat, lon) VALUES (1, 0.0, 0.0), (2, 0.0, 0.001);
             INSERT INTO edges (id, from_node, to_node, length) VALUES (5, 1, 2, 120.0);",
        )
        .unwrap();

        let edge = *store.load_network().unwrap().get_edge(5).unwrap();
        assert!(!edge.one_way);
        assert_eq!(edge.condition, Condition::Normal);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let (_dir, store) = tmp_store();
        store.initialize().unwrap();

        let conn = Connection::open(store.path()).unwrap();
        conn.execute_batch(
            "INSERT INTO nodes (id, lat, lon) VALUES (1, 0.0, 0.0), (2, 0.0, 0.001);
             INSERT INTO edges (id, from_node, to_node, length, status) VALUES (5, 1, 2, 120.0, 'closed');",
        )
        .unwrap();
        assert!(matches!(
            store.load_network(),
            Err(StoreError::Malformed { table: "edges", id: 5, .. })
        ));

        conn.execute_batch("UPDATE edges SET status = 'block', length = -3.0 WHERE id = 5;")
            .unwrap();
        assert!(matches!(
            store.load_network(),
            Err(StoreError::Malformed { table: "edges", id: 5, .. })
        ));

        conn.execute_batch("UPDATE edges SET length = 3.0; UPDATE nodes SET lat = 95.0 WHERE id = 2;")
            .unwrap();
        assert!(matches!(
            store.load_network(),
            Err(StoreError::Malformed { table: "nodes", id: 2, .. })
        ));
    }

    fn create_legacy_tables(store: &SqliteStore) -> Connection {
        let conn = Connection::open(store.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE nodes (id INTEGER PRIMARY KEY, lat REAL, lon REAL);
             CREATE TABLE edges (
                 id INTEGER PRIMARY KEY,
                 from_node INTEGER,
                 to_node INTEGER,
                 length REAL,
                 status TEXT DEFAULT 'normal',
                 FOREIGN KEY(from_node) REFERENCES nodes(id),
                 FOREIGN KEY(to_node) REFERENCES nodes(id)
             );
             INSERT INTO nodes (id, lat, lon) VALUES (1, 0.0, 0.0), (2, 0.0, 0.001);
             INSERT INTO edges (from_node, to_node, length) VALUES (1, 2, 120.0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn load_without_oneway_column() {
        let (_dir, store) = tmp_store();
        create_legacy_tables(&store);

        let network = store.load_network().unwrap();
        let edge = network.edges()[0];
        assert_eq!((edge.from, edge.to), (1, 2));
        assert!(!edge.one_way);
        assert_eq!(edge.condition, Condition::Normal);
    }

    #[test]
    fn initialize_adds_oneway_column() {
        let (_dir, store) = tmp_store();
        let conn = create_legacy_tables(&store);

        store.initialize().unwrap();
        store.initialize().unwrap();
        assert!(has_column(&conn, "edges", "oneway").unwrap());

        conn.execute_batch("UPDATE edges SET oneway = 1, status = 'flood';")
            .unwrap();
        let edge = store.load_network().unwrap().edges()[0];
        assert!(edge.one_way);
        assert_eq!(edge.condition, Condition::Flooded);
        assert_eq!(edge.length, 120.0);
    }

    #[test]
    fn missing_database_tables() {
        let (_dir, store) = tmp_store();
        assert!(matches!(store.load_network(), Err(StoreError::Sqlite(_))));
    }
}
