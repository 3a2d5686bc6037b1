//! Key-value snapshot persistence.
//!
//! RULE: Only store.rs talks to the database. The engine calls load/save
//! and never sees SQL.
//!
//! The substrate is a single-table key-value blob: one JSON document under
//! one key, overwritten whole on every save. No partial updates, no
//! versioning.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::FleetResult;
use crate::snapshot::FleetSnapshot;

const SNAPSHOT_KEY: &str = "fleet";

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the blob store at `path`.
    pub fn open(path: &str) -> FleetResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory() -> FleetResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> FleetResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Load the stored snapshot, or the default seed fleet when the store
    /// holds nothing yet.
    pub fn load(&self) -> FleetResult<FleetSnapshot> {
        match self.get(SNAPSHOT_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                log::info!("no snapshot found, seeding demo fleet");
                Ok(FleetSnapshot::seed())
            }
        }
    }

    /// Overwrite the entire stored document with `snapshot`.
    pub fn save(&self, snapshot: &FleetSnapshot) -> FleetResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.set(SNAPSHOT_KEY, &json)
    }

    fn get(&self, key: &str) -> FleetResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> FleetResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
