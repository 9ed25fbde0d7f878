//! SQLite-backed count store.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::{Error, Result};
use crate::integration::config::PipelineConfig;
use crate::integration::store::{CountRecord, CountStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS carcount (
    time TEXT NOT NULL,
    track_id INTEGER NOT NULL
)";

/// [`CountStore`] writing to a `carcount(time, track_id)` table.
pub struct SqliteCountStore {
    conn: Connection,
}

impl SqliteCountStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open the database at the configured `count_db_path`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::open(&config.count_db_path)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self { conn })
    }

    /// All records in insertion order.
    pub fn records(&self) -> Result<Vec<CountRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT time, track_id FROM carcount ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (timestamp, track_id) = row?;
            records.push(CountRecord {
                timestamp,
                track_id: u64::try_from(track_id)
                    .map_err(|_| Error::Store(format!("negative track id {track_id}")))?,
            });
        }
        Ok(records)
    }
}

impl CountStore for SqliteCountStore {
    fn insert_counts(&mut self, timestamp: &str, ids: &[u64]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO carcount (time, track_id) VALUES (?1, ?2)")?;
            for &id in ids {
                let id = i64::try_from(id)
                    .map_err(|_| Error::Store(format!("track id {id} does not fit the table")))?;
                stmt.execute(params![timestamp, id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
