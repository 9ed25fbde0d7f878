//! Redis-backed blob store.

use redis::Commands;

use crate::error::Result;
use crate::integration::config::PipelineConfig;
use crate::integration::store::BlobStore;

/// [`BlobStore`] over a synchronous Redis connection.
pub struct RedisBlobStore {
    conn: redis::Connection,
}

impl RedisBlobStore {
    /// Connect to `url`, e.g. `redis://localhost:6379/0`.
    pub fn open(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            conn: client.get_connection()?,
        })
    }

    /// Connect to the configured `redis_url`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::open(&config.redis_url)
    }
}

impl BlobStore for RedisBlobStore {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.conn.get(key)?)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let () = self.conn.set(key, value)?;
        Ok(())
    }
}
