//! Storage collaborators: a key/value blob store for tracker state and
//! annotated frames, and an append-only store for count records.

use std::collections::HashMap;

use crate::error::Result;

/// Key/value store holding opaque blobs.
pub trait BlobStore {
    /// Fetch a blob, `None` if the key was never written.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// Durable table of `(timestamp, track_id)` detection events.
pub trait CountStore {
    /// Append one record per id, all tagged with `timestamp`.
    fn insert_counts(&mut self, timestamp: &str, ids: &[u64]) -> Result<()>;
}

/// A single detection event for a tracked object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRecord {
    pub timestamp: String,
    pub track_id: u64,
}

/// In-process [`BlobStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// In-process [`CountStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCountStore {
    records: Vec<CountRecord>,
}

impl MemoryCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CountRecord] {
        &self.records
    }
}

impl CountStore for MemoryCountStore {
    fn insert_counts(&mut self, timestamp: &str, ids: &[u64]) -> Result<()> {
        self.records.extend(ids.iter().map(|&track_id| CountRecord {
            timestamp: timestamp.to_string(),
            track_id,
        }));
        Ok(())
    }
}
