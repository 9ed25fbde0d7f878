//! Portable tracker state.
//!
//! A [`TrackerSnapshot`] carries everything needed to rebuild a
//! [`CentroidTracker`] in another process, including the id counter, so that
//! identities keep increasing across independent jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::centroid_tracker::CentroidTracker;
use crate::tracker::matching::{AssignmentStrategy, GreedyAssignment};
use crate::tracker::tracked_object::TrackedObject;

/// Serialized form of a [`CentroidTracker`].
///
/// Encoded as JSON with integer ids written as string keys:
/// `{"objects": {"0": {..}}, "disappeared": {"0": 2}, "max_missing_frames": 5, "next_id": 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub objects: BTreeMap<u64, TrackedObject>,
    pub disappeared: BTreeMap<u64, u32>,
    pub max_missing_frames: u32,
    pub next_id: u64,
}

impl TrackerSnapshot {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse and validate a snapshot blob.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the invariants a live tracker relies on.
    pub fn validate(&self) -> Result<()> {
        if self.next_id == u64::MAX {
            return Err(Error::InvalidSnapshot(
                "next_id leaves no room for another object".to_string(),
            ));
        }
        if !self.objects.keys().eq(self.disappeared.keys()) {
            return Err(Error::InvalidSnapshot(
                "objects and disappeared hold different ids".to_string(),
            ));
        }
        for (&key, object) in &self.objects {
            if object.id() != key {
                return Err(Error::InvalidSnapshot(format!(
                    "object stored under id {key} reports id {}",
                    object.id()
                )));
            }
            if self.disappeared[&key] > self.max_missing_frames {
                return Err(Error::InvalidSnapshot(format!(
                    "object {key} missed {} frames, above the limit of {}",
                    self.disappeared[&key], self.max_missing_frames
                )));
            }
            if key >= self.next_id {
                return Err(Error::InvalidSnapshot(format!(
                    "object id {key} is not below next_id {}",
                    self.next_id
                )));
            }
        }
        Ok(())
    }
}

impl<S: AssignmentStrategy> CentroidTracker<S> {
    /// Capture the complete tracker state.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            objects: self.objects.clone(),
            disappeared: self.disappeared.clone(),
            max_missing_frames: self.max_missing_frames,
            next_id: self.next_id,
        }
    }

    /// Rebuild a tracker from a snapshot, pairing objects with `strategy`.
    pub fn from_snapshot_with_strategy(snapshot: TrackerSnapshot, strategy: S) -> Result<Self> {
        snapshot.validate()?;
        let TrackerSnapshot {
            objects,
            disappeared,
            max_missing_frames,
            next_id,
        } = snapshot;
        Ok(Self::from_parts(
            objects,
            disappeared,
            next_id,
            max_missing_frames,
            strategy,
        ))
    }
}

impl CentroidTracker {
    pub fn from_snapshot(snapshot: TrackerSnapshot) -> Result<Self> {
        Self::from_snapshot_with_strategy(snapshot, GreedyAssignment)
    }
}
