//! Centroid-based multi-object tracking for vehicle counting.
//!
//! The [`tracker`] module holds the tracking engine and its snapshot codec.
//! The [`integration`] module wires a detector, the tracker, and the storage
//! collaborators into a per-frame job pipeline.

mod error;
pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{FramePipeline, PipelineConfig};
pub use tracker::{BoundingBox, CentroidTracker, TrackedObject, TrackerConfig};
