//! Integration module for running the tracker as a per-frame job.
//!
//! This module connects a detection backend, the centroid tracker and the
//! storage collaborators that hold tracker state, annotated frames and count
//! records between jobs.

mod config;
mod detector;
mod filter;
mod frame;
mod pipeline;
mod render;
mod store;
mod worker;

pub use config::PipelineConfig;
pub use detector::{DetectionResponse, DetectionSource, HttpDetector, Prediction, RawDetection};
pub use filter::DetectionFilter;
pub use frame::{Frame, to_image, validate_shape};
pub use pipeline::{FramePipeline, FrameReport};
pub use render::{decode_png, draw_objects, encode_png};
pub use store::{BlobStore, CountRecord, CountStore, MemoryBlobStore, MemoryCountStore};
pub use worker::{FrameJob, Worker, WorkerStats};

#[cfg(feature = "redis-store")]
mod redis_store;

#[cfg(feature = "redis-store")]
pub use redis_store::RedisBlobStore;

#[cfg(feature = "sqlite-store")]
mod sqlite_store;

#[cfg(feature = "sqlite-store")]
pub use sqlite_store::SqliteCountStore;
