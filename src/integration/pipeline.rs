//! FramePipeline for running one frame job end to end.

use image::RgbImage;
use log::{debug, info};

use crate::error::Result;
use crate::integration::config::PipelineConfig;
use crate::integration::detector::DetectionSource;
use crate::integration::filter::DetectionFilter;
use crate::integration::frame::{self, Frame};
use crate::integration::render;
use crate::integration::store::{BlobStore, CountStore};
use crate::tracker::{CentroidTracker, TrackedObject, TrackerSnapshot};

/// Outcome of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Every object tracked after the update, in id order.
    pub tracked: Vec<TrackedObject>,
    /// Ids first registered in this frame.
    pub registered: Vec<u64>,
}

/// Runs frame jobs against a detector and the storage collaborators.
///
/// The tracker is not kept between jobs: each call to
/// [`process_frame`](Self::process_frame) loads the persisted snapshot,
/// updates it and stores it back. Taking `&mut self` keeps that sequence
/// exclusive for a given pipeline; several pipelines must not share one
/// state key concurrently.
pub struct FramePipeline<D, B, C> {
    detector: D,
    blobs: B,
    counts: C,
    filter: DetectionFilter,
    config: PipelineConfig,
}

impl<D: DetectionSource, B: BlobStore, C: CountStore> FramePipeline<D, B, C> {
    pub fn new(detector: D, blobs: B, counts: C, config: PipelineConfig) -> Self {
        Self {
            detector,
            blobs,
            counts,
            filter: DetectionFilter::from_config(&config),
            config,
        }
    }

    /// Create a pipeline with default configuration.
    pub fn with_default_config(detector: D, blobs: B, counts: C) -> Self {
        Self::new(detector, blobs, counts, PipelineConfig::default())
    }

    /// Process a single frame.
    ///
    /// Steps, in order: validate the frame shape, detect, filter and scale
    /// the boxes, load the tracker, update it, render the annotation, append
    /// count records, persist the tracker, persist the annotated frame.
    /// Any failure aborts the job; in particular the tracker is not persisted
    /// when the count records could not be written.
    pub fn process_frame(&mut self, frame: &Frame, timestamp: &str) -> Result<FrameReport> {
        frame::validate_shape(frame, self.config.frame_height, self.config.frame_width)?;

        let response = self.detector.detect(frame)?;
        let boxes = self.filter.boxes(&response.detections()?);
        debug!("Frame {}: {} target detections", timestamp, boxes.len());

        let mut tracker = self.load_tracker()?;
        let first_new_id = tracker.next_id();
        let tracked = tracker.update(&boxes);

        let annotated = render::draw_objects(&frame::to_image(frame)?, &tracked);
        let png = render::encode_png(&annotated)?;

        let ids: Vec<u64> = tracked.iter().map(|o| o.id()).collect();
        if !ids.is_empty() {
            self.counts.insert_counts(timestamp, &ids)?;
        }

        self.persist_tracker(&tracker)?;
        self.blobs.set(&self.config.image_key, &png)?;

        let registered: Vec<u64> = ids.into_iter().filter(|&id| id >= first_new_id).collect();
        info!(
            "Frame {}: {} tracked, {} new, next id {}",
            timestamp,
            tracked.len(),
            registered.len(),
            tracker.next_id()
        );

        Ok(FrameReport {
            tracked,
            registered,
        })
    }

    /// Load the persisted tracker, or a fresh one if nothing was stored yet.
    pub fn load_tracker(&mut self) -> Result<CentroidTracker> {
        match self.blobs.get(&self.config.state_key)? {
            Some(bytes) => CentroidTracker::from_snapshot(TrackerSnapshot::from_json(&bytes)?),
            None => {
                debug!("No tracker snapshot under {:?}, starting fresh", self.config.state_key);
                Ok(CentroidTracker::new(self.config.tracker.clone()))
            }
        }
    }

    pub fn persist_tracker(&mut self, tracker: &CentroidTracker) -> Result<()> {
        let bytes = tracker.snapshot().to_json()?;
        self.blobs.set(&self.config.state_key, &bytes)
    }

    /// The most recently stored annotated frame.
    pub fn latest_image(&mut self) -> Result<Option<RgbImage>> {
        self.blobs
            .get(&self.config.image_key)?
            .map(|bytes| render::decode_png(&bytes))
            .transpose()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn blob_store(&self) -> &B {
        &self.blobs
    }

    pub fn count_store(&self) -> &C {
        &self.counts
    }
}
