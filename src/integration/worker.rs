//! Single-consumer job loop.

use std::sync::mpsc::Receiver;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::integration::detector::DetectionSource;
use crate::integration::frame::Frame;
use crate::integration::pipeline::FramePipeline;
use crate::integration::store::{BlobStore, CountStore};

/// A queued frame to process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameJob {
    pub timestamp: String,
    pub frame: Frame,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub processed: usize,
    pub failed: usize,
}

/// Drains a job channel through one pipeline, one job at a time.
///
/// Owning the only receiver keeps tracker load/update/store sequences from
/// overlapping.
pub struct Worker<D, B, C> {
    pipeline: FramePipeline<D, B, C>,
}

impl<D: DetectionSource, B: BlobStore, C: CountStore> Worker<D, B, C> {
    pub fn new(pipeline: FramePipeline<D, B, C>) -> Self {
        Self { pipeline }
    }

    /// Process jobs until every sender is dropped.
    ///
    /// A failed job is logged and skipped; it does not stop the worker.
    pub fn run(&mut self, jobs: Receiver<FrameJob>) -> WorkerStats {
        let mut stats = WorkerStats::default();
        for job in jobs {
            match self.pipeline.process_frame(&job.frame, &job.timestamp) {
                Ok(_) => stats.processed += 1,
                Err(e) => {
                    warn!("Job at {} failed: {}", job.timestamp, e);
                    stats.failed += 1;
                }
            }
        }
        info!(
            "Worker stopped: {} processed, {} failed",
            stats.processed, stats.failed
        );
        stats
    }

    pub fn pipeline(&self) -> &FramePipeline<D, B, C> {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> FramePipeline<D, B, C> {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::error::Result;
    use crate::integration::detector::{DetectionResponse, Prediction};
    use crate::integration::store::{MemoryBlobStore, MemoryCountStore};

    struct OneCar;

    impl DetectionSource for OneCar {
        fn detect(&mut self, _frame: &Frame) -> Result<DetectionResponse> {
            Ok(DetectionResponse {
                predictions: vec![Prediction {
                    detection_classes: vec![3.0],
                    detection_boxes: vec![[0.5, 0.5, 0.75, 0.75]],
                    detection_scores: vec![0.9],
                }],
            })
        }
    }

    #[test]
    fn test_job_survives_queue_encoding() {
        let mut frame = Frame::zeros((2, 2, 3));
        frame[[0, 1, 2]] = 9;
        let job = FrameJob {
            timestamp: "2024-01-01 08:00:00".to_string(),
            frame,
        };

        let encoded = serde_json::to_string(&job).unwrap();
        let decoded: FrameJob = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.timestamp, job.timestamp);
        assert_eq!(decoded.frame, job.frame);
    }

    #[test]
    fn test_worker_continues_after_failed_job() {
        let pipeline = FramePipeline::with_default_config(
            OneCar,
            MemoryBlobStore::new(),
            MemoryCountStore::new(),
        );
        let mut worker = Worker::new(pipeline);

        let (tx, rx) = mpsc::channel();
        let jobs = [
            ("t0", Frame::zeros((300, 300, 3))),
            ("t1", Frame::zeros((10, 10, 3))),
            ("t2", Frame::zeros((300, 300, 3))),
        ];
        for (timestamp, frame) in jobs {
            tx.send(FrameJob {
                timestamp: timestamp.to_string(),
                frame,
            })
            .unwrap();
        }
        drop(tx);

        let stats = worker.run(rx);
        assert_eq!(
            stats,
            WorkerStats {
                processed: 2,
                failed: 1
            }
        );

        let mut pipeline = worker.into_pipeline();
        let records = pipeline.count_store().records().to_vec();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.track_id == 0));
        assert_eq!(pipeline.load_tracker().unwrap().next_id(), 1);
    }
}
