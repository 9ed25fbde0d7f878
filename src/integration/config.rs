//! Pipeline configuration.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tracker::TrackerConfig;

/// Configuration for a [`FramePipeline`](super::FramePipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Expected frame width in pixels.
    pub frame_width: usize,
    /// Expected frame height in pixels.
    pub frame_height: usize,
    /// Detector class id that is tracked (COCO: 3 = car).
    pub target_class: u32,
    /// Detections must score strictly above this to be tracked.
    pub min_score: f32,
    /// Settings for trackers created when no snapshot exists.
    pub tracker: TrackerConfig,
    pub model_endpoint: String,
    /// Blob key of the persisted tracker snapshot.
    pub state_key: String,
    /// Blob key of the latest annotated frame.
    pub image_key: String,
    pub redis_url: String,
    pub count_db_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_width: 300,
            frame_height: 300,
            target_class: 3,
            min_score: 0.15,
            tracker: TrackerConfig::default(),
            model_endpoint: "http://localhost:8501/v1/models/ssd:predict".to_string(),
            state_key: "tracker-state".to_string(),
            image_key: "latest-image".to_string(),
            redis_url: "redis://localhost:6379/0".to_string(),
            count_db_path: PathBuf::from("carcount.db"),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `MODEL_ENDPOINT`, `REDIS_URL`, `COUNT_DB_PATH`,
    /// `TARGET_CLASS`, `MIN_SCORE` and `MAX_MISSING_FRAMES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("MODEL_ENDPOINT") {
            config.model_endpoint = endpoint;
        }
        if let Some(url) = lookup("REDIS_URL") {
            config.redis_url = url;
        }
        if let Some(path) = lookup("COUNT_DB_PATH") {
            config.count_db_path = PathBuf::from(path);
        }
        if let Some(class) = parse_var(&lookup, "TARGET_CLASS")? {
            config.target_class = class;
        }
        if let Some(score) = parse_var(&lookup, "MIN_SCORE")? {
            config.min_score = score;
        }
        if let Some(frames) = parse_var(&lookup, "MAX_MISSING_FRAMES")? {
            config.tracker.max_missing_frames = frames;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} has an invalid value: {raw:?}"))),
    }
}
