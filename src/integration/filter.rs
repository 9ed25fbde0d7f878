//! Conversion of raw detections into tracker input.

use crate::integration::config::PipelineConfig;
use crate::integration::detector::RawDetection;
use crate::tracker::BoundingBox;

/// Keeps detections of one class above a score threshold and scales them
/// into pixel boxes.
#[derive(Debug, Clone)]
pub struct DetectionFilter {
    pub target_class: u32,
    pub min_score: f32,
    pub frame_width: usize,
    pub frame_height: usize,
}

impl DetectionFilter {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            target_class: config.target_class,
            min_score: config.min_score,
            frame_width: config.frame_width,
            frame_height: config.frame_height,
        }
    }

    /// Scale a normalized `[y_min, x_min, y_max, x_max]` box into a pixel
    /// `(min_x, min_y, max_x, max_y)` box. x scales with the frame width and
    /// y with the frame height; coordinates are truncated.
    pub fn to_pixels(&self, [y_min, x_min, y_max, x_max]: [f32; 4]) -> BoundingBox {
        let width = self.frame_width as f32;
        let height = self.frame_height as f32;
        BoundingBox::new(
            (x_min * width) as i32,
            (y_min * height) as i32,
            (x_max * width) as i32,
            (y_max * height) as i32,
        )
    }

    pub fn accepts(&self, detection: &RawDetection) -> bool {
        detection.class_id == self.target_class && detection.score > self.min_score
    }

    /// Pixel boxes of the accepted detections, in detector order.
    pub fn boxes(&self, detections: &[RawDetection]) -> Vec<BoundingBox> {
        detections
            .iter()
            .filter(|d| self.accepts(d))
            .map(|d| self.to_pixels(d.bbox))
            .collect()
    }
}
