//! Object detection collaborators.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::integration::config::PipelineConfig;
use crate::integration::frame::Frame;

/// Trait for object detection backends.
///
/// Implement this trait to connect any detection model to the pipeline.
///
/// # Example
///
/// ```ignore
/// use centroid_tracker::integration::{DetectionResponse, DetectionSource, Frame};
///
/// struct MyDetector;
///
/// impl DetectionSource for MyDetector {
///     fn detect(&mut self, frame: &Frame) -> centroid_tracker::Result<DetectionResponse> {
///         // Run inference and return the raw response
///         DetectionResponse::from_json(r#"{"predictions": [...]}"#)
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Run inference on a validated frame.
    fn detect(&mut self, frame: &Frame) -> Result<DetectionResponse>;
}

/// Raw detector output in TensorFlow Serving layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionResponse {
    pub predictions: Vec<Prediction>,
}

/// Parallel per-detection sequences for one input image.
///
/// Boxes are normalized `[y_min, x_min, y_max, x_max]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Prediction {
    pub detection_classes: Vec<f32>,
    pub detection_boxes: Vec<[f32; 4]>,
    pub detection_scores: Vec<f32>,
}

/// One detection before class and score filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub class_id: u32,
    /// Normalized `[y_min, x_min, y_max, x_max]`.
    pub bbox: [f32; 4],
    pub score: f32,
}

impl DetectionResponse {
    /// Parse a response body; any missing field makes the response malformed.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Detections of the first (and only) image in the request.
    pub fn detections(&self) -> Result<Vec<RawDetection>> {
        let prediction = self
            .predictions
            .first()
            .ok_or_else(|| Error::MalformedResponse("response has no predictions".to_string()))?;

        let n = prediction.detection_classes.len();
        if prediction.detection_boxes.len() != n || prediction.detection_scores.len() != n {
            return Err(Error::MalformedResponse(format!(
                "mismatched detection lengths: {} classes, {} boxes, {} scores",
                n,
                prediction.detection_boxes.len(),
                prediction.detection_scores.len()
            )));
        }

        Ok(prediction
            .detection_classes
            .iter()
            .zip(&prediction.detection_boxes)
            .zip(&prediction.detection_scores)
            .map(|((&class, &bbox), &score)| RawDetection {
                class_id: class.round() as u32,
                bbox,
                score,
            })
            .collect())
    }
}

/// Detector served over HTTP with a TensorFlow Serving `predict` endpoint.
pub struct HttpDetector {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpDetector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Detector at the configured `model_endpoint`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.model_endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body holding the frame as a batch of one nested
    /// `[height][width][channel]` list.
    pub fn request_body(frame: &Frame) -> serde_json::Value {
        let instance: Vec<Vec<Vec<u8>>> = frame
            .outer_iter()
            .map(|row| row.outer_iter().map(|pixel| pixel.to_vec()).collect())
            .collect();
        serde_json::json!({
            "signature_name": "serving_default",
            "instances": [instance],
        })
    }
}

impl DetectionSource for HttpDetector {
    fn detect(&mut self, frame: &Frame) -> Result<DetectionResponse> {
        let body = Self::request_body(frame).to_string();
        let response = self
            .agent
            .post(&self.endpoint)
            .set("content-type", "application/json")
            .send_string(&body)
            .map_err(Box::new)?;
        DetectionResponse::from_json(&response.into_string()?)
    }
}
