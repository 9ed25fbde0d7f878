//! Single tracked object for centroid tracking.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tracker::bounding_box::BoundingBox;

/// RGB color used when drawing an object.
pub type Color = [u8; 3];

/// A tracked object: a stable identity plus its latest bounding box.
///
/// The color is cosmetic and fixed at creation. Serializes to
/// `{"id": .., "box": [min_x, min_y, max_x, max_y], "color": [r, g, b]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedObject {
    id: u64,
    #[serde(rename = "box")]
    bbox: BoundingBox,
    color: Color,
}

impl TrackedObject {
    /// Create a new object with a random color.
    pub fn new(id: u64, bbox: BoundingBox) -> Self {
        let mut rng = rand::thread_rng();
        let color = [
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        ];
        Self::with_color(id, bbox, color)
    }

    pub fn with_color(id: u64, bbox: BoundingBox, color: Color) -> Self {
        Self { id, bbox, color }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Center of the current bounding box.
    pub fn centroid(&self) -> (f64, f64) {
        self.bbox.centroid()
    }

    /// Overwrite the current box with a matched detection.
    pub fn replace_box(&mut self, bbox: BoundingBox) {
        self.bbox = bbox;
    }
}
