use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
///
/// Stored in TLBR order: `(min_x, min_y, max_x, max_y)`, with x on the
/// width axis and y on the height axis. Serialized as a flat
/// `[min_x, min_y, max_x, max_y]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Create a box from TLBR corners.
    #[inline]
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Convert to TLBR format: (min_x, min_y, max_x, max_y).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Geometric center of the box.
    #[inline]
    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.min_x as f64 + self.max_x as f64) / 2.0,
            (self.min_y as f64 + self.max_y as f64) / 2.0,
        )
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from([min_x, min_y, max_x, max_y]: [i32; 4]) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_tlbr()
    }
}
