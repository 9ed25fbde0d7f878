//! Camera frame input.

use image::RgbImage;
use ndarray::Array3;

use crate::error::{Error, Result};

/// An 8-bit frame laid out as `(height, width, channels)`.
pub type Frame = Array3<u8>;

pub const CHANNELS: usize = 3;

/// Reject any frame that is not `height x width x 3`.
pub fn validate_shape(frame: &Frame, height: usize, width: usize) -> Result<()> {
    let got = frame.dim();
    let expected = (height, width, CHANNELS);
    if got != expected {
        return Err(Error::InvalidFrameShape { expected, got });
    }
    Ok(())
}

/// Copy an RGB frame into an image buffer.
pub fn to_image(frame: &Frame) -> Result<RgbImage> {
    let (height, width, channels) = frame.dim();
    if channels != CHANNELS {
        return Err(Error::InvalidFrameShape {
            expected: (height, width, CHANNELS),
            got: (height, width, channels),
        });
    }
    let pixels: Vec<u8> = frame.iter().copied().collect();
    RgbImage::from_raw(width as u32, height as u32, pixels).ok_or(Error::InvalidFrameShape {
        expected: (height, width, CHANNELS),
        got: (height, width, channels),
    })
}
