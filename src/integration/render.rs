//! Annotation rendering and PNG encoding.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::error::Result;
use crate::tracker::TrackedObject;

/// Draw every object's box in its color onto a copy of `image`.
pub fn draw_objects(image: &RgbImage, objects: &[TrackedObject]) -> RgbImage {
    let mut canvas = image.clone();
    for object in objects {
        let bbox = object.bbox();
        let rect = Rect::at(bbox.min_x, bbox.min_y)
            .of_size(bbox.width().max(1) as u32, bbox.height().max(1) as u32);
        draw_hollow_rect_mut(&mut canvas, rect, Rgb(object.color()));
    }
    canvas
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8())
}
