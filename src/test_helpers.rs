//! Shared test utilities for the facegrab test suite.
//!
//! Synthetic image bodies encoded in-memory, standing in for fetched bytes.

use image::{ExtendedColorType, ImageEncoder};

/// Encode a synthetic JPEG of the given dimensions to bytes.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a synthetic RGBA PNG to bytes. Exercises the alpha-flattening
/// path in the JPEG save step.
pub fn png_with_alpha_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
    });
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    buf
}
