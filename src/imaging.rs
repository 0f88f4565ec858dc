//! In-memory pixel operations: decode, bounding-box parsing, crop.
//!
//! Pure functions over byte buffers and [`DynamicImage`]s — no network, no
//! filesystem. Disk I/O lives in [`crate::materialize`].
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate, format guessed from magic bytes |
//! | Crop | `image::DynamicImage::crop_imm` |
//!
//! Fetched bodies carry no trustworthy extension or content type, so the
//! decoder sniffs the format from the bytes themselves.

use image::{DynamicImage, ImageReader};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to probe image format: {0}")]
    Probe(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("malformed bounding box {0:?}: expected \"x0,y0,x1,y1\" with non-negative integers")]
    Malformed(String),
    #[error("degenerate bounding box {0}: x0 < x1 and y0 < y1 required")]
    Degenerate(BBox),
    #[error("bounding box {bbox} exceeds image bounds {width}x{height}")]
    OutOfBounds { bbox: BBox, width: u32, height: u32 },
}

/// Face rectangle in source-image pixel coordinates.
///
/// `(x0, y0)` is the top-left corner, `(x1, y1)` the exclusive bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.x0, self.y0, self.x1, self.y1)
    }
}

impl FromStr for BBox {
    type Err = GeometryError;

    /// Parse the manifest's `"x0,y0,x1,y1"` form. Wrong field count or a
    /// non-numeric (or negative) coordinate is malformed; ordering is
    /// checked at crop time, not here.
    fn from_str(s: &str) -> Result<Self, GeometryError> {
        let malformed = || GeometryError::Malformed(s.to_string());

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(malformed());
        }
        let mut coords = [0u32; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|_| malformed())?;
        }
        Ok(BBox {
            x0: coords[0],
            y0: coords[1],
            x1: coords[2],
            y1: coords[3],
        })
    }
}

/// Decode fetched bytes into an image, sniffing the format.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Crop an image to a bounding box, validating it against the image bounds.
pub fn crop_to_box(img: &DynamicImage, bbox: &BBox) -> Result<DynamicImage, GeometryError> {
    if bbox.x1 <= bbox.x0 || bbox.y1 <= bbox.y0 {
        return Err(GeometryError::Degenerate(*bbox));
    }
    if bbox.x1 > img.width() || bbox.y1 > img.height() {
        return Err(GeometryError::OutOfBounds {
            bbox: *bbox,
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(img.crop_imm(bbox.x0, bbox.y0, bbox.x1 - bbox.x0, bbox.y1 - bbox.y0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::jpeg_bytes;

    #[test]
    fn bbox_parses_manifest_form() {
        let bbox: BBox = "60,50,140,130".parse().unwrap();
        assert_eq!(
            bbox,
            BBox {
                x0: 60,
                y0: 50,
                x1: 140,
                y1: 130,
            }
        );
    }

    #[test]
    fn bbox_tolerates_stray_whitespace() {
        let bbox: BBox = "10, 10, 50, 50".parse().unwrap();
        assert_eq!(bbox.x1, 50);
    }

    #[test]
    fn bbox_wrong_field_count_is_malformed() {
        assert!(matches!(
            "1,2,3".parse::<BBox>(),
            Err(GeometryError::Malformed(_))
        ));
        assert!(matches!(
            "1,2,3,4,5".parse::<BBox>(),
            Err(GeometryError::Malformed(_))
        ));
    }

    #[test]
    fn bbox_non_numeric_is_malformed() {
        assert!(matches!(
            "a,2,3,4".parse::<BBox>(),
            Err(GeometryError::Malformed(_))
        ));
        assert!(matches!(
            "-5,2,30,40".parse::<BBox>(),
            Err(GeometryError::Malformed(_))
        ));
        assert!(matches!(
            "".parse::<BBox>(),
            Err(GeometryError::Malformed(_))
        ));
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let img = decode(&jpeg_bytes(100, 80)).unwrap();
        assert_eq!((img.width(), img.height()), (100, 80));
    }

    #[test]
    fn decode_garbage_fails() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Decode(_)));
    }

    #[test]
    fn decode_truncated_jpeg_fails() {
        let bytes = jpeg_bytes(100, 80);
        assert!(decode(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn crop_produces_box_dimensions() {
        let img = decode(&jpeg_bytes(100, 100)).unwrap();
        let bbox: BBox = "10,10,50,50".parse().unwrap();

        let cropped = crop_to_box(&img, &bbox).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (40, 40));
    }

    #[test]
    fn crop_full_frame_is_identity_sized() {
        let img = decode(&jpeg_bytes(64, 48)).unwrap();
        let bbox: BBox = "0,0,64,48".parse().unwrap();

        let cropped = crop_to_box(&img, &bbox).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (64, 48));
    }

    #[test]
    fn crop_out_of_bounds_rejected() {
        let img = decode(&jpeg_bytes(100, 100)).unwrap();
        let bbox: BBox = "10,10,150,50".parse().unwrap();

        assert!(matches!(
            crop_to_box(&img, &bbox),
            Err(GeometryError::OutOfBounds { width: 100, .. })
        ));
    }

    #[test]
    fn crop_inverted_box_rejected() {
        let img = decode(&jpeg_bytes(100, 100)).unwrap();
        let bbox: BBox = "50,50,10,90".parse().unwrap();

        assert!(matches!(
            crop_to_box(&img, &bbox),
            Err(GeometryError::Degenerate(_))
        ));
    }
}
