//! Image decode and downscale for the scan pipeline
//!
//! Uploads are decoded with whatever format support the `image` crate
//! provides; anything unreadable fails here as a terminal error for the
//! scan attempt. Frames larger than the analysis cap are downscaled before
//! any per-pixel work to bound analysis cost.

use image::RgbaImage;

use crate::error::{AppError, AppResult};

/// Fixed analysis cap; not user-configurable
pub const MAX_ANALYSIS_WIDTH: u32 = 800;
pub const MAX_ANALYSIS_HEIGHT: u32 = 600;

/// Decode upload bytes into an RGBA frame sized for analysis
pub fn decode_for_analysis(bytes: &[u8]) -> AppResult<RgbaImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AppError::ImageDecode(e.to_string()))?;

    let decoded = if decoded.width() > MAX_ANALYSIS_WIDTH || decoded.height() > MAX_ANALYSIS_HEIGHT
    {
        // Aspect-preserving fit inside the cap
        decoded.thumbnail(MAX_ANALYSIS_WIDTH, MAX_ANALYSIS_HEIGHT)
    } else {
        decoded
    };

    Ok(decoded.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbaImage as Img};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(Img::from_pixel(
            width,
            height,
            image::Rgba([120, 160, 90, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_small_image_unchanged() {
        let frame = decode_for_analysis(&png_bytes(64, 48)).unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
    }

    #[test]
    fn downscales_oversized_image_into_cap() {
        let frame = decode_for_analysis(&png_bytes(1600, 1200)).unwrap();
        assert!(frame.width() <= MAX_ANALYSIS_WIDTH);
        assert!(frame.height() <= MAX_ANALYSIS_HEIGHT);
        // Aspect ratio preserved (4:3 input)
        assert_eq!(frame.width(), 800);
        assert_eq!(frame.height(), 600);
    }

    #[test]
    fn garbage_bytes_fail_at_decode() {
        let err = decode_for_analysis(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }
}
