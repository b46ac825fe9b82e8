use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Fixed thumbnail width policy. Height is derived from the source
/// aspect ratio.
pub const THUMBNAIL_WIDTH: u32 = 200;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Resize raster bytes to `width`, preserving the aspect ratio, and
/// encode the result as JPEG. Sources already at or below the target
/// width keep their dimensions and are only re-encoded.
pub fn resize_to_width(data: &[u8], width: u32) -> Result<Vec<u8>, ImageError> {
    let img = image::load_from_memory(data).map_err(ImageError::Decode)?;

    let resized = if img.width() > width {
        let height = ((u64::from(img.height()) * u64::from(width)) / u64::from(img.width()))
            .max(1) as u32;
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel and no 16-bit support; flatten to RGB8
    let out = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buf = Vec::new();
    out.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(ImageError::Encode)?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn dimensions_of(data: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(data).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_resize_derives_height_from_aspect_ratio() {
        let resized = resize_to_width(&png_bytes(400, 300), 200).unwrap();
        assert_eq!(dimensions_of(&resized), (200, 150));

        let resized = resize_to_width(&png_bytes(1000, 500), 200).unwrap();
        assert_eq!(dimensions_of(&resized), (200, 100));
    }

    #[test]
    fn test_resize_never_upscales() {
        let resized = resize_to_width(&png_bytes(1, 1), 200).unwrap();
        assert_eq!(dimensions_of(&resized), (1, 1));

        let resized = resize_to_width(&png_bytes(120, 90), 200).unwrap();
        assert_eq!(dimensions_of(&resized), (120, 90));
    }

    #[test]
    fn test_resize_output_is_jpeg() {
        let resized = resize_to_width(&png_bytes(400, 300), 200).unwrap();
        assert_eq!(
            image::guess_format(&resized).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_resize_extreme_aspect_ratio_keeps_minimum_height() {
        // 1000x1 would truncate to height 0 without the lower bound
        let resized = resize_to_width(&png_bytes(1000, 1), 200).unwrap();
        assert_eq!(dimensions_of(&resized), (200, 1));
    }

    #[test]
    fn test_resize_rejects_non_image_bytes() {
        let err = resize_to_width(b"definitely not an image", 200).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
