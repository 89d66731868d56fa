//! Image thumbnail generation.
//!
//! Decoding and encoding are delegated to the `image` crate; this module
//! only decides the target geometry and flattens transparency.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

/// Thumbnails fit within a 400x400 box.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 400;

/// JPEG quality used for thumbnails.
pub const THUMBNAIL_JPEG_QUALITY: u8 = 85;

/// Videos are scaled so that their larger side is at most 1080 pixels.
pub const VIDEO_MAX_DIMENSION: u32 = 1080;

/// Seconds into a video at which its thumbnail frame is taken.
pub const VIDEO_THUMBNAIL_OFFSET_SECS: f64 = 1.0;

/// Error type for thumbnail generation.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    #[error("failed to encode thumbnail: {0}")]
    Encode(image::ImageError),
}

/// Scale `(width, height)` to fit within `max x max`, keeping the aspect
/// ratio. Images already inside the box are left unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    if width >= height {
        let h = (u64::from(height) * u64::from(max) / u64::from(width)).max(1);
        (max, h as u32)
    } else {
        let w = (u64::from(width) * u64::from(max) / u64::from(height)).max(1);
        (w as u32, max)
    }
}

/// Composite any alpha channel onto a white background.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

/// Produce a JPEG thumbnail from encoded image bytes.
pub fn generate_thumbnail(bytes: &[u8]) -> Result<Vec<u8>, MediaError> {
    let img = image::load_from_memory(bytes).map_err(MediaError::Decode)?;
    let (width, height) = img.dimensions();
    let (target_w, target_h) = fit_within(width, height, THUMBNAIL_MAX_DIMENSION);

    let resized = if (target_w, target_h) == (width, height) {
        img
    } else {
        img.thumbnail(target_w, target_h)
    };
    let rgb = flatten_onto_white(&resized);

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, THUMBNAIL_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(MediaError::Encode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(fit_within(800, 400, 400), (400, 200));
        assert_eq!(fit_within(300, 1200, 400), (100, 400));
        assert_eq!(fit_within(200, 100, 400), (200, 100));
        assert_eq!(fit_within(4000, 1, 400), (400, 1));
    }

    #[test]
    fn thumbnail_is_jpeg_within_bounds() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(900, 300, Rgb([10, 20, 30])));
        let thumb = generate_thumbnail(&png_bytes(img)).unwrap();

        let decoded = image::load_from_memory_with_format(&thumb, ImageFormat::Jpeg).unwrap();
        assert!(decoded.width() <= THUMBNAIL_MAX_DIMENSION);
        assert!(decoded.height() <= THUMBNAIL_MAX_DIMENSION);
        assert_eq!(decoded.width(), 400);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        let flat = flatten_onto_white(&img);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(
            generate_thumbnail(b"not an image"),
            Err(MediaError::Decode(_))
        ));
    }
}
