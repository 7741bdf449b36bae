use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;
use tracing::warn;

/// Thumbnails are always re-encoded in this format.
const OUTPUT_FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Maximum width and height of a derived thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Generic thumbnail size.
    pub const DEFAULT: Self = Self::square(300);
    /// Size used when deriving thumbnails for uploads.
    pub const UPLOAD: Self = Self::square(400);

    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derived image bytes together with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Dimensions of `width`x`height` scaled down to fit inside `bounds`.
///
/// Aspect ratio is preserved up to rounding, images that already fit are
/// returned unchanged, and neither side drops below one pixel.
pub fn fit_within(width: u32, height: u32, bounds: BoundingBox) -> (u32, u32) {
    let max_w = bounds.width.max(1);
    let max_h = bounds.height.max(1);
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(max_w) / f64::from(width),
        f64::from(max_h) / f64::from(height),
    );
    let scaled_w = (f64::from(width) * ratio).round() as u32;
    let scaled_h = (f64::from(height) * ratio).round() as u32;

    (scaled_w.clamp(1, max_w), scaled_h.clamp(1, max_h))
}

/// Decode `data`, shrink it to fit `bounds` and re-encode it as JPEG.
pub fn try_derive_thumbnail(data: &[u8], bounds: BoundingBox) -> Result<Thumbnail, ThumbnailError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    let (width, height) = fit_within(img.width(), img.height(), bounds);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.thumbnail_exact(width, height)
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, OUTPUT_FORMAT)?;

    Ok(Thumbnail {
        data: buf.into_inner(),
        content_type: OUTPUT_FORMAT.to_mime_type().to_string(),
    })
}

/// Best-effort thumbnail derivation.
///
/// Any failure (corrupt data, unsupported format, encoder error) yields `None`
/// so that the enclosing upload still succeeds.
pub fn derive_thumbnail(data: &[u8], bounds: BoundingBox) -> Option<Thumbnail> {
    match try_derive_thumbnail(data, bounds) {
        Ok(thumbnail) => Some(thumbnail),
        Err(e) => {
            warn!(error = %e, size = data.len(), "Thumbnail derivation failed");
            None
        }
    }
}
