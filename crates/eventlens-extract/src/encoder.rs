//! Canonical JPEG re-encoding of input images
//!
//! The model-serving API accepts a constrained image format set, so every
//! input is re-encoded to JPEG before transport regardless of its declared
//! MIME type. The actual format is sniffed from the bytes.

use eventlens_core::{EncodedImage, EventLensError, RawImage, Result};
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

/// Re-encode an arbitrary input image as JPEG.
///
/// # Errors
///
/// Returns [`EventLensError::ImageProcessing`] when the input cannot be
/// decoded or the JPEG encode fails. Encode failure is fatal; there is no
/// fallback format.
pub fn encode_jpeg(image: &RawImage) -> Result<EncodedImage> {
    let decoded = image::load_from_memory(&image.data).map_err(|e| {
        EventLensError::ImageProcessing(format!(
            "cannot decode input declared as {}: {e}",
            image.mime_type
        ))
    })?;

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| EventLensError::ImageProcessing(format!("JPEG encode failed: {e}")))?;

    let encoded = EncodedImage::new(buffer.into_inner());
    debug!(
        input_bytes = image.data.len(),
        jpeg_bytes = encoded.len(),
        "re-encoded input image"
    );
    Ok(encoded)
}
