//! `ImageTranscoder` built on the `image` crate.

use image::codecs::webp::WebPEncoder;

use crate::domain::ports::{ImageError, ImageTranscoder};

/// Decodes PNG, JPEG, GIF, or WebP input and re-encodes it as lossless WebP.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpTranscoder;

impl ImageTranscoder for WebpTranscoder {
    fn to_webp(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|err| ImageError::decode(err.to_string()))?;
        // The lossless encoder only accepts 8-bit channels.
        let rgba = image::DynamicImage::ImageRgba8(decoded.to_rgba8());
        let mut out = Vec::new();
        rgba.write_with_encoder(WebPEncoder::new_lossless(&mut out))
            .map_err(|err| ImageError::encode(err.to_string()))?;
        Ok(out)
    }
}
