//! # Logo Decoding
//!
//! Turns the boundary's base64 logo into a packed [`ImageBuffer`]:
//!
//! 1. strip an optional `data:image/...;base64,` prefix
//! 2. base64-decode
//! 3. decode PNG/JPEG/GIF/BMP with the `image` crate
//! 4. shrink to the printable width if wider (aspect preserved)
//! 5. composite over white and Bayer-dither to 1 bit

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use tracing::debug;

use super::dither;
use crate::error::PrintError;
use crate::receipt::ImageBuffer;

/// Tallest logo accepted, in dots.
pub const MAX_LOGO_HEIGHT: u32 = 2048;

/// Decode a base64 logo for a head `max_width` dots wide.
pub fn decode_logo(encoded: &str, max_width: u16) -> Result<ImageBuffer, PrintError> {
    let payload = strip_data_url(encoded.trim());
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| PrintError::encoding(format!("logo is not valid base64: {}", e)))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| PrintError::encoding(format!("logo is not a readable image: {}", e)))?;
    rasterize(&image, max_width)
}

/// Fit and dither an already-decoded image.
pub fn rasterize(image: &DynamicImage, max_width: u16) -> Result<ImageBuffer, PrintError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PrintError::encoding("logo has no pixels"));
    }

    let fitted = if width > max_width as u32 {
        let new_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        image.resize_exact(max_width as u32, new_height, FilterType::Triangle)
    } else {
        image.clone()
    };
    let (width, height) = fitted.dimensions();
    if height > MAX_LOGO_HEIGHT {
        return Err(PrintError::encoding(format!(
            "logo is {} dots tall, at most {} is supported",
            height, MAX_LOGO_HEIGHT
        )));
    }

    let rgba = fitted.to_rgba8();
    let intensity: Vec<f32> = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0;
            (1.0 - luma) * (a as f32 / 255.0)
        })
        .collect();

    let data = dither::dither(width as usize, height as usize, &intensity);
    debug!(width, height, bytes = data.len(), "rasterized logo");
    ImageBuffer::new(width as u16, height as u16, data)
}

fn strip_data_url(s: &str) -> &str {
    match s.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => s,
    }
}
