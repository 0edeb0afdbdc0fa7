//! # Rendering Module
//!
//! Converts logo images into raster data the printer can take directly.
//!
//! ## Modules
//!
//! - [`dither`]: Bayer 8x8 ordered dithering for binary conversion
//! - [`logo`]: base64 logo → fitted, dithered [`ImageBuffer`](crate::receipt::ImageBuffer)

pub mod dither;
pub mod logo;

pub use logo::decode_logo;
