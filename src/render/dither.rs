//! # Bayer 8x8 Ordered Dithering
//!
//! Converts grayscale intensity to black/white dots for a thermal head.
//! For each pixel the intensity is compared against a threshold looked up
//! from the Bayer matrix at `(x mod 8, y mod 8)`.
//!
//! Ordered dithering is deterministic, so the same logo always produces the
//! same bytes and a receipt's byte stream stays a pure function of its input.
//!
//! ```
//! use tillprint::render::dither;
//!
//! let row = vec![true, true, false, false, true, false, true, false];
//! assert_eq!(dither::pack_row(&row), vec![0b1100_1010]);
//! ```

/// Bayer 8x8 dithering matrix, values 0-63.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold in (0, 1) for a pixel position.
///
/// The half-step offset keeps full black always printing and full white
/// never printing.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    (BAYER8[y & 7][x & 7] as f32 + 0.5) / 64.0
}

/// `intensity`: 0.0 = white, 1.0 = black.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack pixels MSB-first into bytes, padding the last byte with white.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, _) in pixels.iter().enumerate().filter(|(_, on)| **on) {
        bytes[i / 8] |= 0x80 >> (i % 8);
    }
    bytes
}

/// Dither a row-major intensity buffer into a packed raster.
pub fn dither(width: usize, height: usize, intensity: &[f32]) -> Vec<u8> {
    debug_assert_eq!(intensity.len(), width * height);
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row = Vec::with_capacity(width);
    for y in 0..height {
        row.clear();
        row.extend((0..width).map(|x| should_print(x, y, intensity[y * width + x])));
        data.extend(pack_row(&row));
    }
    data
}
