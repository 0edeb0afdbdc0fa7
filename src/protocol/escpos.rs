//! # Epson ESC/POS Commands
//!
//! Command builders for the Epson dialect of ESC/POS, which most generic
//! 80mm thermal printers emulate.
//!
//! | Operation | Command | Hex |
//! |-----------|---------|-----|
//! | Align | ESC a n | 1B 61 n |
//! | Emphasis | ESC E n | 1B 45 n |
//! | Code page | ESC t n | 1B 74 n |
//! | Raster image | GS v 0 m xL xH yL yH d... | 1D 76 30 ... |
//! | Feed and cut | GS V m n | 1D 56 m n |

use super::commands::{ESC, GS, u16_le};
use crate::ir::Align;

/// # Select Justification (ESC a n)
///
/// - `n = 0`: left, `n = 1`: center, `n = 2`: right
///
/// Takes effect at the start of the next line.
///
/// ```
/// use tillprint::ir::Align;
/// use tillprint::protocol::escpos;
///
/// assert_eq!(escpos::align(Align::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Align) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// # Emphasized Mode (ESC E n)
///
/// `n = 1` turns emphasis on, `n = 0` turns it off.
pub fn emphasis(on: bool) -> Vec<u8> {
    vec![ESC, b'E', on as u8]
}

/// # Select Character Code Table (ESC t n)
///
/// `n = 0` is PC437 (USA, Standard Europe), the power-on default on
/// nearly every Epson-compatible head.
pub fn codepage_pc437() -> Vec<u8> {
    vec![ESC, b't', 0]
}

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// Prints a packed 1-bit image, MSB = leftmost dot, rows top to bottom.
///
/// ## Parameters
///
/// - `m = 0`: normal density
/// - `xL xH`: width in bytes, little-endian
/// - `yL yH`: height in dots, little-endian
///
/// ```
/// use tillprint::protocol::escpos;
///
/// let cmd = escpos::raster(16, 2, &[0xFF, 0x00, 0xAA, 0x55]);
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0]);
/// assert_eq!(cmd.len(), 8 + 4);
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);
    debug_assert_eq!(data.len(), width_bytes as usize * height as usize);

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend([GS, b'v', b'0', 0, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    cmd
}

/// # Feed and Full Cut (GS V 65 n)
///
/// Feeds paper to the cutting position plus `n` motion units, then cuts.
/// Feeding first keeps the last printed line above the blade.
///
/// ```
/// use tillprint::protocol::escpos;
///
/// assert_eq!(escpos::cut_feed(3), vec![0x1D, 0x56, 0x41, 0x03]);
/// ```
pub fn cut_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', 65, n]
}
