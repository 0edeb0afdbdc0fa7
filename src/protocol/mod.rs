//! # ESC/POS-Family Protocol Implementation
//!
//! Low-level command builders for the printer dialects tillprint speaks.
//!
//! ## Module Structure
//!
//! - [`commands`]: Bytes shared by every dialect (init, line feed)
//! - [`escpos`]: Epson ESC/POS alignment, emphasis, raster and cut
//! - [`starprnt`]: Star line-mode equivalents
//! - [`cp437`]: Text encoding for the PC437 code page
//!
//! ## Usage Example
//!
//! ```
//! use tillprint::ir::Align;
//! use tillprint::protocol::{commands, cp437, escpos};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(escpos::align(Align::Center));
//! data.extend(escpos::emphasis(true));
//! data.extend(cp437::encode("RECEIPT"));
//! data.extend(commands::line_feed());
//! data.extend(escpos::emphasis(false));
//! data.extend(escpos::cut_feed(3));
//! ```
//!
//! Callers normally go through [`crate::ir::encode`], which picks the
//! dialect from a [`PrinterProfile`](crate::printer::PrinterProfile).

pub mod commands;
pub mod cp437;
pub mod escpos;
pub mod starprnt;
