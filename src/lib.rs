//! # tillprint - Receipt Printing for ESC/POS-family Thermal Printers
//!
//! tillprint drives thermal receipt printers over a serial port or a USB
//! bulk endpoint. It provides:
//!
//! - **Device discovery**: serial ports and USB printer-class devices
//! - **Protocol encoding**: Epson ESC/POS and Star line-mode byte tables
//! - **Receipt composition**: header, logo, item table, total, footer
//! - **Job execution**: bounded connect and write, close on every path
//! - **HTTP API**: list devices, test a printer, print a receipt
//!
//! ## Quick Start
//!
//! ```
//! use tillprint::{
//!     ir::encode,
//!     receipt::{compose, LineItem, Receipt},
//!     PrinterProfile,
//! };
//!
//! let receipt = Receipt::new()
//!     .header("CORNER SHOP")
//!     .item(LineItem::new("Widget", 2, "5.00".parse()?)?)
//!     .total("10.00".parse()?);
//!
//! let ops = compose(&receipt);
//! let bytes = encode(&ops, PrinterProfile::GenericA)?;
//! assert_eq!(&bytes[..2], &[0x1B, b'@']);
//! # Ok::<(), tillprint::PrintError>(())
//! ```
//!
//! Printing goes through [`job::JobExecutor`] or, at the request level,
//! [`api::PrintService`].
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Device enumeration and USB addressing keys |
//! | [`transport`] | Serial and USB byte channels |
//! | [`protocol`] | ESC/POS and StarPRNT command builders, CP437 |
//! | [`printer`] | Printer profiles and their byte tables |
//! | [`ir`] | Print operations and the command encoder |
//! | [`receipt`] | Receipt model and composer |
//! | [`render`] | Logo decoding and dithering |
//! | [`job`] | Print job executor |
//! | [`api`] | Boundary request/response shapes and service |
//! | [`server`] | HTTP exposure of the API |
//! | [`error`] | Error types |

pub mod api;
pub mod catalog;
pub mod error;
pub mod ir;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::PrintError;
pub use job::{ConnectionSpec, JobExecutor, PrintResult};
pub use printer::PrinterProfile;
