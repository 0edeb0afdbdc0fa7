//! # Printer Transport Layer
//!
//! Byte-level channels to a printer behind one capability interface.
//!
//! A [`Transport`] opens a device; the returned [`Connection`] owns the
//! channel until it is closed. Opening is not bounded here: the job
//! executor wraps it in the connect timeout. Writes are bounded by
//! [`WRITE_TIMEOUT`] and are never retried.
//!
//! ## Available Transports
//!
//! - [`serial`]: OS device nodes in raw TTY mode (`/dev/ttyUSB0`, `/dev/usb/lp0`)
//! - [`usb`]: USB printer-class bulk-out endpoint, addressed by vendor/product id
//!
//! [`SystemTransport`] picks one of them from the descriptor's [`DeviceKind`].

pub mod serial;
pub mod usb;

pub use serial::SerialTransport;
pub use usb::UsbTransport;

use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{DeviceDescriptor, DeviceKind};
use crate::error::PrintError;

/// Fixed bound on one logical write.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens channels to devices.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the device. Fails with `DeviceUnavailable`, or `EncodingError`
    /// for a malformed USB addressing key.
    async fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError>;
}

/// An opened channel.
#[async_trait]
pub trait Connection: Send {
    /// Post-open liveness check.
    async fn is_connected(&mut self) -> bool;

    /// Write the whole buffer, in order. Chunking is internal.
    async fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Release the channel. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), PrintError>;
}

/// Dispatches to the serial or USB transport by device kind.
#[derive(Default)]
pub struct SystemTransport {
    serial: SerialTransport,
    usb: UsbTransport,
}

#[async_trait]
impl Transport for SystemTransport {
    async fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
        match device.kind {
            DeviceKind::Serial => self.serial.open(device).await,
            DeviceKind::Usb => self.usb.open(device).await,
        }
    }
}
