//! # Device Catalog
//!
//! Lists the printers this machine can reach. Two independent sources are
//! merged into one deduplicated list:
//!
//! - [`SerialPortSource`]: serial ports as listed by the OS (`/dev/ttyUSB0`, `COM3`)
//! - [`UsbPrinterSource`]: USB printer-class devices, addressed as `usb:<vid>:<pid>`
//!
//! Probing is read-only. Enumeration never fails from the caller's point of
//! view: if a source reports an error, a warning is logged and the listing
//! is empty.

mod device;
mod serial;
mod usb;

pub use device::{DeviceDescriptor, DeviceKind, UsbAddress};
pub use serial::SerialPortSource;
pub use usb::UsbPrinterSource;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::PrintError;

/// One independently enumerable set of devices.
pub trait DeviceSource: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &'static str;

    /// Enumerate devices. May block on filesystem or bus access.
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, PrintError>;
}

/// Merges device sources into one listing.
pub struct DeviceCatalog {
    sources: Vec<Box<dyn DeviceSource>>,
}

impl DeviceCatalog {
    /// Catalog over the host's serial ports and USB printers.
    pub fn system() -> Self {
        Self::with_sources(vec![
            Box::new(SerialPortSource),
            Box::new(UsbPrinterSource),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn DeviceSource>>) -> Self {
        Self { sources }
    }

    /// List every reachable device, serial first, deduplicated by path.
    ///
    /// Any source failure yields an empty list plus a logged warning.
    pub fn list_devices(&self) -> Vec<DeviceDescriptor> {
        match self.try_list() {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "device enumeration failed, reporting no devices");
                Vec::new()
            }
        }
    }

    fn try_list(&self) -> Result<Vec<DeviceDescriptor>, PrintError> {
        let mut seen = HashSet::new();
        let mut devices = Vec::new();
        for source in &self.sources {
            let found = source.enumerate()?;
            debug!(source = source.name(), count = found.len(), "enumerated devices");
            for device in found {
                if seen.insert(device.key().to_string()) {
                    devices.push(device);
                }
            }
        }
        Ok(devices)
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::system()
    }
}
