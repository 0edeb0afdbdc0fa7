//! Serial port enumeration via `tokio-serial`.
//!
//! The OS listing covers `/dev/tty*` nodes on Unix and `COMn` ports on
//! Windows. USB-serial adapters carry vendor, product, manufacturer and
//! serial number from the bus.

use tokio_serial::{SerialPortInfo, SerialPortType};

use super::{DeviceDescriptor, DeviceSource};
use crate::error::PrintError;

/// Serial ports known to the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortSource;

impl DeviceSource for SerialPortSource {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, PrintError> {
        let ports = tokio_serial::available_ports().map_err(|e| {
            PrintError::DeviceUnavailable(format!("cannot list serial ports: {}", e))
        })?;
        Ok(describe_all(ports))
    }
}

fn describe_all(ports: Vec<SerialPortInfo>) -> Vec<DeviceDescriptor> {
    let mut devices: Vec<DeviceDescriptor> = ports.into_iter().map(describe).collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices.dedup_by(|a, b| a.path == b.path);
    devices
}

fn describe(port: SerialPortInfo) -> DeviceDescriptor {
    let mut device = DeviceDescriptor::serial(port.port_name);
    if let SerialPortType::UsbPort(usb) = port.port_type {
        device.vendor_id = Some(usb.vid);
        device.product_id = Some(usb.pid);
        device.manufacturer = usb.manufacturer;
        device.serial_number = usb.serial_number;
    }
    device
}
