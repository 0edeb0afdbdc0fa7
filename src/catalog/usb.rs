//! USB printer-class enumeration via `nusb`.

use nusb::DeviceInfo;

use super::{DeviceDescriptor, DeviceSource, UsbAddress};
use crate::error::PrintError;

/// USB interface class code for printers.
pub const PRINTER_CLASS: u8 = 0x07;

/// USB devices exposing a printer-class interface.
pub struct UsbPrinterSource;

impl DeviceSource for UsbPrinterSource {
    fn name(&self) -> &'static str {
        "usb"
    }

    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, PrintError> {
        let devices = nusb::list_devices()
            .map_err(|e| PrintError::DeviceUnavailable(format!("cannot list USB devices: {}", e)))?;
        Ok(devices.filter(is_printer).map(|info| describe(&info)).collect())
    }
}

pub(crate) fn is_printer(info: &DeviceInfo) -> bool {
    info.class() == PRINTER_CLASS || info.interfaces().any(|i| i.class() == PRINTER_CLASS)
}

fn describe(info: &DeviceInfo) -> DeviceDescriptor {
    let mut device = DeviceDescriptor::usb(UsbAddress::new(info.vendor_id(), info.product_id()))
        .with_manufacturer(info.manufacturer_string().map(str::to_string));
    device.serial_number = info.serial_number().map(str::to_string);
    device.location_id = Some(format!("{}-{}", info.bus_number(), info.device_address()));
    device
}
