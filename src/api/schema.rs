//! Request and response shapes of the boundary. Field names are camelCase
//! on the wire.

use serde::{Deserialize, Serialize};

use crate::catalog::{DeviceDescriptor, DeviceKind};
use crate::printer::PrinterProfile;

/// Printer selection for one request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterConfigRequest {
    /// Profile name, e.g. `GENERIC_A` or `EPSON`
    #[serde(rename = "type")]
    pub printer_type: String,
    /// OS port path, or `usb:<vid>:<pid>`
    pub interface: String,
    /// `serial` or `usb`
    pub connection_type: String,
    /// Connect timeout; 3000 ms when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Receipt fields as submitted. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReceiptContent {
    /// Base64 image, optionally as a `data:` URL
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<ItemRequest>>,
    #[serde(default)]
    pub total: Option<Amount>,
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    pub qty: u32,
    pub price: Amount,
}

/// A decimal amount, accepted as a string (`"5.00"`) or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrintRequest {
    pub config: PrinterConfigRequest,
    #[serde(default)]
    pub content: ReceiptContent,
}

/// One entry of `listDevices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Four hex digits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Four hex digits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// `"usb"` for USB devices, absent for serial ports
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<&'static str>,
}

impl From<&DeviceDescriptor> for DeviceInfo {
    fn from(device: &DeviceDescriptor) -> Self {
        let hex = |id: Option<u16>| id.map(|id| format!("{:04x}", id));
        Self {
            path: device.path.clone(),
            manufacturer: device.manufacturer.clone(),
            serial_number: device.serial_number.clone(),
            pnp_id: device.pnp_id.clone(),
            location_id: device.location_id.clone(),
            product_id: hex(device.product_id),
            vendor_id: hex(device.vendor_id),
            device_type: match device.kind {
                DeviceKind::Usb => Some("usb"),
                DeviceKind::Serial => None,
            },
        }
    }
}

/// One entry of the profile listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub id: &'static str,
    pub alias: &'static str,
    pub name: &'static str,
    pub columns: usize,
    pub raster: bool,
}

impl From<PrinterProfile> for ProfileInfo {
    fn from(profile: PrinterProfile) -> Self {
        Self {
            id: profile.id(),
            alias: profile.vendor_alias(),
            name: profile.table().name,
            columns: profile.line_width(),
            raster: profile.supports_raster(),
        }
    }
}
