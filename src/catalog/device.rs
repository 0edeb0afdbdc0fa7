//! Device descriptors and USB addressing keys.

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

/// How a device is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// OS device node (`/dev/ttyUSB0`, `/dev/usb/lp0`, `COM3`)
    Serial,
    /// USB bulk endpoint addressed by vendor/product id
    Usb,
}

/// One addressable channel, as produced by the catalog. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    /// OS path for serial devices, `usb:<vid>:<pid>` for USB devices
    pub path: String,
    pub kind: DeviceKind,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub pnp_id: Option<String>,
    pub location_id: Option<String>,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl DeviceDescriptor {
    pub fn serial(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: DeviceKind::Serial,
            manufacturer: None,
            serial_number: None,
            pnp_id: None,
            location_id: None,
            vendor_id: None,
            product_id: None,
        }
    }

    pub fn usb(address: UsbAddress) -> Self {
        Self {
            path: address.to_string(),
            kind: DeviceKind::Usb,
            vendor_id: Some(address.vendor_id),
            product_id: Some(address.product_id),
            ..Self::serial(String::new())
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: Option<String>) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    /// Vendor/product pair parsed from the addressing key.
    pub fn usb_address(&self) -> Result<UsbAddress, PrintError> {
        self.path.parse()
    }

    /// Key used for deduplication and exclusive acquisition.
    pub fn key(&self) -> &str {
        &self.path
    }
}

/// `usb:<vendorIdHex>:<productIdHex>` addressing key.
///
/// ```
/// use tillprint::catalog::UsbAddress;
///
/// let addr: UsbAddress = "usb:04b8:0e15".parse()?;
/// assert_eq!((addr.vendor_id, addr.product_id), (0x04b8, 0x0e15));
/// assert_eq!(addr.to_string(), "usb:04b8:0e15");
/// # Ok::<(), tillprint::PrintError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbAddress {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl UsbAddress {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl FromStr for UsbAddress {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |why: &str| {
            PrintError::encoding(format!(
                "malformed USB address '{}': {} (expected usb:<vendorIdHex>:<productIdHex>)",
                s, why
            ))
        };

        let mut parts = s.trim().split(':');
        let (Some(scheme), Some(vid), Some(pid), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("wrong number of fields"));
        };
        if !scheme.eq_ignore_ascii_case("usb") {
            return Err(malformed("missing 'usb' prefix"));
        }

        let parse_id = |field: &str| -> Result<u16, PrintError> {
            let digits = field
                .strip_prefix("0x")
                .or_else(|| field.strip_prefix("0X"))
                .unwrap_or(field);
            if digits.is_empty()
                || digits.len() > 4
                || !digits.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(malformed("ids must be 1-4 hex digits"));
            }
            u16::from_str_radix(digits, 16).map_err(|_| malformed("ids must be 1-4 hex digits"))
        };

        Ok(UsbAddress::new(parse_id(vid)?, parse_id(pid)?))
    }
}

impl fmt::Display for UsbAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usb:{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}
