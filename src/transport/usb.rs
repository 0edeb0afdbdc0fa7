//! # USB Transport
//!
//! Talks to a USB printer-class device directly through its bulk-out
//! endpoint, bypassing any kernel printer driver.
//!
//! The device is found by the vendor/product pair in its `usb:<vid>:<pid>`
//! key. The interface chosen is the first printer-class (0x07) interface
//! with a bulk-out endpoint; devices that do not advertise the printer
//! class fall back to the first interface with any bulk-out endpoint.
//!
//! ## Liveness
//!
//! The printer class defines `GET_PORT_STATUS` (class request 1). Bit 3
//! set means "no error". Devices that stall the request are still
//! treated as connected since many cheap printers do not implement it.

use std::time::Duration;

use async_trait::async_trait;
use nusb::transfer::{ControlIn, ControlType, Direction, EndpointType, Recipient, TransferError};
use nusb::{Device, Interface};
use tracing::{debug, warn};

use super::{Connection, Transport, WRITE_TIMEOUT};
use crate::catalog::{DeviceDescriptor, UsbAddress};
use crate::error::PrintError;

/// Largest single bulk transfer.
const BULK_CHUNK: usize = 16 * 1024;

const PRINTER_CLASS: u8 = 0x07;

const GET_PORT_STATUS: u8 = 1;
const PORT_STATUS_NOT_ERROR: u8 = 0x08;
const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens USB printers by vendor/product id.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsbTransport;

#[async_trait]
impl Transport for UsbTransport {
    async fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
        // Malformed keys fail here, before any bus access
        let address = device.usb_address()?;
        let conn = tokio::task::spawn_blocking(move || claim(address))
            .await
            .map_err(|e| PrintError::DeviceUnavailable(format!("open task failed: {}", e)))??;
        debug!(
            %address,
            interface = conn.interface_number,
            endpoint = conn.endpoint,
            "claimed USB printer interface"
        );
        Ok(Box::new(conn))
    }
}

/// A claimed printer interface.
pub struct UsbConnection {
    address: UsbAddress,
    interface: Option<Interface>,
    interface_number: u8,
    endpoint: u8,
}

#[async_trait]
impl Connection for UsbConnection {
    async fn is_connected(&mut self) -> bool {
        let Some(interface) = &self.interface else {
            return false;
        };
        let request = interface.control_in(ControlIn {
            control_type: ControlType::Class,
            recipient: Recipient::Interface,
            request: GET_PORT_STATUS,
            value: 0,
            index: self.interface_number as u16,
            length: 1,
        });

        let completion = match tokio::time::timeout(LIVENESS_TIMEOUT, request).await {
            Ok(completion) => completion,
            Err(_) => {
                warn!(address = %self.address, "port status request timed out");
                return false;
            }
        };
        match completion.status {
            Ok(()) => match completion.data.first() {
                Some(status) => status & PORT_STATUS_NOT_ERROR != 0,
                None => true,
            },
            Err(TransferError::Stall) => true,
            Err(e) => {
                debug!(address = %self.address, error = %e, "port status request failed");
                false
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        let interface = self
            .interface
            .clone()
            .ok_or_else(|| PrintError::write_failed("interface is released", 0))?;
        let endpoint = self.endpoint;

        let mut written = 0usize;
        let transfer = async {
            for chunk in data.chunks(BULK_CHUNK) {
                let completion = interface.bulk_out(endpoint, chunk.to_vec()).await;
                written += completion.data.actual_length();
                completion.status.map_err(|e| {
                    PrintError::write_failed(format!("bulk transfer failed: {}", e), written)
                })?;
            }
            Ok::<(), PrintError>(())
        };
        let outcome = tokio::time::timeout(WRITE_TIMEOUT, transfer).await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(PrintError::write_failed(
                format!("write did not finish within {} ms", WRITE_TIMEOUT.as_millis()),
                written,
            )),
        }
    }

    async fn close(&mut self) -> Result<(), PrintError> {
        if self.interface.take().is_some() {
            debug!(address = %self.address, "released USB printer interface");
        }
        Ok(())
    }
}

fn claim(address: UsbAddress) -> Result<UsbConnection, PrintError> {
    let unavailable = |what: String| PrintError::DeviceUnavailable(format!("{}: {}", address, what));

    let info = nusb::list_devices()
        .map_err(|e| unavailable(format!("cannot list USB devices: {}", e)))?
        .find(|d| d.vendor_id() == address.vendor_id && d.product_id() == address.product_id)
        .ok_or_else(|| unavailable("no such device attached".to_string()))?;

    let device = info
        .open()
        .map_err(|e| unavailable(format!("cannot open device: {}", e)))?;
    let (interface_number, endpoint) = find_bulk_out(&device)
        .ok_or_else(|| unavailable("device has no bulk-out endpoint".to_string()))?;

    let interface = claim_interface(&device, interface_number).map_err(|e| {
        unavailable(format!(
            "cannot claim interface {}: {} (check permissions and that no other program holds it)",
            interface_number, e
        ))
    })?;

    Ok(UsbConnection {
        address,
        interface: Some(interface),
        interface_number,
        endpoint,
    })
}

/// (interface number, endpoint address), printer-class interfaces first.
fn find_bulk_out(device: &Device) -> Option<(u8, u8)> {
    let config = device.active_configuration().ok()?;
    let mut fallback = None;
    for alt in config.interface_alt_settings() {
        let Some(endpoint) = alt
            .endpoints()
            .find(|ep| ep.direction() == Direction::Out && ep.transfer_type() == EndpointType::Bulk)
        else {
            continue;
        };
        let candidate = (alt.interface_number(), endpoint.address());
        if alt.class() == PRINTER_CLASS {
            return Some(candidate);
        }
        fallback.get_or_insert(candidate);
    }
    fallback
}

#[cfg(target_os = "linux")]
fn claim_interface(device: &Device, number: u8) -> Result<Interface, nusb::Error> {
    // usblp binds printer-class interfaces on Linux
    device.detach_and_claim_interface(number)
}

#[cfg(not(target_os = "linux"))]
fn claim_interface(device: &Device, number: u8) -> Result<Interface, nusb::Error> {
    device.claim_interface(number)
}
