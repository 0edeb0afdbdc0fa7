//! Conversion from request shapes to domain types.
//!
//! Validation order matters: the profile name is checked first, so an
//! unknown printer type is reported before anything else is looked at
//! and before any device is opened.

use std::time::Duration;

use crate::catalog::DeviceDescriptor;
use crate::error::PrintError;
use crate::job::ConnectionSpec;
use crate::printer::PrinterProfile;
use crate::receipt::{LineItem, Money, Receipt};
use crate::render::decode_logo;

use super::schema::*;

impl PrinterConfigRequest {
    pub fn profile(&self) -> Result<PrinterProfile, PrintError> {
        self.printer_type.parse()
    }

    pub fn device(&self) -> Result<DeviceDescriptor, PrintError> {
        let interface = self.interface.trim();
        match self.connection_type.trim().to_ascii_lowercase().as_str() {
            "serial" if interface.is_empty() => {
                Err(PrintError::encoding("serial connection needs a port path"))
            }
            "serial" => Ok(DeviceDescriptor::serial(interface)),
            "usb" => Ok(DeviceDescriptor::usb(interface.parse()?)),
            other => Err(PrintError::encoding(format!(
                "unsupported connection type '{}' (expected serial or usb)",
                other
            ))),
        }
    }

    /// Build the per-request connection spec.
    pub fn to_spec(&self, default_timeout: Duration) -> Result<ConnectionSpec, PrintError> {
        let profile = self.profile()?;
        let device = self.device()?;
        let timeout = match self.timeout_ms {
            Some(0) => return Err(PrintError::encoding("timeoutMs must be greater than zero")),
            Some(ms) => Duration::from_millis(ms),
            None => default_timeout,
        };
        Ok(ConnectionSpec::new(profile, device).with_timeout(timeout))
    }
}

impl Amount {
    pub fn to_money(&self) -> Result<Money, PrintError> {
        match self {
            Amount::Text(s) => s.parse(),
            Amount::Number(n) => n.to_string().parse(),
        }
    }
}

impl ReceiptContent {
    /// Build the receipt; the logo is fitted to the profile's head width.
    pub fn to_receipt(&self, profile: PrinterProfile) -> Result<Receipt, PrintError> {
        let mut receipt = Receipt::new();

        if let Some(logo) = self.logo.as_deref().filter(|l| !l.trim().is_empty()) {
            receipt = receipt.logo(decode_logo(logo, profile.table().width_dots)?);
        }
        if let Some(header) = &self.header {
            receipt = receipt.header(header.clone());
        }
        for item in self.items.iter().flatten() {
            let price = item
                .price
                .to_money()
                .map_err(|e| in_field(format!("price of '{}'", item.name), e))?;
            receipt = receipt.item(LineItem::new(item.name.clone(), item.qty, price)?);
        }
        if let Some(total) = &self.total {
            let total = total.to_money().map_err(|e| in_field("total".into(), e))?;
            receipt = receipt.total(total);
        }
        if let Some(footer) = &self.footer {
            receipt = receipt.footer(footer.clone());
        }

        Ok(receipt)
    }
}

/// Prefix an encoding error with the field it came from.
fn in_field(field: String, err: PrintError) -> PrintError {
    match err {
        PrintError::Encoding(msg) => PrintError::encoding(format!("{}: {}", field, msg)),
        other => other,
    }
}

impl PrintRequest {
    /// Validate the whole request before any device is touched.
    pub fn prepare(&self, default_timeout: Duration) -> Result<(ConnectionSpec, Receipt), PrintError> {
        let spec = self.config.to_spec(default_timeout)?;
        let receipt = self.content.to_receipt(spec.profile)?;
        Ok((spec, receipt))
    }
}
