//! # Error Types
//!
//! Every failure a print job can hit maps onto one [`PrintError`] variant.
//! The `Display` output of each variant is what ends up in a job's
//! [`PrintResult`](crate::job::PrintResult) message, so the strings are
//! written for the person standing next to the printer.

use thiserror::Error;

/// Main error type for tillprint operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    /// Enumeration or open failed: device missing, busy, or permission denied
    #[error("DeviceUnavailable: {0}")]
    DeviceUnavailable(String),

    /// Opening the device did not finish within the configured bound
    #[error("ConnectionTimeout: {0}")]
    ConnectionTimeout(String),

    /// The device opened but failed the post-open liveness check
    #[error("Printer not connected.")]
    NotConnected,

    /// Unrecognized printer type string
    #[error("UnknownProfile: '{0}' is not a supported printer type")]
    UnknownProfile(String),

    /// Static input-validation failure (addressing key, receipt field, operation)
    #[error("EncodingError: {0}")]
    Encoding(String),

    /// I/O failure while writing the encoded stream
    #[error("TransportWriteError: {}", describe_write_failure(.reason, .written))]
    TransportWrite { reason: String, written: usize },
}

impl PrintError {
    /// Taxonomy name of this error, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            PrintError::DeviceUnavailable(_) => "DeviceUnavailable",
            PrintError::ConnectionTimeout(_) => "ConnectionTimeout",
            PrintError::NotConnected => "NotConnected",
            PrintError::UnknownProfile(_) => "UnknownProfile",
            PrintError::Encoding(_) => "EncodingError",
            PrintError::TransportWrite { .. } => "TransportWriteError",
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        PrintError::Encoding(msg.into())
    }

    pub fn write_failed(reason: impl Into<String>, written: usize) -> Self {
        PrintError::TransportWrite {
            reason: reason.into(),
            written,
        }
    }
}

fn describe_write_failure(reason: &str, written: &usize) -> String {
    if *written == 0 {
        format!("{} (nothing was sent to the printer)", reason)
    } else {
        format!(
            "{} after {} bytes were sent; the printer may have printed part of the job",
            reason, written
        )
    }
}
