//! # Boundary API
//!
//! The request/response surface used by front ends: `listDevices`,
//! `testConnection` and `printReceipt`. Every failure is folded into a
//! `{success, message}` [`PrintResult`](crate::job::PrintResult); nothing
//! escapes as an error.
//!
//! ## Example
//!
//! ```
//! use tillprint::api::PrintRequest;
//!
//! let json = r#"{
//!     "config": {"type": "GENERIC_A", "interface": "/dev/usb/lp0", "connectionType": "serial"},
//!     "content": {
//!         "header": "CORNER SHOP",
//!         "items": [{"name": "Widget", "qty": 2, "price": "5.00"}],
//!         "total": "10.00"
//!     }
//! }"#;
//!
//! let request: PrintRequest = serde_json::from_str(json).unwrap();
//! let (spec, receipt) = request.prepare(std::time::Duration::from_secs(3))?;
//! assert_eq!(receipt.items.len(), 1);
//! assert_eq!(spec.device.path, "/dev/usb/lp0");
//! # Ok::<(), tillprint::PrintError>(())
//! ```

mod convert;
mod schema;
mod service;

pub use schema::{
    Amount, DeviceInfo, ItemRequest, PrintRequest, PrinterConfigRequest, ProfileInfo,
    ReceiptContent,
};
pub use service::PrintService;
