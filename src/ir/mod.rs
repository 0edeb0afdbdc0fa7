//! # Print Operations and Encoding
//!
//! The layer between a receipt and raw printer bytes:
//!
//! ```text
//! ┌─────────┐  compose  ┌──────────────────────┐  encode(profile)  ┌───────┐
//! │ Receipt │ ────────► │ Vec<PrintOperation>  │ ────────────────► │ bytes │
//! └─────────┘           └──────────────────────┘                   └───────┘
//! ```
//!
//! Operations can be inspected and asserted on in tests without a printer;
//! the encoder is the only place that knows vendor bytes.
//!
//! ## Example
//!
//! ```
//! use tillprint::ir::{encode, Align, PrintOperation};
//! use tillprint::printer::PrinterProfile;
//!
//! let ops = vec![
//!     PrintOperation::SetAlign(Align::Center),
//!     PrintOperation::SetEmphasis(true),
//!     PrintOperation::Text("HELLO".into()),
//!     PrintOperation::SetEmphasis(false),
//!     PrintOperation::Cut,
//! ];
//!
//! let bytes = encode(&ops, PrinterProfile::GenericB)?;
//! # Ok::<(), tillprint::PrintError>(())
//! ```

mod codegen;
mod ops;
pub mod table;

pub use codegen::encode;
pub use ops::*;
