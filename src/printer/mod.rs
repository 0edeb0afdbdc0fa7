//! # Printer Module
//!
//! Vendor profiles and their byte tables.
//!
//! ## Modules
//!
//! - [`profile`]: `PrinterProfile` and the per-vendor `ProfileTable`

pub mod profile;

pub use profile::{PrinterProfile, ProfileTable};
