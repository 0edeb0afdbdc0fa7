//! # Printer Profiles
//!
//! A [`PrinterProfile`] names a vendor dialect; its [`ProfileTable`] holds the
//! byte sequence for every semantic operation. Adding a vendor means adding
//! one table and one enum variant.
//!
//! | Profile | Aliases | Columns (font A) | Raster |
//! |---------|---------|------------------|--------|
//! | GenericA | `GENERIC_A`, `EPSON` | 42 | GS v 0 |
//! | GenericB | `GENERIC_B`, `STAR` | 48 | ESC GS S |
//! | GenericC | `GENERIC_C`, `TANCA` | 42 | none |

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;
use crate::ir::Align;
use crate::protocol::{commands, escpos, starprnt};

/// Enumerated vendor identity, chosen once at job start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterProfile {
    /// Epson-compatible ESC/POS
    GenericA,
    /// Star line mode (StarPRNT)
    GenericB,
    /// ESC/POS text-only heads (no raster command)
    GenericC,
}

/// Raw byte forms for one vendor dialect.
#[derive(Debug, Clone, Copy)]
pub struct ProfileTable {
    /// Display name
    pub name: &'static str,

    /// Printable characters per line in font A
    pub line_width: usize,

    /// Printable dots per line, the upper bound for logo width
    pub width_dots: u16,

    /// Sent before the first operation: initialize + code page
    pub preamble: fn() -> Vec<u8>,

    pub align: fn(Align) -> Vec<u8>,

    pub emphasis: fn(bool) -> Vec<u8>,

    /// `None` when the head has no raster command; `Image` is then skipped
    pub raster: Option<fn(u16, u16, &[u8]) -> Vec<u8>>,

    pub cut: fn() -> Vec<u8>,
}

const EPSON: ProfileTable = ProfileTable {
    name: "Generic ESC/POS (Epson)",
    line_width: 42,
    width_dots: 576,
    preamble: escpos_preamble,
    align: escpos::align,
    emphasis: escpos::emphasis,
    raster: Some(escpos::raster),
    cut: escpos_cut,
};

const STAR: ProfileTable = ProfileTable {
    name: "Generic StarPRNT (Star)",
    line_width: 48,
    width_dots: 576,
    preamble: star_preamble,
    align: starprnt::align,
    emphasis: starprnt::emphasis,
    raster: Some(starprnt::raster),
    cut: starprnt::cut_full_feed,
};

const TANCA: ProfileTable = ProfileTable {
    name: "Generic ESC/POS, text only (Tanca)",
    line_width: 42,
    width_dots: 576,
    preamble: escpos_preamble,
    align: escpos::align,
    emphasis: escpos::emphasis,
    raster: None,
    cut: escpos_cut,
};

fn escpos_preamble() -> Vec<u8> {
    let mut out = commands::init();
    out.extend(escpos::codepage_pc437());
    out
}

fn star_preamble() -> Vec<u8> {
    let mut out = commands::init();
    out.extend(starprnt::codepage_pc437());
    out
}

fn escpos_cut() -> Vec<u8> {
    escpos::cut_feed(3)
}

impl PrinterProfile {
    pub const ALL: [PrinterProfile; 3] = [
        PrinterProfile::GenericA,
        PrinterProfile::GenericB,
        PrinterProfile::GenericC,
    ];

    /// Byte table for this profile.
    pub fn table(self) -> &'static ProfileTable {
        match self {
            PrinterProfile::GenericA => &EPSON,
            PrinterProfile::GenericB => &STAR,
            PrinterProfile::GenericC => &TANCA,
        }
    }

    /// Canonical type name accepted at the boundary.
    pub fn id(self) -> &'static str {
        match self {
            PrinterProfile::GenericA => "GENERIC_A",
            PrinterProfile::GenericB => "GENERIC_B",
            PrinterProfile::GenericC => "GENERIC_C",
        }
    }

    /// Vendor alias accepted alongside [`id`](Self::id).
    pub fn vendor_alias(self) -> &'static str {
        match self {
            PrinterProfile::GenericA => "EPSON",
            PrinterProfile::GenericB => "STAR",
            PrinterProfile::GenericC => "TANCA",
        }
    }

    pub fn line_width(self) -> usize {
        self.table().line_width
    }

    pub fn supports_raster(self) -> bool {
        self.table().raster.is_some()
    }
}

impl FromStr for PrinterProfile {
    type Err = PrintError;

    /// Unknown names are rejected; there is no fallback profile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PrinterProfile::ALL
            .into_iter()
            .find(|p| {
                p.id().eq_ignore_ascii_case(wanted) || p.vendor_alias().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PrintError::UnknownProfile(s.to_string()))
    }
}

impl fmt::Display for PrinterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
