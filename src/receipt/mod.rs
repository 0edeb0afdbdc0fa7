//! # Receipt Documents
//!
//! An immutable snapshot of what one job prints, and the composer that turns
//! it into [`PrintOperation`](crate::ir::PrintOperation)s.
//!
//! ## Example
//!
//! ```
//! use tillprint::receipt::{compose, LineItem, Receipt};
//!
//! let receipt = Receipt::new()
//!     .header("CORNER SHOP\n12 High Street")
//!     .item(LineItem::new("Widget", 2, "5.00".parse()?)?)
//!     .total("10.00".parse()?)
//!     .footer("Thank you!");
//!
//! let ops = compose(&receipt);
//! # Ok::<(), tillprint::PrintError>(())
//! ```

mod compose;
mod money;

pub use compose::{compose, test_page};
pub use money::Money;

use std::num::NonZeroU32;

use crate::error::PrintError;

/// A packed 1-bit raster, MSB first, rows top to bottom.
///
/// `data.len()` is always `ceil(width / 8) * height`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageBuffer {
    pub width: u16,
    pub height: u16,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(width: u16, height: u16, data: Vec<u8>) -> Result<Self, PrintError> {
        let image = Self {
            width,
            height,
            data,
        };
        image.validate()?;
        Ok(image)
    }

    #[inline]
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check that the buffer length matches the dimensions.
    pub fn validate(&self) -> Result<(), PrintError> {
        let expected = self.width_bytes() * self.height as usize;
        if self.data.len() != expected {
            return Err(PrintError::encoding(format!(
                "image buffer holds {} bytes, {}x{} needs {}",
                self.data.len(),
                self.width,
                self.height,
                expected
            )));
        }
        Ok(())
    }
}

/// One priced, quantified row on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub qty: NonZeroU32,
    pub price: Money,
}

impl LineItem {
    /// Build a line item; a quantity of zero is rejected.
    pub fn new(name: impl Into<String>, qty: u32, price: Money) -> Result<Self, PrintError> {
        let name = name.into();
        let qty = NonZeroU32::new(qty).ok_or_else(|| {
            PrintError::encoding(format!("item '{}' has quantity 0, expected at least 1", name))
        })?;
        Ok(Self { name, qty, price })
    }
}

/// Everything printed by one job.
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
    pub logo: Option<ImageBuffer>,
    pub header: Option<String>,
    pub items: Vec<LineItem>,
    pub total: Option<Money>,
    pub footer: Option<String>,
}

impl Receipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logo(mut self, image: ImageBuffer) -> Self {
        self.logo = Some(image);
        self
    }

    /// Set the header. Multiple lines are separated by `\n`.
    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(text.into());
        self
    }

    pub fn item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = LineItem>,
    {
        self.items.extend(items);
        self
    }

    pub fn total(mut self, total: Money) -> Self {
        self.total = Some(total);
        self
    }

    /// Set the footer. Multiple lines are separated by `\n`.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }
}
