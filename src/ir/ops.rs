//! # Print Operations
//!
//! The semantic operations a receipt is made of. The composer produces them,
//! the encoder turns them into vendor bytes. Order is significant: ESC/POS
//! is a stateful stream, so emphasis-on must precede the text it decorates.

use crate::receipt::ImageBuffer;

/// Horizontal alignment, shared by whole lines and table columns.
///
/// The discriminants are the `n` parameter both Epson and Star expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// One cell of a [`PrintOperation::TableRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub text: String,
    /// Share of the printer's line width, in `(0.0, 1.0]`.
    pub width_fraction: f64,
    pub align: Align,
}

impl Column {
    pub fn new(text: impl Into<String>, width_fraction: f64, align: Align) -> Self {
        Self {
            text: text.into(),
            width_fraction,
            align,
        }
    }

    pub fn left(text: impl Into<String>, width_fraction: f64) -> Self {
        Self::new(text, width_fraction, Align::Left)
    }

    pub fn right(text: impl Into<String>, width_fraction: f64) -> Self {
        Self::new(text, width_fraction, Align::Right)
    }
}

/// Semantic print operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintOperation {
    /// Alignment for subsequent `Text` lines.
    SetAlign(Align),

    /// Bold on/off.
    SetEmphasis(bool),

    /// Pre-packed 1-bit raster. Skipped by profiles without raster support.
    Image(ImageBuffer),

    /// One printed line (a line feed is appended by the encoder).
    Text(String),

    /// Fixed-width row laid out across the full line width.
    TableRow(Vec<Column>),

    /// Horizontal rule across the full line width.
    Rule,

    /// Empty line.
    FeedLine,

    /// Feed to the blade and cut. Must be the last operation.
    Cut,
}

impl PrintOperation {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PrintOperation::SetAlign(_) => "SetAlign",
            PrintOperation::SetEmphasis(_) => "SetEmphasis",
            PrintOperation::Image(_) => "Image",
            PrintOperation::Text(_) => "Text",
            PrintOperation::TableRow(_) => "TableRow",
            PrintOperation::Rule => "Rule",
            PrintOperation::FeedLine => "FeedLine",
            PrintOperation::Cut => "Cut",
        }
    }
}
