//! # Table Row Layout
//!
//! Lays a [`TableRow`](super::PrintOperation::TableRow) out as one
//! fixed-width line of text.
//!
//! ```text
//! line_width = 42, columns = [60% left, 10% right, 30% right]
//!
//! |Widget                   |  2x|        5.00|
//!  ^ 25 chars                ^ 4  ^ 13 (absorbs the rounding remainder)
//! ```
//!
//! Cells never wrap: overflowing text keeps its left-most characters.

use super::ops::{Align, Column};
use crate::error::PrintError;

const FRACTION_EPSILON: f64 = 1e-6;

/// Character width of each column for a given line width.
///
/// Each column gets `floor(fraction * line_width)`. When the fractions add
/// up to the whole line, the last column absorbs what flooring left over so
/// the row ends flush with the right margin.
pub fn column_widths(columns: &[Column], line_width: usize) -> Result<Vec<usize>, PrintError> {
    let mut total_fraction = 0.0;
    for col in columns {
        let f = col.width_fraction;
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(PrintError::encoding(format!(
                "table column width {} is outside (0, 1]",
                f
            )));
        }
        total_fraction += f;
    }
    if total_fraction > 1.0 + FRACTION_EPSILON {
        return Err(PrintError::encoding(format!(
            "table column widths add up to {:.3}, more than the full line",
            total_fraction
        )));
    }

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| (c.width_fraction * line_width as f64 + FRACTION_EPSILON).floor() as usize)
        .collect();

    if (total_fraction - 1.0).abs() <= FRACTION_EPSILON {
        let used: usize = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += line_width.saturating_sub(used);
        }
    }

    Ok(widths)
}

/// Render a row to a string of at most `line_width` characters.
pub fn layout_row(columns: &[Column], line_width: usize) -> Result<String, PrintError> {
    let widths = column_widths(columns, line_width)?;
    let mut line = String::with_capacity(line_width);
    for (col, width) in columns.iter().zip(widths) {
        line.push_str(&fit(&col.text, width, col.align));
    }
    Ok(line)
}

/// Pad or truncate `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize, align: Align) -> String {
    let cell: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(width)
        .collect();
    let pad = width - cell.chars().count();

    let (left, right) = match align {
        Align::Left => (0, pad),
        Align::Right => (pad, 0),
        Align::Center => (pad / 2, pad - pad / 2),
    };

    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(&cell);
    out.extend(std::iter::repeat_n(' ', right));
    out
}
