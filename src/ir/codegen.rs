//! # Code Generation
//!
//! Converts a sequence of [`PrintOperation`]s into the raw byte stream for a
//! [`PrinterProfile`]. Encoding is a pure function of its inputs: the
//! profile table is immutable and no state survives between calls.

use tracing::{debug, warn};

use super::ops::PrintOperation;
use super::table::layout_row;
use crate::error::PrintError;
use crate::printer::{PrinterProfile, ProfileTable};
use crate::protocol::{commands, cp437};
use crate::receipt::ImageBuffer;

/// Maximum rows per raster command, to stay inside the head's buffer.
const RASTER_CHUNK_ROWS: usize = 256;

/// Encode operations for a profile.
///
/// The stream starts with the profile preamble (initialize + code page) and
/// ends with the profile's cut, which must be the final operation and must
/// appear exactly once.
///
/// ```
/// use tillprint::ir::{encode, PrintOperation};
/// use tillprint::printer::PrinterProfile;
///
/// let bytes = encode(
///     &[PrintOperation::Text("Hello".into()), PrintOperation::Cut],
///     PrinterProfile::GenericA,
/// )?;
/// assert!(bytes.ends_with(&[0x1D, 0x56, 0x41, 0x03]));
/// # Ok::<(), tillprint::PrintError>(())
/// ```
pub fn encode(ops: &[PrintOperation], profile: PrinterProfile) -> Result<Vec<u8>, PrintError> {
    check_single_trailing_cut(ops)?;

    let table = profile.table();
    let mut out = (table.preamble)();

    for op in ops {
        match op {
            PrintOperation::SetAlign(align) => out.extend((table.align)(*align)),
            PrintOperation::SetEmphasis(on) => out.extend((table.emphasis)(*on)),
            PrintOperation::Image(image) => encode_image(&mut out, image, table, profile)?,
            PrintOperation::Text(line) => {
                out.extend(cp437::encode(&sanitize(line)));
                out.extend(commands::line_feed());
            }
            PrintOperation::TableRow(columns) => {
                let line = layout_row(columns, table.line_width)?;
                out.extend(cp437::encode(&line));
                out.extend(commands::line_feed());
            }
            PrintOperation::Rule => {
                out.extend(std::iter::repeat_n(b'-', table.line_width));
                out.extend(commands::line_feed());
            }
            PrintOperation::FeedLine => out.extend(commands::line_feed()),
            PrintOperation::Cut => out.extend((table.cut)()),
        }
    }

    debug!(
        profile = %profile,
        operations = ops.len(),
        bytes = out.len(),
        "encoded operations"
    );
    Ok(out)
}

fn check_single_trailing_cut(ops: &[PrintOperation]) -> Result<(), PrintError> {
    let cuts = ops
        .iter()
        .filter(|op| matches!(op, PrintOperation::Cut))
        .count();
    let ends_with_cut = matches!(ops.last(), Some(PrintOperation::Cut));
    if cuts == 1 && ends_with_cut {
        Ok(())
    } else {
        Err(PrintError::encoding(format!(
            "a job must end with exactly one Cut (found {}, last operation {})",
            cuts,
            ops.last().map_or("none", PrintOperation::name)
        )))
    }
}

fn encode_image(
    out: &mut Vec<u8>,
    image: &ImageBuffer,
    table: &ProfileTable,
    profile: PrinterProfile,
) -> Result<(), PrintError> {
    let Some(raster) = table.raster else {
        warn!(profile = %profile, "profile has no raster command, skipping Image");
        return Ok(());
    };
    if image.is_empty() {
        return Ok(());
    }
    image.validate()?;
    if image.width > table.width_dots {
        return Err(PrintError::encoding(format!(
            "image is {} dots wide but {} prints at most {}",
            image.width, profile, table.width_dots
        )));
    }

    let width_bytes = image.width_bytes();
    for rows in image.data.chunks(width_bytes * RASTER_CHUNK_ROWS) {
        let chunk_height = rows.len() / width_bytes;
        out.extend(raster(image.width, chunk_height as u16, rows));
    }
    Ok(())
}

/// Control bytes inside text would be interpreted as commands.
fn sanitize(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
