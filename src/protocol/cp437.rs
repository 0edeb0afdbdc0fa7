//! # Code Page 437 Encoding
//!
//! Converts Unicode text to the single-byte PC437 code page that both the
//! Epson and Star profiles select at the start of a job. ASCII passes
//! through unchanged; characters outside PC437 become `?`.
//!
//! One input character always produces exactly one output byte, so the
//! character count of a line equals its printed column count.

use tracing::warn;

/// PC437 bytes 0x80..=0xFF, sixteen per row.
const UPPER_HALF: [&str; 8] = [
    "ÇüéâäàåçêëèïîìÄÅ",
    "ÉæÆôöòûùÿÖÜ¢£¥₧ƒ",
    "áíóúñÑªº¿⌐¬½¼¡«»",
    "░▒▓│┤╡╢╖╕╣║╗╝╜╛┐",
    "└┴┬├─┼╞╟╚╔╩╦╠═╬╧",
    "╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀",
    "αßΓπΣσµτΦΘΩδ∞φε∩",
    "≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{00A0}",
];

/// Encode a Unicode string as PC437 bytes.
///
/// ```
/// use tillprint::protocol::cp437;
///
/// assert_eq!(cp437::encode("Café"), vec![b'C', b'a', b'f', 0x82]);
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

fn encode_char(ch: char) -> u8 {
    if ch.is_ascii() {
        return ch as u8;
    }
    match lookup(ch) {
        Some(byte) => byte,
        None => {
            warn!(
                character = %ch,
                codepoint = ch as u32,
                "no PC437 mapping, printing '?'"
            );
            b'?'
        }
    }
}

fn lookup(ch: char) -> Option<u8> {
    UPPER_HALF.iter().enumerate().find_map(|(row, chars)| {
        chars
            .chars()
            .position(|c| c == ch)
            .map(|col| 0x80 + (row * 16 + col) as u8)
    })
}
