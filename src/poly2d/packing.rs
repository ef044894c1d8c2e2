//! Packing of small-alphabet symbol streams into base64 text.
//!
//! Symbols of `bits` width are grouped `6 / bits` at a time into one 6-bit
//! base64 digit, first symbol in the high bits. The final group is padded
//! with zero symbols and the number of padding symbols is returned so the
//! decoder can drop them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::VcdError;

fn symbols_per_digit(bits: u32) -> Result<usize, VcdError> {
    match bits {
        1 | 2 | 3 | 6 => Ok((6 / bits) as usize),
        other => Err(VcdError::ChainCode(format!(
            "bit width {} does not divide a base64 digit",
            other
        ))),
    }
}

/// Packs `symbols` into base64 digits. Returns the text and the number of
/// zero symbols appended as padding.
pub fn pack_symbols(symbols: &[u8], bits: u32) -> Result<(String, usize), VcdError> {
    let per_digit = symbols_per_digit(bits)?;
    let limit = 1u16 << bits;
    if let Some(bad) = symbols.iter().find(|&&s| u16::from(s) >= limit) {
        return Err(VcdError::ChainCode(format!(
            "symbol {} does not fit in {} bit(s)",
            bad, bits
        )));
    }

    let rest = (per_digit - symbols.len() % per_digit) % per_digit;
    let mut digits: Vec<u8> = symbols
        .chunks(per_digit)
        .map(|group| {
            (0..per_digit).fold(0u8, |acc, j| {
                let symbol = group.get(j).copied().unwrap_or(0);
                acc | symbol << ((per_digit - 1 - j) as u32 * bits)
            })
        })
        .collect();
    let digit_count = digits.len();

    // Whole base64 quanta: 4 digits per 3 bytes.
    digits.resize(digit_count.div_ceil(4) * 4, 0);
    let bytes: Vec<u8> = digits
        .chunks_exact(4)
        .flat_map(|q| {
            [
                q[0] << 2 | q[1] >> 4,
                (q[1] & 0x0f) << 4 | q[2] >> 2,
                (q[2] & 0x03) << 6 | q[3],
            ]
        })
        .collect();

    let mut text = STANDARD.encode(bytes);
    text.truncate(digit_count);
    Ok((text, rest))
}

/// Inverse of [`pack_symbols`].
pub fn unpack_symbols(text: &str, bits: u32, rest: usize) -> Result<Vec<u8>, VcdError> {
    let per_digit = symbols_per_digit(bits)?;
    if text.contains('=') {
        return Err(VcdError::ChainCode(
            "padding characters are not allowed in a chain code".to_string(),
        ));
    }
    if rest >= per_digit {
        return Err(VcdError::ChainCode(format!(
            "rest {} must be smaller than {} symbols per digit",
            rest, per_digit
        )));
    }
    if text.is_empty() {
        if rest != 0 {
            return Err(VcdError::ChainCode(
                "rest is non-zero for an empty chain code".to_string(),
            ));
        }
        return Ok(Vec::new());
    }

    let digit_count = text.len();
    let mut padded = text.to_string();
    while padded.len() % 4 != 0 {
        padded.push('A');
    }
    let bytes = STANDARD
        .decode(padded.as_bytes())
        .map_err(|e| VcdError::ChainCode(format!("invalid base64 chain code: {}", e)))?;

    let digits = bytes.chunks_exact(3).flat_map(|b| {
        [
            b[0] >> 2,
            (b[0] & 0x03) << 4 | b[1] >> 4,
            (b[1] & 0x0f) << 2 | b[2] >> 6,
            b[2] & 0x3f,
        ]
    });

    let mask = ((1u16 << bits) - 1) as u8;
    let mut symbols: Vec<u8> = digits
        .take(digit_count)
        .flat_map(|digit| {
            (0..per_digit).map(move |j| digit >> ((per_digit - 1 - j) as u32 * bits) & mask)
        })
        .collect();

    let keep = symbols.len() - rest;
    if symbols[keep..].iter().any(|&s| s != 0) {
        return Err(VcdError::ChainCode(
            "padding symbols of a chain code must be zero".to_string(),
        ));
    }
    symbols.truncate(keep);
    Ok(symbols)
}
