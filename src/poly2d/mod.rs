//! SRF6DCC polygon chain-code codec.
//!
//! A polygon given as absolute integer vertices is turned into a stream of
//! direction-relative unit moves (see [`chain`]), straight runs are folded
//! into two run symbols, and the result is packed three bits per symbol into
//! base64 text (see [`packing`]). The persisted value is
//! `[xinit, yinit, rest, code]`, all as strings.
//!
//! Decoding returns the start point, every turning point and the end point,
//! so polygons whose edges run along the 8 chain directions and whose
//! consecutive edges change direction decode to exactly the vertices they
//! were encoded from.

pub mod chain;
pub mod packing;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VcdError;

/// Bits per chain symbol (the alphabet is 0..=7).
pub const CHAIN_CODE_BITS: u32 = 3;

/// How a 2D polygon's `val` is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Poly2dMode {
    #[default]
    #[serde(rename = "MODE_POLY2D_ABSOLUTE")]
    Absolute,
    #[serde(rename = "MODE_POLY2D_SRF6DCC")]
    Srf6dcc,
}

impl Poly2dMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Poly2dMode::Absolute => "MODE_POLY2D_ABSOLUTE",
            Poly2dMode::Srf6dcc => "MODE_POLY2D_SRF6DCC",
        }
    }
}

impl fmt::Display for Poly2dMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded polygon.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChainCode {
    pub xinit: i64,
    pub yinit: i64,
    /// Number of zero symbols appended to fill the last base64 digit.
    pub rest: usize,
    pub code: String,
}

impl ChainCode {
    /// The wire form `[xinit, yinit, rest, code]`.
    pub fn to_strings(&self) -> Vec<String> {
        vec![
            self.xinit.to_string(),
            self.yinit.to_string(),
            self.rest.to_string(),
            self.code.clone(),
        ]
    }

    /// Parses the wire form `[xinit, yinit, rest, code]`.
    pub fn from_strings<S: AsRef<str>>(parts: &[S]) -> Result<Self, VcdError> {
        let [x, y, rest, code] = parts else {
            return Err(VcdError::ChainCode(format!(
                "expected [xinit, yinit, rest, code], got {} value(s)",
                parts.len()
            )));
        };
        let number = |label: &str, text: &str| {
            text.trim().parse::<i64>().map_err(|e| {
                VcdError::ChainCode(format!("{} '{}' is not an integer: {}", label, text, e))
            })
        };
        let rest = rest.as_ref().trim().parse::<usize>().map_err(|e| {
            VcdError::ChainCode(format!(
                "rest '{}' is not a non-negative integer: {}",
                rest.as_ref(),
                e
            ))
        })?;
        Ok(Self {
            xinit: number("xinit", x.as_ref())?,
            yinit: number("yinit", y.as_ref())?,
            rest,
            code: code.as_ref().to_string(),
        })
    }
}

/// Encodes a flat `[x0, y0, x1, y1, ...]` vertex list.
///
/// Fails when a displacement between consecutive vertices does not fit in an
/// `i64`, or when the whole path is longer than [`chain::MAX_PATH_STEPS`].
pub fn encode(points: &[i64]) -> Result<ChainCode, VcdError> {
    let moves = chain::moves_from_points(points)?;
    let symbols = chain::compress_runs(&moves);
    let (code, rest) = packing::pack_symbols(&symbols, CHAIN_CODE_BITS)?;
    Ok(ChainCode {
        xinit: points[0],
        yinit: points[1],
        rest,
        code,
    })
}

/// Decodes a chain code back into a flat vertex list.
///
/// Only the start point, the turning points and the end point are emitted.
/// Collinear intermediate vertices of the encoded polygon are dropped, and an
/// edge that is not along one of the 8 directions comes back as a diagonal
/// part plus an axis part with an extra vertex between them. Fails if the
/// walk leaves the `i64` coordinate range.
pub fn decode(chain_code: &ChainCode) -> Result<Vec<i64>, VcdError> {
    let symbols = packing::unpack_symbols(&chain_code.code, CHAIN_CODE_BITS, chain_code.rest)?;
    chain::points_from_symbols(chain_code.xinit, chain_code.yinit, &symbols)
}
