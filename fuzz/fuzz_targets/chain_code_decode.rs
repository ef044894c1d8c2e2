//! Fuzz target for SRF6DCC chain-code decoding.
//!
//! The first 16 bytes pick the start point over the full `i64` range, the
//! next one picks `rest`, and the remainder is used as the packed code text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use openlabel::poly2d::{decode, encode, ChainCode};

const HEADER: usize = 17;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER || data.len() > 64 * 1024 {
        return;
    }

    let Ok(code) = std::str::from_utf8(&data[HEADER..]) else {
        return;
    };
    let coordinate = |bytes: &[u8]| {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        i64::from_le_bytes(raw)
    };
    let chain_code = ChainCode {
        xinit: coordinate(&data[0..8]),
        yinit: coordinate(&data[8..16]),
        rest: usize::from(data[16] % 4),
        code: code.to_string(),
    };

    if let Ok(points) = decode(&chain_code) {
        // a decoded polygon always re-encodes
        assert!(encode(&points).is_ok());
    }
});
