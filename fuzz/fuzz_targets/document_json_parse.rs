//! Fuzz target for document JSON parsing.
//!
//! Arbitrary bytes go through the document reader; anything that parses is
//! also checked and written back out.

#![no_main]

use libfuzzer_sys::fuzz_target;
use openlabel::model::io_json::from_json_slice;
use openlabel::sanity::check_document;
use openlabel::Vcd;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok((dialect, document)) = from_json_slice(data) {
        let vcd = Vcd::from_document(dialect, document);
        let _ = check_document(&vcd);
        let _ = vcd.to_json_string(false);
    }
});
