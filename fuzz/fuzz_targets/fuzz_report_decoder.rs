//! Fuzz target: `decode_line`
//!
//! Drives arbitrary bytes through the report decoder and asserts that it
//! never panics and that any accepted reading is internally consistent.
//!
//! cargo fuzz run fuzz_report_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use meteostick::sensors::decoder::decode_line;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(reading) = decode_line(line) {
        assert!(reading.signal_bars() <= 4, "bar count out of range");
        assert!(reading.signal_dbm().is_finite(), "non-finite level accepted");
    }
});
