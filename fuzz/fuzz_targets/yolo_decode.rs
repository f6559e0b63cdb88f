//! Fuzz target for decoding whole YOLO sidecar files.
//!
//! Arbitrary UTF-8 text must decode (possibly to nothing) without panicking.

#![no_main]

use boxlabel::annotation::io_yolo::fuzz_decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_decode(text);
});
