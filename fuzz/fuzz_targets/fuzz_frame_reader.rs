#![no_main]

use h2_frame::FrameReader;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut reader = FrameReader::new(Cursor::new(data));
    if reader.read_preface().is_err() {
        return;
    }

    // The iterator must terminate on any input
    for frame in reader.frames() {
        if frame.is_err() {
            break;
        }
    }
});
