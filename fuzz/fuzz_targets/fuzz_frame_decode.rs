#![no_main]

use bytes::BytesMut;
use h2_frame::{Frame, FrameDecoder, FrameEncoder, FrameType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = FrameDecoder::new();
    let encoder = FrameEncoder::new();
    let mut buf = BytesMut::from(data);

    // Decode frames until we run out of data or hit an error
    loop {
        match decoder.decode(&mut buf) {
            Ok(Some(frame)) => {
                assert!(frame.stream_id().value() <= 0x7fff_ffff);

                match &frame {
                    Frame::Settings(f) => {
                        let _ = f.ack;
                        let _ = f.parameters();
                    }
                    Frame::WindowUpdate(f) => {
                        assert!(f.window_size_increment <= 0x7fff_ffff);
                    }
                    Frame::Headers(f) => {
                        let used = f.fragment.len() + f.pad_length as usize;
                        assert!(used <= f.header.length as usize);
                    }
                    Frame::Skipped(f) => {
                        assert!(!matches!(
                            f.header.frame_type,
                            FrameType::Settings | FrameType::WindowUpdate | FrameType::Headers
                        ));
                    }
                }

                // Re-encoding a decoded frame must decode to the same variant
                let mut encoded = BytesMut::new();
                encoder
                    .encode(&frame, &mut encoded)
                    .expect("a decoded frame re-encodes within the size limit");
                if let Ok(Some(again)) = decoder.decode(&mut encoded) {
                    assert_eq!(again.frame_type(), frame.frame_type());
                    assert_eq!(again.stream_id(), frame.stream_id());
                }
            }
            // Need more data
            Ok(None) => break,
            // Parse error - expected for malformed input
            Err(_) => break,
        }
    }
});
