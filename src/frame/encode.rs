//! HTTP/2 frame encoding.

use bytes::{BufMut, BytesMut};

use super::error::EncodeError;
use super::types::*;
use super::{FRAME_HEADER_SIZE, MAX_FRAME_SIZE, SETTING_RECORD_SIZE};

/// Fail if `length` does not fit the 24-bit length field.
fn check_length(length: usize) -> Result<u32, EncodeError> {
    if length > MAX_FRAME_SIZE as usize {
        return Err(EncodeError::FrameTooLarge {
            size: length,
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(length as u32)
}

impl FrameHeader {
    /// Encode the header into its 9-byte wire form.
    ///
    /// The reserved bit is always written as zero. Fails if `length` does
    /// not fit in 24 bits.
    pub fn encode(&self) -> Result<[u8; FRAME_HEADER_SIZE], EncodeError> {
        let length = check_length(self.length as usize)?.to_be_bytes();
        let stream_id = (self.stream_id.value() & STREAM_ID_MASK).to_be_bytes();

        Ok([
            length[1],
            length[2],
            length[3],
            self.frame_type.to_u8(),
            self.flags,
            stream_id[0],
            stream_id[1],
            stream_id[2],
            stream_id[3],
        ])
    }

    /// Append the encoded header to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        buf.put_slice(&self.encode()?);
        Ok(())
    }
}

/// Frame encoder that writes HTTP/2 frames to a byte buffer.
///
/// The written header is derived from the frame contents: length and the
/// ACK, PADDED and PRIORITY flags are recomputed, other flags and the
/// stream id come from the frame's stored header. A frame whose payload
/// does not fit in 24 bits fails with [`EncodeError::FrameTooLarge`] and
/// leaves the buffer untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEncoder;

impl FrameEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a frame to the buffer.
    ///
    /// A skipped frame has no retained payload and is written with an
    /// empty one.
    pub fn encode(&self, frame: &Frame, buf: &mut BytesMut) -> Result<(), EncodeError> {
        match frame {
            Frame::Settings(f) => self.encode_settings(f, buf),
            Frame::WindowUpdate(f) => self.encode_window_update(f, buf),
            Frame::Headers(f) => self.encode_headers(f, buf),
            Frame::Skipped(f) => {
                let header = FrameHeader {
                    length: 0,
                    ..f.header
                };
                header.encode_into(buf)
            }
        }
    }

    /// Encode a SETTINGS frame.
    ///
    /// Only non-zero parameters are written, since an absent parameter
    /// decodes as zero here. Peers read an absent parameter as its RFC 7540
    /// default instead (ENABLE_PUSH 1, INITIAL_WINDOW_SIZE 65535), so an
    /// explicit zero cannot be announced to them through this encoder.
    pub fn encode_settings(
        &self,
        frame: &SettingsFrame,
        buf: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let parameters = frame.parameters();
        let length = check_length(parameters.len() * SETTING_RECORD_SIZE)?;

        let mut frame_flags = frame.header.flags & !flags::ACK;
        if frame.ack {
            frame_flags |= flags::ACK;
        }

        buf.reserve(FRAME_HEADER_SIZE + length as usize);
        FrameHeader::new(
            FrameType::Settings,
            frame_flags,
            frame.header.stream_id,
            length,
        )
        .encode_into(buf)?;

        for (id, value) in parameters {
            buf.put_u16(id.to_u16());
            buf.put_u32(value);
        }
        Ok(())
    }

    /// Encode a WINDOW_UPDATE frame.
    pub fn encode_window_update(
        &self,
        frame: &WindowUpdateFrame,
        buf: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        buf.reserve(FRAME_HEADER_SIZE + 4);
        FrameHeader::new(
            FrameType::WindowUpdate,
            frame.header.flags,
            frame.header.stream_id,
            4,
        )
        .encode_into(buf)?;
        buf.put_u32(frame.window_size_increment & STREAM_ID_MASK);
        Ok(())
    }

    /// Encode a HEADERS frame, zero-filling any padding.
    pub fn encode_headers(
        &self,
        frame: &HeadersFrame,
        buf: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let padded = frame.pad_length > 0 || frame.header.has_flag(flags::PADDED);
        let has_priority = frame.header.has_flag(flags::PRIORITY)
            || frame.stream_dependency_exclusive
            || !frame.stream_dependency.is_connection_level()
            || frame.stream_weight != DEFAULT_STREAM_WEIGHT;

        let mut frame_flags = frame.header.flags
            & !(flags::END_STREAM | flags::END_HEADERS | flags::PADDED | flags::PRIORITY);
        if frame.is_stream_end {
            frame_flags |= flags::END_STREAM;
        }
        if frame.is_headers_end {
            frame_flags |= flags::END_HEADERS;
        }
        if padded {
            frame_flags |= flags::PADDED;
        }
        if has_priority {
            frame_flags |= flags::PRIORITY;
        }

        let pad_field = if padded { 1 + frame.pad_length as usize } else { 0 };
        let priority_len = if has_priority { 5 } else { 0 };
        let length = check_length(pad_field + priority_len + frame.fragment.len())?;

        buf.reserve(FRAME_HEADER_SIZE + length as usize);
        FrameHeader::new(
            FrameType::Headers,
            frame_flags,
            frame.header.stream_id,
            length,
        )
        .encode_into(buf)?;

        if padded {
            buf.put_u8(frame.pad_length);
        }

        if has_priority {
            let mut dep = frame.stream_dependency.value();
            if frame.stream_dependency_exclusive {
                dep |= 0x8000_0000;
            }
            buf.put_u32(dep);
            buf.put_u8(frame.stream_weight);
        }

        buf.extend_from_slice(&frame.fragment);
        buf.put_bytes(0, frame.pad_length as usize);
        Ok(())
    }
}
