//! HTTP/2 frame decoding.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use super::cursor::PayloadCursor;
use super::error::DecodeError;
use super::types::*;
use super::{FRAME_HEADER_SIZE, SETTING_RECORD_SIZE};
use crate::config::{ConfigError, DecoderConfig, SettingsLengthPolicy, UnknownFramePolicy};

impl FrameHeader {
    /// Decode a frame header from the first 9 bytes of `bytes`.
    ///
    /// The reserved high bit of the stream identifier is discarded. Unknown
    /// type codes are kept as [`FrameType::Unknown`].
    pub fn decode(bytes: &[u8]) -> Result<FrameHeader, DecodeError> {
        if bytes.len() < FRAME_HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader {
                available: bytes.len(),
            });
        }

        let mut buf = &bytes[..FRAME_HEADER_SIZE];

        // Length is 24 bits (3 bytes), big-endian
        let length = buf.get_uint(3) as u32;
        let frame_type = FrameType::from_u8(buf.get_u8());
        let flags = buf.get_u8();
        let stream_id = StreamId::new(buf.get_u32());

        Ok(FrameHeader {
            length,
            frame_type,
            flags,
            stream_id,
        })
    }
}

/// Frame decoder that turns a header and its buffered payload into a [`Frame`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    config: DecoderConfig,
}

impl FrameDecoder {
    /// Create a new frame decoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder from `config`, rejecting it if it fails
    /// [`DecoderConfig::validate`].
    pub fn with_config(config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Set the maximum frame size accepted by [`FrameDecoder::decode`].
    ///
    /// The size must lie between 16384 and 16777215. On error the current
    /// limit is kept.
    pub fn set_max_frame_size(&mut self, size: u32) -> Result<(), ConfigError> {
        let config = DecoderConfig {
            max_frame_size: size,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Try to decode a frame from the buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol error.
    ///
    /// On success, the consumed bytes are removed from the buffer.
    pub fn decode(&self, buf: &mut BytesMut) -> Result<Option<Frame>, DecodeError> {
        // Need at least the header
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let header = FrameHeader::decode(&buf[..])?;

        if header.length > self.config.max_frame_size {
            return Err(DecodeError::FrameTooLarge {
                size: header.length,
                max: self.config.max_frame_size,
            });
        }

        // Check if we have the full frame
        let total_len = FRAME_HEADER_SIZE + header.length as usize;
        if buf.len() < total_len {
            return Ok(None);
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(header.length as usize).freeze();

        self.parse(header, payload).map(Some)
    }

    /// Parse a frame given its header and complete payload.
    ///
    /// `payload` must hold exactly `header.length` bytes. The parser for
    /// the frame type has to consume all of it.
    pub fn parse(&self, header: FrameHeader, payload: Bytes) -> Result<Frame, DecodeError> {
        trace!(
            length = header.length,
            frame_type = %header.frame_type,
            flags = header.flags,
            stream_id = header.stream_id.value(),
            "frame header"
        );

        let declared = header.length as usize;
        if payload.len() < declared {
            return Err(DecodeError::BufferUnderrun {
                requested: declared,
                remaining: payload.len(),
            });
        }
        if payload.len() > declared {
            return Err(DecodeError::InvalidPayloadLength {
                frame_type: header.frame_type.to_u8(),
                expected: declared,
                actual: payload.len(),
            });
        }

        let cursor = PayloadCursor::new(payload);

        match header.frame_type {
            FrameType::Settings => self.parse_settings(header, cursor),
            FrameType::WindowUpdate => self.parse_window_update(header, cursor),
            FrameType::Headers => self.parse_headers(header, cursor),
            FrameType::Data
            | FrameType::Priority
            | FrameType::RstStream
            | FrameType::PushPromise
            | FrameType::Ping
            | FrameType::GoAway
            | FrameType::Continuation
            | FrameType::Unknown(_) => self.skip_frame(header),
        }
    }

    /// Handle a frame type that has no payload parser.
    fn skip_frame(&self, header: FrameHeader) -> Result<Frame, DecodeError> {
        match self.config.unknown_frames {
            UnknownFramePolicy::Skip => {
                debug!(
                    frame_type = %header.frame_type,
                    length = header.length,
                    "skipping frame"
                );
                Ok(Frame::Skipped(SkippedFrame { header }))
            }
            UnknownFramePolicy::Reject => Err(DecodeError::UnsupportedFrameType {
                frame_type: header.frame_type.to_u8(),
            }),
        }
    }

    /// Parse SETTINGS frame.
    fn parse_settings(
        &self,
        header: FrameHeader,
        mut cursor: PayloadCursor,
    ) -> Result<Frame, DecodeError> {
        let length = cursor.remaining_len();
        let partial = length % SETTING_RECORD_SIZE;

        if partial != 0 {
            match self.config.settings_length {
                SettingsLengthPolicy::Strict => {
                    return Err(DecodeError::MalformedSettingsPayload { length });
                }
                SettingsLengthPolicy::Truncate => {
                    debug!(length, dropped = partial, "dropping partial SETTINGS record");
                }
            }
        }

        let mut settings = SettingsFrame::new(header);

        // Later records for the same identifier overwrite earlier ones
        while cursor.remaining_len() >= SETTING_RECORD_SIZE {
            let id = cursor.read_u16_be()?;
            let value = cursor.read_u32_be()?;

            if !settings.set(SettingId::from_u16(id), value) {
                debug!(id, value, "ignoring unknown SETTINGS parameter");
            }
        }

        cursor.skip(partial)?;

        Ok(Frame::Settings(settings))
    }

    /// Parse WINDOW_UPDATE frame.
    fn parse_window_update(
        &self,
        header: FrameHeader,
        mut cursor: PayloadCursor,
    ) -> Result<Frame, DecodeError> {
        if cursor.remaining_len() > 4 {
            return Err(DecodeError::InvalidPayloadLength {
                frame_type: header.frame_type.to_u8(),
                expected: 4,
                actual: cursor.remaining_len(),
            });
        }

        // A zero increment is passed through; rejecting it is up to the caller
        let window_size_increment = cursor.read_u32_be()? & STREAM_ID_MASK;

        Ok(Frame::WindowUpdate(WindowUpdateFrame {
            header,
            window_size_increment,
        }))
    }

    /// Parse HEADERS frame.
    fn parse_headers(
        &self,
        header: FrameHeader,
        mut cursor: PayloadCursor,
    ) -> Result<Frame, DecodeError> {
        let pad_length = if header.has_flag(flags::PADDED) {
            cursor.read_u8()?
        } else {
            0
        };

        let (stream_dependency, stream_dependency_exclusive, stream_weight) =
            if header.has_flag(flags::PRIORITY) {
                let first = cursor.read_u32_be()?;
                let weight = cursor.read_u8()?;
                (
                    StreamId::new(first),
                    (first & 0x8000_0000) != 0,
                    weight,
                )
            } else {
                (StreamId::CONNECTION, false, DEFAULT_STREAM_WEIGHT)
            };

        // Padding length must not exceed remaining payload
        let available = cursor.remaining_len();
        if pad_length as usize > available {
            return Err(DecodeError::InvalidPadding {
                pad_length,
                available,
            });
        }

        let fragment = cursor.read_bytes(available - pad_length as usize)?;
        cursor.skip(pad_length as usize)?;

        Ok(Frame::Headers(HeadersFrame {
            header,
            pad_length,
            stream_dependency,
            stream_dependency_exclusive,
            stream_weight,
            fragment,
            is_stream_end: header.has_flag(flags::END_STREAM),
            is_headers_end: header.has_flag(flags::END_HEADERS),
        }))
    }
}
