//! HTTP/2 frame errors.

use std::fmt;

/// HTTP/2 error codes (RFC 7540 Section 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    /// Graceful shutdown.
    NoError = 0x0,
    /// Protocol error detected.
    ProtocolError = 0x1,
    /// Implementation fault.
    InternalError = 0x2,
    /// Flow control limits exceeded.
    FlowControlError = 0x3,
    /// Settings not acknowledged in time.
    SettingsTimeout = 0x4,
    /// Frame received for closed stream.
    StreamClosed = 0x5,
    /// Frame size incorrect.
    FrameSizeError = 0x6,
    /// Stream not processed.
    RefusedStream = 0x7,
    /// Stream cancelled.
    Cancel = 0x8,
    /// Compression state not updated.
    CompressionError = 0x9,
    /// TCP connection error.
    ConnectError = 0xa,
    /// Processing capacity exceeded.
    EnhanceYourCalm = 0xb,
    /// Negotiated TLS requirements not met.
    InadequateSecurity = 0xc,
    /// HTTP/1.1 required.
    Http11Required = 0xd,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::NoError => "NO_ERROR",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::FlowControlError => "FLOW_CONTROL_ERROR",
            ErrorCode::SettingsTimeout => "SETTINGS_TIMEOUT",
            ErrorCode::StreamClosed => "STREAM_CLOSED",
            ErrorCode::FrameSizeError => "FRAME_SIZE_ERROR",
            ErrorCode::RefusedStream => "REFUSED_STREAM",
            ErrorCode::Cancel => "CANCEL",
            ErrorCode::CompressionError => "COMPRESSION_ERROR",
            ErrorCode::ConnectError => "CONNECT_ERROR",
            ErrorCode::EnhanceYourCalm => "ENHANCE_YOUR_CALM",
            ErrorCode::InadequateSecurity => "INADEQUATE_SECURITY",
            ErrorCode::Http11Required => "HTTP_1_1_REQUIRED",
        };
        f.write_str(name)
    }
}

/// Errors raised while decoding the preface, a frame header or a payload.
///
/// None of these are recoverable mid-stream: once a frame fails to decode the
/// read position can no longer be trusted and the connection should be torn
/// down, optionally after sending a GOAWAY carrying [`DecodeError::error_code`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The 24 bytes received do not match the client connection preface.
    #[error("connection preface mismatch")]
    PrefaceMismatch,
    /// The stream ended before a full 9-byte frame header was available.
    #[error("truncated frame header: {available} of 9 bytes available")]
    TruncatedHeader { available: usize },
    /// A payload read asked for more bytes than remain.
    #[error("buffer underrun: requested {requested} bytes, {remaining} remaining")]
    BufferUnderrun { requested: usize, remaining: usize },
    /// A SETTINGS payload whose length is not a multiple of 6.
    #[error("malformed SETTINGS payload: length {length} is not a multiple of 6")]
    MalformedSettingsPayload { length: usize },
    /// The declared pad length exceeds the bytes left in the payload.
    #[error("padding length {pad_length} exceeds available payload {available}")]
    InvalidPadding { pad_length: u8, available: usize },
    /// A frame type without a payload parser, under the reject policy.
    #[error("unsupported frame type 0x{frame_type:02x}")]
    UnsupportedFrameType { frame_type: u8 },
    /// A fixed-size payload carried more bytes than its grammar allows.
    #[error("frame type 0x{frame_type:02x} expected {expected} bytes, got {actual}")]
    InvalidPayloadLength {
        frame_type: u8,
        expected: usize,
        actual: usize,
    },
    /// The declared length is above the configured maximum frame size.
    #[error("frame size {size} exceeds maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },
    /// The underlying byte stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while encoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The payload does not fit the 24-bit length field.
    #[error("frame payload of {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: u32 },
}

impl DecodeError {
    /// The connection error code a peer should be sent for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DecodeError::TruncatedHeader { .. }
            | DecodeError::BufferUnderrun { .. }
            | DecodeError::MalformedSettingsPayload { .. }
            | DecodeError::InvalidPayloadLength { .. }
            | DecodeError::FrameTooLarge { .. } => ErrorCode::FrameSizeError,
            DecodeError::PrefaceMismatch
            | DecodeError::InvalidPadding { .. }
            | DecodeError::UnsupportedFrameType { .. } => ErrorCode::ProtocolError,
            DecodeError::Io(_) => ErrorCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::NoError), "NO_ERROR");
        assert_eq!(format!("{}", ErrorCode::FrameSizeError), "FRAME_SIZE_ERROR");
        assert_eq!(
            format!("{}", ErrorCode::Http11Required),
            "HTTP_1_1_REQUIRED"
        );
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            format!("{}", DecodeError::PrefaceMismatch),
            "connection preface mismatch"
        );
        assert_eq!(
            format!("{}", DecodeError::TruncatedHeader { available: 4 }),
            "truncated frame header: 4 of 9 bytes available"
        );
        assert_eq!(
            format!(
                "{}",
                DecodeError::BufferUnderrun {
                    requested: 10,
                    remaining: 5
                }
            ),
            "buffer underrun: requested 10 bytes, 5 remaining"
        );
        assert_eq!(
            format!("{}", DecodeError::MalformedSettingsPayload { length: 7 }),
            "malformed SETTINGS payload: length 7 is not a multiple of 6"
        );
        assert_eq!(
            format!("{}", DecodeError::UnsupportedFrameType { frame_type: 0x0b }),
            "unsupported frame type 0x0b"
        );
    }

    #[test]
    fn test_decode_error_code_mapping() {
        assert_eq!(
            DecodeError::BufferUnderrun {
                requested: 4,
                remaining: 0
            }
            .error_code(),
            ErrorCode::FrameSizeError
        );
        assert_eq!(
            DecodeError::InvalidPadding {
                pad_length: 9,
                available: 2
            }
            .error_code(),
            ErrorCode::ProtocolError
        );
        assert_eq!(
            DecodeError::PrefaceMismatch.error_code(),
            ErrorCode::ProtocolError
        );
        let io = std::io::Error::other("boom");
        assert_eq!(DecodeError::from(io).error_code(), ErrorCode::InternalError);
    }

    #[test]
    fn test_decode_error_is_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<DecodeError>();
        assert_error::<EncodeError>();
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::FrameTooLarge {
            size: 16_777_216,
            max: 16_777_215,
        };
        assert_eq!(
            err.to_string(),
            "frame payload of 16777216 bytes exceeds maximum 16777215"
        );
    }
}
