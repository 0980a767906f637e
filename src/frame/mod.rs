//! HTTP/2 frame types and parsing.
//!
//! HTTP/2 frames have a common 9-byte header:
//! ```text
//! +-----------------------------------------------+
//! |                 Length (24)                   |
//! +---------------+---------------+---------------+
//! |   Type (8)    |   Flags (8)   |
//! +-+-------------+---------------+-------------------------------+
//! |R|                 Stream Identifier (31)                      |
//! +=+=============================================================+
//! |                   Frame Payload (0...)                      ...
//! +---------------------------------------------------------------+
//! ```
//!
//! Only SETTINGS, WINDOW_UPDATE and HEADERS payloads are parsed. Every other
//! frame type is skipped or rejected according to
//! [`UnknownFramePolicy`](crate::config::UnknownFramePolicy).

mod cursor;
mod decode;
mod encode;
mod error;
mod preface;
mod types;

pub use cursor::PayloadCursor;
pub use decode::FrameDecoder;
pub use encode::FrameEncoder;
pub use error::{DecodeError, EncodeError, ErrorCode};
pub use preface::{CONNECTION_PREFACE, PREFACE_LEN, validate as validate_preface};
pub use types::*;

/// Maximum frame size allowed by RFC 7540 (2^24 - 1).
pub const MAX_FRAME_SIZE: u32 = 16_777_215;

/// Default maximum frame size (16 KB).
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 9;

/// Size of one SETTINGS parameter record.
pub const SETTING_RECORD_SIZE: usize = 6;
