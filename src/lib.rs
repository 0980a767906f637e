//! h2-frame - HTTP/2 frame layer decoding.
//!
//! This crate decodes the binary frame layer of an HTTP/2 connection: the
//! 24-byte client preface, the fixed 9-byte frame header, and the payloads
//! of SETTINGS, WINDOW_UPDATE and HEADERS frames. Decoding is synchronous
//! and works on fully buffered payloads. There is no shared state, so
//! independent connections decode on independent threads without locking.
//!
//! Stream state, flow-control accounting and HPACK decompression are not
//! provided. Header block fragments are handed back as opaque bytes.
//!
//! # Architecture
//!
//! - `frame`: frame types, the payload cursor, header codec, dispatcher and
//!   per-type payload parsers
//! - `reader`: blocking reader that pulls the preface and frames off an
//!   `std::io::Read` stream
//! - `config`: decoder policies and logging settings, loadable from TOML
//! - `logging`: optional `tracing` subscriber setup for hosting processes
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use h2_frame::{Frame, FrameDecoder};
//!
//! let mut buf = BytesMut::from(
//!     &[
//!         0x00, 0x00, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00, 0x01, // WINDOW_UPDATE, stream 1
//!         0x00, 0x00, 0x10, 0x00, // Increment: 4096
//!     ][..],
//! );
//!
//! match FrameDecoder::new().decode(&mut buf).unwrap() {
//!     Some(Frame::WindowUpdate(update)) => assert_eq!(update.window_size_increment, 4096),
//!     _ => unreachable!(),
//! }
//! ```

pub mod config;
pub mod frame;
pub mod logging;
pub mod reader;

// Re-export commonly used types
pub use frame::{
    CONNECTION_PREFACE, DEFAULT_MAX_FRAME_SIZE, DEFAULT_STREAM_WEIGHT, DecodeError, EncodeError,
    ErrorCode, FRAME_HEADER_SIZE, Frame, FrameDecoder, FrameEncoder, FrameHeader, FrameType,
    HeadersFrame, MAX_FRAME_SIZE, PREFACE_LEN, PayloadCursor, SettingId, SettingsFrame,
    SkippedFrame, StreamId, WindowUpdateFrame, flags, validate_preface,
};

pub use config::{Config, ConfigError, DecoderConfig, SettingsLengthPolicy, UnknownFramePolicy};
pub use reader::{FrameReader, Frames};
