//! HTTP/2 frame type definitions.

use std::fmt;

use bytes::Bytes;

/// HTTP/2 frame types (RFC 7540 Section 6).
///
/// The registry is open: codes outside the known range are kept as
/// [`FrameType::Unknown`] so a header can still be produced for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data,
    Headers,
    Priority,
    RstStream,
    Settings,
    PushPromise,
    Ping,
    GoAway,
    WindowUpdate,
    Continuation,
    /// Unregistered frame type code.
    Unknown(u8),
}

impl FrameType {
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0x0 => FrameType::Data,
            0x1 => FrameType::Headers,
            0x2 => FrameType::Priority,
            0x3 => FrameType::RstStream,
            0x4 => FrameType::Settings,
            0x5 => FrameType::PushPromise,
            0x6 => FrameType::Ping,
            0x7 => FrameType::GoAway,
            0x8 => FrameType::WindowUpdate,
            0x9 => FrameType::Continuation,
            other => FrameType::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            FrameType::Data => 0x0,
            FrameType::Headers => 0x1,
            FrameType::Priority => 0x2,
            FrameType::RstStream => 0x3,
            FrameType::Settings => 0x4,
            FrameType::PushPromise => 0x5,
            FrameType::Ping => 0x6,
            FrameType::GoAway => 0x7,
            FrameType::WindowUpdate => 0x8,
            FrameType::Continuation => 0x9,
            FrameType::Unknown(code) => code,
        }
    }

    /// Whether the code is in the RFC 7540 registry.
    pub fn is_known(self) -> bool {
        !matches!(self, FrameType::Unknown(_))
    }
}

impl From<u8> for FrameType {
    fn from(byte: u8) -> Self {
        FrameType::from_u8(byte)
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameType::Data => f.write_str("DATA"),
            FrameType::Headers => f.write_str("HEADERS"),
            FrameType::Priority => f.write_str("PRIORITY"),
            FrameType::RstStream => f.write_str("RST_STREAM"),
            FrameType::Settings => f.write_str("SETTINGS"),
            FrameType::PushPromise => f.write_str("PUSH_PROMISE"),
            FrameType::Ping => f.write_str("PING"),
            FrameType::GoAway => f.write_str("GOAWAY"),
            FrameType::WindowUpdate => f.write_str("WINDOW_UPDATE"),
            FrameType::Continuation => f.write_str("CONTINUATION"),
            FrameType::Unknown(code) => write!(f, "UNKNOWN(0x{:02x})", code),
        }
    }
}

/// Frame flags.
pub mod flags {
    /// HEADERS frame: indicates this is the last frame of the stream.
    pub const END_STREAM: u8 = 0x1;
    /// HEADERS frame: indicates this is the last header block.
    pub const END_HEADERS: u8 = 0x4;
    /// HEADERS frame: padding is present.
    pub const PADDED: u8 = 0x8;
    /// HEADERS frame: priority information is present.
    pub const PRIORITY: u8 = 0x20;
    /// SETTINGS frame: this is an acknowledgment.
    pub const ACK: u8 = 0x1;
}

/// Mask selecting the low 31 bits of a field whose top bit is reserved.
pub(crate) const STREAM_ID_MASK: u32 = 0x7FFF_FFFF;

/// Stream identifier (31 bits, high bit reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamId(u32);

impl StreamId {
    /// Connection-level stream (stream 0).
    pub const CONNECTION: StreamId = StreamId(0);

    /// Largest representable stream identifier.
    pub const MAX: StreamId = StreamId(STREAM_ID_MASK);

    /// Create a new stream ID, masking the reserved bit.
    #[inline]
    pub fn new(id: u32) -> Self {
        StreamId(id & STREAM_ID_MASK)
    }

    /// Get the raw stream ID value.
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Check if this is the connection-level stream.
    #[inline]
    pub fn is_connection_level(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        StreamId::new(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed 9-byte header preceding every frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length (24 bits).
    pub length: u32,
    /// Frame type.
    pub frame_type: FrameType,
    /// Frame flags, meaning depends on the frame type.
    pub flags: u8,
    /// Stream identifier.
    pub stream_id: StreamId,
}

impl FrameHeader {
    /// Create a new frame header.
    pub fn new(frame_type: FrameType, flags: u8, stream_id: StreamId, length: u32) -> Self {
        Self {
            length,
            frame_type,
            flags,
            stream_id,
        }
    }

    /// Check if a flag is set.
    #[inline]
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stream={} length={} flags=0x{:02x}",
            self.frame_type, self.stream_id, self.length, self.flags
        )
    }
}

/// Parsed HTTP/2 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Settings(SettingsFrame),
    WindowUpdate(WindowUpdateFrame),
    Headers(HeadersFrame),
    /// A frame without a payload parser whose payload was consumed and dropped.
    Skipped(SkippedFrame),
}

impl Frame {
    /// The header this frame was decoded from.
    pub fn header(&self) -> &FrameHeader {
        match self {
            Frame::Settings(f) => &f.header,
            Frame::WindowUpdate(f) => &f.header,
            Frame::Headers(f) => &f.header,
            Frame::Skipped(f) => &f.header,
        }
    }

    /// Get the stream ID for this frame.
    pub fn stream_id(&self) -> StreamId {
        self.header().stream_id
    }

    /// Get the frame type tag.
    pub fn frame_type(&self) -> FrameType {
        self.header().frame_type
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())?;
        match self {
            Frame::Settings(s) => write!(
                f,
                " ack={} header_table_size={} enable_push={} max_concurrent_streams={} \
                 initial_window_size={} max_frame_size={} max_header_list_size={}",
                s.ack,
                s.header_table_size,
                s.enable_push,
                s.max_concurrent_streams,
                s.initial_window_size,
                s.max_frame_size,
                s.max_header_list_size
            ),
            Frame::WindowUpdate(w) => write!(f, " increment={}", w.window_size_increment),
            Frame::Headers(h) => {
                write!(
                    f,
                    " end_stream={} end_headers={} dependency={} exclusive={} weight={} fragment=",
                    h.is_stream_end,
                    h.is_headers_end,
                    h.stream_dependency,
                    h.stream_dependency_exclusive,
                    h.stream_weight
                )?;
                for (i, byte) in h.fragment.iter().enumerate() {
                    if i > 0 {
                        f.write_str("-")?;
                    }
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            Frame::Skipped(_) => f.write_str(" (skipped)"),
        }
    }
}

/// SETTINGS frame (type=0x4).
///
/// Parameters missing from the payload stay at zero. When an identifier
/// appears more than once the last record wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsFrame {
    pub header: FrameHeader,
    pub ack: bool,
    pub header_table_size: u32,
    pub enable_push: u32,
    pub max_concurrent_streams: u32,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: u32,
}

impl SettingsFrame {
    /// A frame with every parameter absent.
    pub fn new(header: FrameHeader) -> Self {
        Self {
            header,
            ack: header.has_flag(flags::ACK),
            header_table_size: 0,
            enable_push: 0,
            max_concurrent_streams: 0,
            initial_window_size: 0,
            max_frame_size: 0,
            max_header_list_size: 0,
        }
    }

    /// Store a parameter value. Returns `false` for identifiers this
    /// frame does not track.
    pub fn set(&mut self, id: SettingId, value: u32) -> bool {
        let slot = match id {
            SettingId::HeaderTableSize => &mut self.header_table_size,
            SettingId::EnablePush => &mut self.enable_push,
            SettingId::MaxConcurrentStreams => &mut self.max_concurrent_streams,
            SettingId::InitialWindowSize => &mut self.initial_window_size,
            SettingId::MaxFrameSize => &mut self.max_frame_size,
            SettingId::MaxHeaderListSize => &mut self.max_header_list_size,
            SettingId::Unknown(_) => return false,
        };
        *slot = value;
        true
    }

    /// Parameters with a non-zero value, in identifier order.
    pub fn parameters(&self) -> Vec<(SettingId, u32)> {
        [
            (SettingId::HeaderTableSize, self.header_table_size),
            (SettingId::EnablePush, self.enable_push),
            (SettingId::MaxConcurrentStreams, self.max_concurrent_streams),
            (SettingId::InitialWindowSize, self.initial_window_size),
            (SettingId::MaxFrameSize, self.max_frame_size),
            (SettingId::MaxHeaderListSize, self.max_header_list_size),
        ]
        .into_iter()
        .filter(|(_, value)| *value != 0)
        .collect()
    }
}

/// Known setting identifiers (RFC 7540 Section 6.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingId {
    HeaderTableSize,
    EnablePush,
    MaxConcurrentStreams,
    InitialWindowSize,
    MaxFrameSize,
    MaxHeaderListSize,
    /// Unknown setting ID.
    Unknown(u16),
}

impl SettingId {
    pub fn from_u16(id: u16) -> Self {
        match id {
            0x1 => SettingId::HeaderTableSize,
            0x2 => SettingId::EnablePush,
            0x3 => SettingId::MaxConcurrentStreams,
            0x4 => SettingId::InitialWindowSize,
            0x5 => SettingId::MaxFrameSize,
            0x6 => SettingId::MaxHeaderListSize,
            _ => SettingId::Unknown(id),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            SettingId::HeaderTableSize => 0x1,
            SettingId::EnablePush => 0x2,
            SettingId::MaxConcurrentStreams => 0x3,
            SettingId::InitialWindowSize => 0x4,
            SettingId::MaxFrameSize => 0x5,
            SettingId::MaxHeaderListSize => 0x6,
            SettingId::Unknown(id) => id,
        }
    }
}

/// WINDOW_UPDATE frame (type=0x8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub header: FrameHeader,
    /// Flow-control credit, reserved bit cleared. Zero is passed through.
    pub window_size_increment: u32,
}

/// Default weight for a stream without explicit priority.
pub const DEFAULT_STREAM_WEIGHT: u8 = 16;

/// HEADERS frame (type=0x1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame {
    pub header: FrameHeader,
    /// Number of padding bytes that followed the fragment.
    pub pad_length: u8,
    pub stream_dependency: StreamId,
    pub stream_dependency_exclusive: bool,
    pub stream_weight: u8,
    /// HPACK-encoded header block fragment.
    pub fragment: Bytes,
    pub is_stream_end: bool,
    pub is_headers_end: bool,
}

/// A frame whose payload was read and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedFrame {
    pub header: FrameHeader,
}

#[cfg(test)]
mod tests {
    use super::*;

    // FrameType tests

    #[test]
    fn test_frame_type_from_u8() {
        assert_eq!(FrameType::from_u8(0x0), FrameType::Data);
        assert_eq!(FrameType::from_u8(0x1), FrameType::Headers);
        assert_eq!(FrameType::from_u8(0x2), FrameType::Priority);
        assert_eq!(FrameType::from_u8(0x3), FrameType::RstStream);
        assert_eq!(FrameType::from_u8(0x4), FrameType::Settings);
        assert_eq!(FrameType::from_u8(0x5), FrameType::PushPromise);
        assert_eq!(FrameType::from_u8(0x6), FrameType::Ping);
        assert_eq!(FrameType::from_u8(0x7), FrameType::GoAway);
        assert_eq!(FrameType::from_u8(0x8), FrameType::WindowUpdate);
        assert_eq!(FrameType::from_u8(0x9), FrameType::Continuation);
    }

    #[test]
    fn test_frame_type_from_u8_unknown() {
        assert_eq!(FrameType::from_u8(0xa), FrameType::Unknown(0xa));
        assert_eq!(FrameType::from_u8(0xff), FrameType::Unknown(0xff));
        assert!(!FrameType::from_u8(0xff).is_known());
        assert!(FrameType::from_u8(0x4).is_known());
    }

    #[test]
    fn test_frame_type_code_roundtrip() {
        for code in 0..=u8::MAX {
            assert_eq!(FrameType::from_u8(code).to_u8(), code);
        }
    }

    #[test]
    fn test_frame_type_display() {
        assert_eq!(FrameType::WindowUpdate.to_string(), "WINDOW_UPDATE");
        assert_eq!(FrameType::GoAway.to_string(), "GOAWAY");
        assert_eq!(FrameType::Unknown(0x0b).to_string(), "UNKNOWN(0x0b)");
    }

    // StreamId tests

    #[test]
    fn test_stream_id_masks_reserved_bit() {
        // High bit should be masked off
        let id = StreamId::new(0x80000001);
        assert_eq!(id.value(), 1);
        assert_eq!(StreamId::new(u32::MAX), StreamId::MAX);
    }

    #[test]
    fn test_stream_id_connection_level() {
        assert!(StreamId::CONNECTION.is_connection_level());
        assert!(StreamId::new(0x8000_0000).is_connection_level());
        assert!(!StreamId::new(1).is_connection_level());
    }

    #[test]
    fn test_stream_id_from_u32() {
        let id: StreamId = 42.into();
        assert_eq!(id.value(), 42);
        assert_eq!(StreamId::default().value(), 0);
    }

    // FrameHeader tests

    #[test]
    fn test_frame_header_has_flag() {
        let header = FrameHeader::new(
            FrameType::Headers,
            flags::END_STREAM | flags::END_HEADERS,
            StreamId::new(1),
            0,
        );

        assert!(header.has_flag(flags::END_STREAM));
        assert!(header.has_flag(flags::END_HEADERS));
        assert!(!header.has_flag(flags::PADDED));
        assert!(!header.has_flag(flags::PRIORITY));
    }

    #[test]
    fn test_frame_header_display() {
        let header = FrameHeader::new(FrameType::Settings, flags::ACK, StreamId::CONNECTION, 0);
        assert_eq!(header.to_string(), "SETTINGS stream=0 length=0 flags=0x01");
    }

    // Frame tests

    #[test]
    fn test_frame_accessors() {
        let header = FrameHeader::new(FrameType::WindowUpdate, 0, StreamId::new(15), 4);
        let frame = Frame::WindowUpdate(WindowUpdateFrame {
            header,
            window_size_increment: 1000,
        });
        assert_eq!(frame.stream_id().value(), 15);
        assert_eq!(frame.frame_type(), FrameType::WindowUpdate);
        assert_eq!(frame.header(), &header);
    }

    #[test]
    fn test_frame_display_headers() {
        let frame = Frame::Headers(HeadersFrame {
            header: FrameHeader::new(FrameType::Headers, flags::END_HEADERS, StreamId::new(1), 2),
            pad_length: 0,
            stream_dependency: StreamId::CONNECTION,
            stream_dependency_exclusive: false,
            stream_weight: DEFAULT_STREAM_WEIGHT,
            fragment: Bytes::from_static(&[0xAA, 0xBB]),
            is_stream_end: false,
            is_headers_end: true,
        });
        let text = frame.to_string();
        assert!(text.starts_with("HEADERS stream=1 length=2 flags=0x04"));
        assert!(text.ends_with("fragment=AA-BB"));
    }

    #[test]
    fn test_frame_display_skipped() {
        let frame = Frame::Skipped(SkippedFrame {
            header: FrameHeader::new(FrameType::Unknown(0xfa), 0, StreamId::new(3), 5),
        });
        assert_eq!(
            frame.to_string(),
            "UNKNOWN(0xfa) stream=3 length=5 flags=0x00 (skipped)"
        );
    }

    // SettingsFrame tests

    #[test]
    fn test_settings_set_known_and_unknown() {
        let header = FrameHeader::new(FrameType::Settings, 0, StreamId::CONNECTION, 12);
        let mut settings = SettingsFrame::new(header);
        assert!(!settings.ack);
        assert!(settings.set(SettingId::MaxFrameSize, 16_384));
        assert!(!settings.set(SettingId::Unknown(0x99), 7));
        assert_eq!(settings.max_frame_size, 16_384);
        assert_eq!(
            settings.parameters(),
            vec![(SettingId::MaxFrameSize, 16_384)]
        );
    }

    // SettingId tests

    #[test]
    fn test_setting_id_from_u16() {
        assert_eq!(SettingId::from_u16(0x1), SettingId::HeaderTableSize);
        assert_eq!(SettingId::from_u16(0x2), SettingId::EnablePush);
        assert_eq!(SettingId::from_u16(0x3), SettingId::MaxConcurrentStreams);
        assert_eq!(SettingId::from_u16(0x4), SettingId::InitialWindowSize);
        assert_eq!(SettingId::from_u16(0x5), SettingId::MaxFrameSize);
        assert_eq!(SettingId::from_u16(0x6), SettingId::MaxHeaderListSize);
        assert_eq!(SettingId::from_u16(0x99), SettingId::Unknown(0x99));
    }

    #[test]
    fn test_setting_id_roundtrip() {
        for raw in [0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0xffff] {
            assert_eq!(SettingId::from_u16(raw).to_u16(), raw);
        }
    }
}
