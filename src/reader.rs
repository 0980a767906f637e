//! Blocking frame reader over a byte stream.
//!
//! [`FrameReader`] owns the stream side of decoding: it reads the preface
//! once, then for each frame reads exactly 9 header bytes and exactly
//! `length` payload bytes before handing them to the [`FrameDecoder`].

use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::debug;

use crate::config::{ConfigError, DecoderConfig};
use crate::frame::{
    DecodeError, FRAME_HEADER_SIZE, Frame, FrameDecoder, FrameHeader, PREFACE_LEN,
    validate_preface,
};

/// Reads the connection preface and frames from a blocking stream.
pub struct FrameReader<R> {
    inner: R,
    decoder: FrameDecoder,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
        }
    }

    /// Create a reader whose decoder uses `config`, which must pass
    /// [`DecoderConfig::validate`].
    pub fn with_config(inner: R, config: DecoderConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner,
            decoder: FrameDecoder::with_config(config)?,
        })
    }

    /// Read and validate the 24-byte client preface.
    pub fn read_preface(&mut self) -> Result<(), DecodeError> {
        let mut preface = [0u8; PREFACE_LEN];
        let read = self.fill(&mut preface)?;
        if read < PREFACE_LEN {
            debug!(read, "stream ended inside connection preface");
            return Err(DecodeError::PrefaceMismatch);
        }
        validate_preface(&preface)
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a frame boundary.
    pub fn read_frame(&mut self) -> Result<Option<Frame>, DecodeError> {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        let read = self.fill(&mut raw)?;
        if read == 0 {
            return Ok(None);
        }
        let header = FrameHeader::decode(&raw[..read])?;

        let max = self.decoder.config().max_frame_size;
        if header.length > max {
            return Err(DecodeError::FrameTooLarge {
                size: header.length,
                max,
            });
        }

        let length = header.length as usize;
        let mut payload = BytesMut::zeroed(length);
        let received = self.fill(&mut payload)?;
        if received < length {
            return Err(DecodeError::BufferUnderrun {
                requested: length,
                remaining: received,
            });
        }

        self.decoder.parse(header, payload.freeze()).map(Some)
    }

    /// Iterate over frames until end of stream or the first error.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            done: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read until `dst` is full or the stream ends, returning the byte count.
    fn fill(&mut self, dst: &mut [u8]) -> Result<usize, DecodeError> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

/// Iterator returned by [`FrameReader::frames`].
pub struct Frames<'a, R> {
    reader: &'a mut FrameReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
