//! Forward-only big-endian reader over a buffered frame payload.

use bytes::{Buf, Bytes};

use super::error::DecodeError;

/// Sequential reader over exactly one frame payload.
///
/// Every read either consumes the full width it asks for or fails with
/// [`DecodeError::BufferUnderrun`] without moving. There is no rewind.
#[derive(Debug, Clone)]
pub struct PayloadCursor {
    payload: Bytes,
    len: usize,
}

impl PayloadCursor {
    pub fn new(payload: Bytes) -> Self {
        let len = payload.len();
        Self { payload, len }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining_len(&self) -> usize {
        self.payload.remaining()
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.len - self.payload.remaining()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        !self.payload.has_remaining()
    }

    #[inline]
    fn ensure(&self, requested: usize) -> Result<(), DecodeError> {
        let remaining = self.remaining_len();
        if requested > remaining {
            return Err(DecodeError::BufferUnderrun {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.payload.get_u8())
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        self.ensure(2)?;
        Ok(self.payload.get_u16())
    }

    /// Read a 24-bit big-endian integer, zero-extended.
    pub fn read_u24_be_as_u32(&mut self) -> Result<u32, DecodeError> {
        self.ensure(3)?;
        Ok(self.payload.get_uint(3) as u32)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        Ok(self.payload.get_u32())
    }

    /// Take the next `n` bytes verbatim. The result shares the payload buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes, DecodeError> {
        self.ensure(n)?;
        Ok(self.payload.split_to(n))
    }

    /// Discard the next `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure(n)?;
        self.payload.advance(n);
        Ok(())
    }
}
