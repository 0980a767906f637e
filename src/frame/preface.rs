//! Client connection preface.

use super::error::DecodeError;

/// Connection preface sent by clients before the first frame.
pub const CONNECTION_PREFACE: &[u8; PREFACE_LEN] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// Length of the connection preface in bytes.
pub const PREFACE_LEN: usize = 24;

/// Check received bytes against the connection preface.
///
/// Anything other than an exact 24-byte match fails, including input of
/// the wrong length.
pub fn validate(bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes == CONNECTION_PREFACE {
        Ok(())
    } else {
        Err(DecodeError::PrefaceMismatch)
    }
}
