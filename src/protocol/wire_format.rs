//! Wire format encoding and decoding.
//!
//! Implements the 4-byte header format:
//! ```text
//! ┌────────────────────┬──────────────────┐
//! │ Body length        │ Body             │
//! │ 4 bytes            │ 0..=512 bytes    │
//! │ ASCII decimal,     │ opaque           │
//! │ space-padded       │                  │
//! └────────────────────┴──────────────────┘
//! ```
//!
//! The header is human-readable ASCII, right-aligned and padded with
//! spaces (`"   5"`, `" 512"`). There is no terminator, checksum, or
//! version field.

use crate::error::{ChatwireError, Result};

/// Header size in bytes (fixed, exactly 4).
pub const HEADER_SIZE: usize = 4;

/// Maximum body size in bytes.
pub const MAX_BODY_SIZE: usize = 512;

/// Encode a body length as a 4-byte ASCII decimal header.
///
/// The value is right-aligned and left-padded with spaces.
///
/// # Example
///
/// ```
/// use chatwire::protocol::encode_header;
///
/// assert_eq!(&encode_header(5), b"   5");
/// assert_eq!(&encode_header(512), b" 512");
/// ```
pub fn encode_header(body_len: usize) -> [u8; HEADER_SIZE] {
    debug_assert!(body_len <= MAX_BODY_SIZE);
    let mut buf = [b' '; HEADER_SIZE];
    let digits = format!("{}", body_len);
    buf[HEADER_SIZE - digits.len()..].copy_from_slice(digits.as_bytes());
    buf
}

/// Decode a 4-byte header into a body length.
///
/// Leading spaces are allowed. Decoding fails if the bytes are not a
/// decimal integer or if the value exceeds [`MAX_BODY_SIZE`]; either case
/// is fatal for the connection that produced it.
///
/// # Example
///
/// ```
/// use chatwire::protocol::decode_header;
///
/// assert_eq!(decode_header(b"  42").unwrap(), 42);
/// assert!(decode_header(b"9999").is_err());
/// ```
pub fn decode_header(buf: &[u8; HEADER_SIZE]) -> Result<usize> {
    let text = std::str::from_utf8(buf)
        .map_err(|_| ChatwireError::Frame("header is not ASCII".to_string()))?;

    let body_len: usize = text
        .trim_start()
        .parse()
        .map_err(|_| ChatwireError::Frame(format!("header {:?} is not a decimal length", text)))?;

    if body_len > MAX_BODY_SIZE {
        return Err(ChatwireError::Frame(format!(
            "declared body length {} exceeds maximum {}",
            body_len, MAX_BODY_SIZE
        )));
    }

    Ok(body_len)
}
