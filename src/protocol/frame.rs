//! Frame struct with wire encoding and the exact-read primitive.
//!
//! Represents one complete protocol message. Uses `bytes::Bytes` for the
//! body so fan-out and history replay clone cheaply instead of copying.
//!
//! # Example
//!
//! ```
//! use chatwire::protocol::{Frame, HEADER_SIZE};
//!
//! let frame = Frame::new(b"hello");
//! assert_eq!(frame.body(), b"hello");
//! assert_eq!(frame.encode().len(), HEADER_SIZE + 5);
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::wire_format::{decode_header, encode_header, HEADER_SIZE, MAX_BODY_SIZE};
use crate::error::Result;

/// A complete protocol frame.
///
/// Immutable once constructed. One instance per in-flight message; the
/// body is shared, not copied, when a frame is broadcast to many
/// subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    body: Bytes,
}

impl Frame {
    /// Create a frame from an application body.
    ///
    /// Bodies longer than [`MAX_BODY_SIZE`] are silently truncated to
    /// exactly that many bytes; the encoded header reports the clamped
    /// length, not the original.
    pub fn new(body: &[u8]) -> Self {
        let len = body.len().min(MAX_BODY_SIZE);
        Self {
            body: Bytes::copy_from_slice(&body[..len]),
        }
    }

    /// Get a reference to the body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get a clone of the body as `Bytes` (cheap, zero-copy).
    #[inline]
    pub fn body_bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Get the body length.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Encode this frame for the wire: header followed by body.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.body.len());
        buf.put_slice(&encode_header(self.body.len()));
        buf.put_slice(&self.body);
        buf.freeze()
    }

    /// Read one complete frame from the stream.
    ///
    /// Reads exactly [`HEADER_SIZE`] bytes, decodes the length, then reads
    /// exactly that many body bytes. At most one read is in flight at a
    /// time. Any I/O failure (including EOF mid-frame) or header decode
    /// failure is returned as an error; a frame is atomic — either fully
    /// received or the connection is abandoned.
    pub async fn read_from<R>(reader: &mut R) -> Result<Frame>
    where
        R: AsyncRead + Unpin,
    {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header).await?;
        let body_len = decode_header(&header)?;

        let mut body = BytesMut::zeroed(body_len);
        reader.read_exact(&mut body).await?;

        Ok(Frame { body: body.freeze() })
    }
}
