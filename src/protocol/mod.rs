//! Protocol module - wire format and frame types.
//!
//! Implements the length-prefixed message protocol:
//! - 4-byte ASCII decimal header encoding/decoding
//! - Frame struct with body clamping and wire encoding
//! - The exact-read primitive shared by server and client pipelines

mod frame;
mod wire_format;

pub use frame::Frame;
pub use wire_format::{decode_header, encode_header, HEADER_SIZE, MAX_BODY_SIZE};
