//! Response header decoding
//!
//! Fixed-width decode of the 24-byte frame header. Field extraction only;
//! length consistency is enforced when the body is split.

use crate::binutil;
use crate::error::{Result, TapError};

/// Header size: 1+1+2+1+1+2+4+4+8 bytes
pub const HEADER_SIZE: usize = 24;

/// Magic byte for request frames
pub const REQUEST_MAGIC: u8 = 0x80;

/// Magic byte for response frames
pub const RESPONSE_MAGIC: u8 = 0x81;

/// Opcode of the TAP connect request
pub const TAP_CONNECT: u8 = 0x40;

/// A decoded response frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Magic byte (0x81 for responses)
    pub magic: u8,

    /// Event opcode
    pub opcode: u8,

    /// Length of the key inside the body
    pub key_len: u16,

    /// Length of the extras inside the body
    pub ext_len: u8,

    /// Data type (unused by TAP)
    pub datatype: u8,

    /// Virtual-partition id, reused status slot (pass-through only)
    pub vbucket: u16,

    /// Total body length: extras + key + value
    pub body_len: u32,

    /// Correlation id (always 0 for this client)
    pub opaque: u32,

    /// Compare-and-swap token (not used for control)
    pub cas: u64,
}

impl ResponseHeader {
    /// Decode a header from the first 24 bytes of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(TapError::Protocol(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        Ok(Self {
            magic: bytes[0],
            opcode: bytes[1],
            key_len: u16::from_be_bytes([bytes[2], bytes[3]]),
            ext_len: bytes[4],
            datatype: bytes[5],
            vbucket: u16::from_be_bytes([bytes[6], bytes[7]]),
            body_len: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            opaque: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            cas: binutil::unpack_u64(&bytes[16..24])?,
        })
    }
}
