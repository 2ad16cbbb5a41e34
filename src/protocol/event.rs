//! TAP events
//!
//! Opcode classification and body splitting for response frames.

use bytes::Bytes;

use crate::error::{Result, TapError};
use crate::protocol::header::ResponseHeader;

/// NOOP: keepalive, never carries a body
pub const OPCODE_NOOP: u8 = 0x0a;

/// TAP mutation: a key was set or updated
pub const OPCODE_TAP_MUTATION: u8 = 0x41;

/// TAP delete: a key was removed
pub const OPCODE_TAP_DELETE: u8 = 0x42;

/// TAP flush: the whole store was flushed
pub const OPCODE_TAP_FLUSH: u8 = 0x43;

/// TAP opaque: engine-internal control frame
pub const OPCODE_TAP_OPAQUE: u8 = 0x44;

/// The kind of event a response opcode maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Noop,
    Mutation,
    Delete,
    Flush,
    Opaque,
    Unknown(u8),
}

impl EventKind {
    /// Classify a response opcode
    pub fn classify(opcode: u8) -> Self {
        match opcode {
            OPCODE_NOOP => EventKind::Noop,
            OPCODE_TAP_MUTATION => EventKind::Mutation,
            OPCODE_TAP_DELETE => EventKind::Delete,
            OPCODE_TAP_FLUSH => EventKind::Flush,
            OPCODE_TAP_OPAQUE => EventKind::Opaque,
            other => EventKind::Unknown(other),
        }
    }
}

/// A decoded TAP event
///
/// Key and value are carved from the frame body using header-declared
/// lengths, including for unrecognized opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapEvent {
    /// Keepalive; no body at all
    Noop,

    /// A key was set or updated
    Mutation { key: Bytes, value: Bytes },

    /// A key was removed
    Delete { key: Bytes, value: Bytes },

    /// The whole store was flushed
    Flush,

    /// Engine-internal control frame
    Opaque,

    /// Unrecognized opcode, decoded by header-declared lengths anyway
    Unknown { opcode: u8, key: Bytes, value: Bytes },
}

impl TapEvent {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            TapEvent::Noop => EventKind::Noop,
            TapEvent::Mutation { .. } => EventKind::Mutation,
            TapEvent::Delete { .. } => EventKind::Delete,
            TapEvent::Flush => EventKind::Flush,
            TapEvent::Opaque => EventKind::Opaque,
            TapEvent::Unknown { opcode, .. } => EventKind::Unknown(*opcode),
        }
    }

    /// The event key, for kinds that carry one
    pub fn key(&self) -> Option<&Bytes> {
        match self {
            TapEvent::Mutation { key, .. }
            | TapEvent::Delete { key, .. }
            | TapEvent::Unknown { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Build an event from a decoded header and its full body
    pub fn from_frame(header: &ResponseHeader, body: Bytes) -> Result<Self> {
        match EventKind::classify(header.opcode) {
            EventKind::Noop => Ok(TapEvent::Noop),
            EventKind::Flush => Ok(TapEvent::Flush),
            EventKind::Opaque => Ok(TapEvent::Opaque),
            EventKind::Mutation => {
                let (_extra, key, value) = split_body(&body, header.ext_len, header.key_len)?;
                Ok(TapEvent::Mutation { key, value })
            }
            EventKind::Delete => {
                let (_extra, key, value) = split_body(&body, header.ext_len, header.key_len)?;
                Ok(TapEvent::Delete { key, value })
            }
            EventKind::Unknown(opcode) => {
                let (_extra, key, value) = split_body(&body, header.ext_len, header.key_len)?;
                Ok(TapEvent::Unknown { opcode, key, value })
            }
        }
    }
}

/// Split a frame body into (extras, key, value) by header-declared lengths
///
/// Fails with a protocol error when the declared extras + key lengths
/// exceed the body.
pub fn split_body(body: &Bytes, ext_len: u8, key_len: u16) -> Result<(Bytes, Bytes, Bytes)> {
    let ext_end = ext_len as usize;
    let key_end = ext_end + key_len as usize;

    if key_end > body.len() {
        return Err(TapError::Protocol(format!(
            "header-declared lengths (extras {} + key {}) exceed body of {} bytes",
            ext_len,
            key_len,
            body.len()
        )));
    }

    Ok((
        body.slice(..ext_end),
        body.slice(ext_end..key_end),
        body.slice(key_end..),
    ))
}
