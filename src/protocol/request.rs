//! TAP request encoding
//!
//! One request frame per connection: the stream name as the key, a flags
//! word selecting dump vs backfill, and the 64-bit "since" timestamp.

use crate::binutil;
use crate::protocol::header::{HEADER_SIZE, REQUEST_MAGIC, TAP_CONNECT};

/// Replay all changes since the request's timestamp (flags bit 0)
pub const TAP_FLAG_BACKFILL: u32 = 0x01;

/// One-shot full snapshot of all stored data (flags bit 1)
pub const TAP_FLAG_DUMP: u32 = 0x02;

/// Send keys only, no values (flags bit 5)
pub const TAP_FLAG_KEYS_ONLY: u32 = 0x20;

/// Extras carried by a TAP connect request: the 4-byte flags word
const REQUEST_EXT_LEN: u8 = 4;

/// A TAP connect request frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapRequest {
    /// Logical stream name, sent as the frame key
    pub name: String,

    /// Request flags bitmask
    pub flags: u32,

    /// "Since" timestamp for backfill (0 means since epoch); 0 for dump
    pub since: u64,
}

impl TapRequest {
    /// Request a one-shot full snapshot
    pub fn dump(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: TAP_FLAG_DUMP,
            since: 0,
        }
    }

    /// Request a replay of all changes since `since` (epoch seconds)
    pub fn backfill(name: impl Into<String>, since: u64) -> Self {
        Self {
            name: name.into(),
            flags: TAP_FLAG_BACKFILL,
            since,
        }
    }

    /// Ask the server to send keys without values
    pub fn keys_only(mut self) -> Self {
        self.flags |= TAP_FLAG_KEYS_ONLY;
        self
    }

    /// Encode the full request frame: 24-byte header, flags, key, since
    pub fn encode(&self) -> Vec<u8> {
        let key = self.name.as_bytes();
        let body_len = REQUEST_EXT_LEN as usize + key.len() + 8;

        let mut frame = Vec::with_capacity(HEADER_SIZE + body_len);

        // Header
        frame.push(REQUEST_MAGIC);
        frame.push(TAP_CONNECT);
        frame.extend_from_slice(&(key.len() as u16).to_be_bytes());
        frame.push(REQUEST_EXT_LEN);
        frame.push(0); // datatype
        frame.extend_from_slice(&0u16.to_be_bytes()); // vbucket
        frame.extend_from_slice(&(body_len as u32).to_be_bytes());
        frame.extend_from_slice(&0u32.to_be_bytes()); // opaque
        frame.extend_from_slice(&binutil::pack_u64(0)); // cas

        // Body
        frame.extend_from_slice(&self.flags.to_be_bytes());
        frame.extend_from_slice(key);
        frame.extend_from_slice(&binutil::pack_u64(self.since));

        frame
    }
}
